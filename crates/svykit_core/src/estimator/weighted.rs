//! Weighted-statistics primitives shared by the estimator methods.

use rustc_hash::FxHashMap;

/// Weighted mean. Callers guarantee a positive total weight.
#[must_use]
pub(crate) fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let mut num = 0.0;
    let mut den = 0.0;
    for (y, w) in values.iter().zip(weights) {
        num += w * y;
        den += w;
    }
    num / den
}

/// Weighted variance around the weighted mean, normalized by the total
/// weight.
#[must_use]
pub(crate) fn weighted_variance(values: &[f64], weights: &[f64], mean: f64) -> f64 {
    let mut num = 0.0;
    let mut den = 0.0;
    for (y, w) in values.iter().zip(weights) {
        num += w * (y - mean).powi(2);
        den += w;
    }
    num / den
}

/// Kish's effective sample size: (Σw)² / Σw².
#[must_use]
pub(crate) fn kish_effective_n(weights: &[f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    sum * sum / sum_sq
}

/// Weighted median: the smallest value whose cumulative weight, with values
/// sorted ascending, reaches half the total weight.
#[must_use]
pub(crate) fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let total: f64 = weights.iter().sum();
    let cutoff = total / 2.0;

    let mut cumulative = 0.0;
    for &i in &order {
        cumulative += weights[i];
        if cumulative >= cutoff {
            return values[i];
        }
    }
    // Reachable only through floating-point underflow in the cumulative sum.
    values[order[order.len() - 1]]
}

/// Linearly interpolated percentile of a sorted slice, `q` in [0, 100].
#[must_use]
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sample standard deviation (ddof = 1). Zero for fewer than two draws.
#[must_use]
pub(crate) fn sample_std(draws: &[f64]) -> f64 {
    let n = draws.len();
    if n < 2 {
        return 0.0;
    }
    let mean = draws.iter().sum::<f64>() / n as f64;
    let ss: f64 = draws.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Taylor-linearized variance of an estimator with per-row influence scores.
///
/// Scores are totalled per PSU within each stratum, and the between-PSU
/// variance of those totals is summed across strata with the usual
/// n_h/(n_h - 1) correction. Without a cluster vector each row is its own
/// PSU; without strata everything sits in one stratum. A stratum with a
/// single PSU contributes nothing (its between-PSU variance is undefined).
#[must_use]
pub(crate) fn linearized_variance(
    scores: &[f64],
    cluster: Option<&[String]>,
    strata: Option<&[String]>,
) -> f64 {
    const NO_STRATUM: &str = "";

    #[derive(Default)]
    struct StratumMoments {
        count: f64,
        sum: f64,
        sum_sq: f64,
    }

    let mut strata_moments: FxHashMap<&str, StratumMoments> = FxHashMap::default();

    if let Some(cluster) = cluster {
        let mut psu_totals: FxHashMap<(&str, &str), f64> = FxHashMap::default();
        for (i, z) in scores.iter().enumerate() {
            let stratum = strata.map_or(NO_STRATUM, |s| s[i].as_str());
            *psu_totals
                .entry((stratum, cluster[i].as_str()))
                .or_insert(0.0) += z;
        }
        for (&(stratum, _), &total) in &psu_totals {
            let m = strata_moments.entry(stratum).or_default();
            m.count += 1.0;
            m.sum += total;
            m.sum_sq += total * total;
        }
    } else {
        // Each row is its own PSU: the PSU totals are the scores themselves,
        // so the moments stream directly off the score vector.
        for (i, z) in scores.iter().enumerate() {
            let stratum = strata.map_or(NO_STRATUM, |s| s[i].as_str());
            let m = strata_moments.entry(stratum).or_default();
            m.count += 1.0;
            m.sum += z;
            m.sum_sq += z * z;
        }
    }

    strata_moments
        .values()
        .filter(|m| m.count > 1.0)
        .map(|m| m.count / (m.count - 1.0) * (m.sum_sq - m.sum * m.sum / m.count))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean_equal_weights_is_plain_mean() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let weights = [2.0, 2.0, 2.0, 2.0];
        assert!((weighted_mean(&values, &weights) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean_respects_weights() {
        let values = [0.0, 10.0];
        let weights = [3.0, 1.0];
        assert!((weighted_mean(&values, &weights) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_kish_equal_weights_is_n() {
        let weights = [1.5, 1.5, 1.5, 1.5, 1.5];
        assert!((kish_effective_n(&weights) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_kish_unequal_weights_shrinks_n() {
        let weights = [1.0, 1.0, 1.0, 10.0];
        assert!(kish_effective_n(&weights) < 4.0);
    }

    #[test]
    fn test_weighted_median_is_smallest_value_reaching_half_weight() {
        let values = [1.0, 2.0, 3.0];
        let weights = [1.0, 1.0, 4.0];
        // Cutoff 3.0: cumulative 1, 2, 6 -> first at or past is 3.0.
        assert_eq!(weighted_median(&values, &weights), 3.0);

        let weights = [3.0, 1.0, 1.0];
        // Cutoff 2.5: first cumulative (3.0) already reaches it.
        assert_eq!(weighted_median(&values, &weights), 1.0);
    }

    #[test]
    fn test_weighted_median_unsorted_input() {
        let values = [5.0, 1.0, 3.0];
        let weights = [1.0, 1.0, 1.0];
        assert_eq!(weighted_median(&values, &weights), 3.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert!((percentile(&sorted, 0.0) - 10.0).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 40.0).abs() < 1e-12);
        assert!((percentile(&sorted, 50.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std() {
        let draws = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sum of squared deviations 32, ddof 1 -> sqrt(32/7).
        assert!((sample_std(&draws) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), 0.0);
    }

    #[test]
    fn test_linearized_variance_two_clusters() {
        // PSU totals -1 and 1: 2/1 * (2 - 0) = 4.
        let scores = [-0.5, -0.5, 0.5, 0.5];
        let cluster: Vec<String> =
            ["a", "a", "b", "b"].iter().map(ToString::to_string).collect();
        let v = linearized_variance(&scores, Some(&cluster), None);
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_linearized_variance_singleton_stratum_contributes_zero() {
        let scores = [1.0, -1.0, 2.0];
        let cluster: Vec<String> =
            ["a", "b", "c"].iter().map(ToString::to_string).collect();
        let strata: Vec<String> =
            ["s1", "s1", "s2"].iter().map(ToString::to_string).collect();
        // s2 has one PSU; only s1's two PSUs contribute: 2/1 * (2 - 0) = 4.
        let v = linearized_variance(&scores, Some(&cluster), Some(&strata));
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_linearized_variance_rows_as_psus() {
        let scores = [1.0, -1.0];
        // 2/1 * (2 - 0) = 4.
        let v = linearized_variance(&scores, None, None);
        assert!((v - 4.0).abs() < 1e-12);
    }
}
