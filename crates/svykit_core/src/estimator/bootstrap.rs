//! Deterministic batched bootstrap driver.
//!
//! Draws are generated in fixed-size batches, each batch seeded from its own
//! index, so the full draw vector is reproducible regardless of how many
//! worker threads execute the batches. A draw closure may return `None` to
//! skip an iteration (e.g. a resample with a zero denominator).

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::weighted::{percentile, sample_std};

const MAX_BATCH_SIZE: usize = 100;

/// Run `draw` for `iterations` independent resamples and collect the
/// non-skipped results. Batch ordering is stable, so the output is identical
/// with and without the `parallel` feature.
pub(crate) fn bootstrap_draws<F>(iterations: usize, draw: F) -> Vec<f64>
where
    F: Fn(&mut SmallRng) -> Option<f64> + Sync,
{
    let num_batches = iterations.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |i: usize| {
        let mut rng = SmallRng::seed_from_u64(i as u64);

        let batch_size = if i == num_batches - 1 {
            iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        (0..batch_size)
            .filter_map(|_| {
                let seed = rng.next_u64();
                let mut draw_rng = SmallRng::seed_from_u64(seed);
                draw(&mut draw_rng)
            })
            .collect::<Vec<_>>()
    };

    #[cfg(feature = "parallel")]
    {
        (0..num_batches).into_par_iter().flat_map(run_batch).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..num_batches).flat_map(run_batch).collect()
    }
}

/// Aggregate statistics over a set of bootstrap draws.
pub(crate) struct BootstrapSummary {
    pub mean: f64,
    pub se: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Mean, sample SD, and 2.5/97.5 percentile interval of the draws.
/// `None` when every iteration was skipped.
pub(crate) fn summarize(mut draws: Vec<f64>) -> Option<BootstrapSummary> {
    if draws.is_empty() {
        return None;
    }
    let mean = draws.iter().sum::<f64>() / draws.len() as f64;
    let se = sample_std(&draws);
    draws.sort_by(f64::total_cmp);
    Some(BootstrapSummary {
        mean,
        se,
        ci_lower: percentile(&draws, 2.5),
        ci_upper: percentile(&draws, 97.5),
    })
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_draw_count_matches_iterations() {
        let draws = bootstrap_draws(250, |rng| Some(rng.random_range(0.0..1.0)));
        assert_eq!(draws.len(), 250);
    }

    #[test]
    fn test_draws_are_deterministic() {
        let a = bootstrap_draws(130, |rng| Some(rng.random_range(0.0..1.0)));
        let b = bootstrap_draws(130, |rng| Some(rng.random_range(0.0..1.0)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_skipped_iterations_are_dropped() {
        let draws = bootstrap_draws(100, |rng| {
            let x: f64 = rng.random_range(0.0..1.0);
            (x < 0.5).then_some(x)
        });
        assert!(draws.len() < 100);
        assert!(draws.iter().all(|&x| x < 0.5));
    }

    #[test]
    fn test_summarize_constant_draws_collapses() {
        let summary = summarize(vec![3.0; 40]).unwrap();
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.se, 0.0);
        assert_eq!(summary.ci_lower, 3.0);
        assert_eq!(summary.ci_upper, 3.0);
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert!(summarize(Vec::new()).is_none());
    }
}
