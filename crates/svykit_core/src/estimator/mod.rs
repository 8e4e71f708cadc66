//! Survey-weighted point estimates with design-aware uncertainty.
//!
//! [`SurveyEstimator`] borrows a [`WeightedDataset`] plus its weight,
//! cluster, and strata columns, and answers mean / proportion / ratio /
//! median queries as [`EstimateResult`] values. Construction is fail-fast
//! (missing columns, bad weights raise [`EstimatorError`]); the estimation
//! calls themselves never raise — statistical edge cases land in the result's
//! `error` field or as NaN, so a results table can always be rendered.

mod bootstrap;
mod weighted;

use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::EstimatorError;
use crate::model::{
    EstimateKind, EstimateMethod, EstimateResult, SamplingDesign, WeightedDataset,
};

use bootstrap::{bootstrap_draws, summarize};
use weighted::{kish_effective_n, linearized_variance, weighted_mean, weighted_median,
    weighted_variance};

/// Default z-score: 95% confidence.
const DEFAULT_Z: f64 = 1.96;
/// Clustered ratios fall back to the bootstrap below this unique-PSU count.
const DEFAULT_MIN_PSU_FOR_DELTA: usize = 30;
const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 500;

/// Survey-weighted estimator over a borrowed dataset.
///
/// The dataset is read-only for the estimator's whole lifetime; bootstrap
/// resampling works on PSU/row indices, never on copies of the data.
pub struct SurveyEstimator<'a> {
    data: &'a WeightedDataset,
    weights: &'a [f64],
    cluster: Option<&'a [String]>,
    strata: Option<&'a [String]>,
    total_weight: f64,
    z: f64,
    min_psu_for_delta: usize,
    bootstrap_iterations: usize,
}

impl<'a> SurveyEstimator<'a> {
    /// Bind an estimator to a dataset and its design columns.
    ///
    /// Weights must be finite and strictly positive. Cluster and strata
    /// columns are optional; without a cluster column every row acts as its
    /// own PSU in the variance computation.
    pub fn new(
        data: &'a WeightedDataset,
        weight_col: &str,
        psu_col: Option<&str>,
        strata_col: Option<&str>,
    ) -> Result<Self, EstimatorError> {
        if data.is_empty() {
            return Err(EstimatorError::EmptyDataset);
        }
        let weights = data
            .numeric(weight_col)
            .ok_or_else(|| EstimatorError::ColumnNotFound(weight_col.to_string()))?;
        for (row, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w <= 0.0 {
                return Err(EstimatorError::NonPositiveWeight { row, value: w });
            }
        }
        let total_weight: f64 = weights.iter().sum();

        let cluster = match psu_col {
            Some(name) => Some(
                data.labels(name)
                    .ok_or_else(|| EstimatorError::ColumnNotFound(name.to_string()))?,
            ),
            None => None,
        };
        let strata = match strata_col {
            Some(name) => Some(
                data.labels(name)
                    .ok_or_else(|| EstimatorError::ColumnNotFound(name.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            data,
            weights,
            cluster,
            strata,
            total_weight,
            z: DEFAULT_Z,
            min_psu_for_delta: DEFAULT_MIN_PSU_FOR_DELTA,
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
        })
    }

    #[must_use]
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    #[must_use]
    pub fn with_min_psu_for_delta(mut self, count: usize) -> Self {
        self.min_psu_for_delta = count;
        self
    }

    #[must_use]
    pub fn with_bootstrap_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap_iterations = iterations;
        self
    }

    /// Unique PSU count, when a cluster column was supplied.
    #[must_use]
    pub fn psu_count(&self) -> Option<usize> {
        self.cluster.map(|cluster| {
            let unique: FxHashSet<&str> = cluster.iter().map(String::as_str).collect();
            unique.len()
        })
    }

    /// Weighted mean and its design-aware standard error.
    ///
    /// The SE comes from the Taylor linearization of the mean: per-row
    /// influence scores totalled per PSU, between-PSU variance per stratum.
    fn mean_and_se(&self, values: &[f64]) -> (f64, f64) {
        let est = weighted_mean(values, self.weights);
        let scores: Vec<f64> = values
            .iter()
            .zip(self.weights)
            .map(|(y, w)| w * (y - est) / self.total_weight)
            .collect();
        let variance = linearized_variance(scores.as_slice(), self.cluster, self.strata);
        (est, variance.sqrt())
    }

    /// Survey-corrected weighted mean with CI and design effect.
    #[must_use]
    pub fn mean(&self, var: &str, sample_design: &str) -> EstimateResult {
        self.location_estimate(EstimateKind::Mean, var, sample_design)
    }

    /// Survey-corrected weighted proportion with CI (clipped to [0, 1]) and
    /// design effect. The variable is expected to be a 0/1 indicator.
    #[must_use]
    pub fn proportion(&self, var: &str, sample_design: &str) -> EstimateResult {
        self.location_estimate(EstimateKind::Proportion, var, sample_design)
    }

    /// Shared mean/proportion path; they differ only in the SRS variance
    /// used for the design effect and in CI clipping.
    fn location_estimate(
        &self,
        kind: EstimateKind,
        var: &str,
        sample_design: &str,
    ) -> EstimateResult {
        let mut out = EstimateResult::empty(kind, sample_design);
        out.variable = Some(var.to_string());

        let Some(design) = SamplingDesign::parse_estimation(sample_design) else {
            out.error = Some(format!("Unknown sample design: {sample_design}"));
            return out;
        };
        let Some(values) = self.data.numeric(var) else {
            out.error = Some(format!("Column not found: {var}"));
            return out;
        };

        let (est, se) = self.mean_and_se(values);
        let n_eff = kish_effective_n(self.weights);
        let srs_variance = match kind {
            EstimateKind::Proportion => est * (1.0 - est) / n_eff,
            _ => weighted_variance(values, self.weights, est) / n_eff,
        };

        let (method, deff) = if design.is_clustered() {
            let deff = (srs_variance > 0.0).then(|| se * se / srs_variance);
            (EstimateMethod::SurveyCorrected, deff)
        } else {
            (EstimateMethod::Delta, Some(1.0))
        };

        let mut ci_lower = est - self.z * se;
        let mut ci_upper = est + self.z * se;
        if kind == EstimateKind::Proportion {
            ci_lower = ci_lower.max(0.0);
            ci_upper = ci_upper.min(1.0);
        }

        out.estimate = est;
        out.standard_error = Some(se);
        out.ci_lower = Some(ci_lower);
        out.ci_upper = Some(ci_upper);
        out.design_effect = deff;
        out.method = Some(method);
        out.psu_count = self.psu_count();
        out
    }

    /// Weighted ratio of two variables with a design-dependent CI.
    ///
    /// Delta method for simple-random/systematic designs, and for clustered
    /// designs with enough unique PSUs (or no cluster column at all);
    /// cluster bootstrap otherwise. A zero weighted denominator yields a NaN
    /// estimate with no method, never an error.
    #[must_use]
    pub fn ratio(&self, numerator: &str, denominator: &str, sample_design: &str) -> EstimateResult {
        let mut out = EstimateResult::empty(EstimateKind::Ratio, sample_design);
        out.numerator = Some(numerator.to_string());
        out.denominator = Some(denominator.to_string());

        let Some(design) = SamplingDesign::parse_estimation(sample_design) else {
            out.error = Some(format!("Unknown sample design: {sample_design}"));
            return out;
        };
        let Some(num_values) = self.data.numeric(numerator) else {
            out.error = Some(format!("Column not found: {numerator}"));
            return out;
        };
        let Some(den_values) = self.data.numeric(denominator) else {
            out.error = Some(format!("Column not found: {denominator}"));
            return out;
        };

        let weighted_num: f64 = num_values.iter().zip(self.weights).map(|(x, w)| x * w).sum();
        let weighted_den: f64 = den_values.iter().zip(self.weights).map(|(x, w)| x * w).sum();
        out.psu_count = self.psu_count();

        if weighted_den == 0.0 {
            out.estimate = f64::NAN;
            return out;
        }
        let ratio = weighted_num / weighted_den;

        let use_delta = !design.is_clustered()
            || match out.psu_count {
                Some(count) => count >= self.min_psu_for_delta,
                None => true,
            };

        if use_delta {
            let (_, se_num) = self.mean_and_se(num_values);
            let (_, se_den) = self.mean_and_se(den_values);
            let se_ratio = ((se_num / weighted_den).powi(2)
                + (weighted_num * se_den / weighted_den.powi(2)).powi(2))
            .sqrt();

            out.estimate = ratio;
            out.standard_error = Some(se_ratio);
            out.ci_lower = Some(ratio - self.z * se_ratio);
            out.ci_upper = Some(ratio + self.z * se_ratio);
            out.method = Some(EstimateMethod::Delta);
            return out;
        }

        // Cluster bootstrap: resample whole PSUs with replacement. Per-PSU
        // weighted partial sums are precomputed so each iteration is O(PSUs).
        let psu_sums = self.psu_partial_sums(num_values, den_values);
        let groups = psu_sums.len();
        let draws = bootstrap_draws(self.bootstrap_iterations, |rng| {
            let mut num = 0.0;
            let mut den = 0.0;
            for _ in 0..groups {
                let (n, d) = psu_sums[rng.random_range(0..groups)];
                num += n;
                den += d;
            }
            (den != 0.0).then(|| num / den)
        });

        out.method = Some(EstimateMethod::Bootstrap);
        out.bootstrap_iterations = Some(self.bootstrap_iterations);
        match summarize(draws) {
            Some(summary) => {
                out.estimate = summary.mean;
                out.standard_error = Some(summary.se);
                out.ci_lower = Some(summary.ci_lower);
                out.ci_upper = Some(summary.ci_upper);
            }
            None => out.estimate = f64::NAN,
        }
        out
    }

    /// Weighted median with a bootstrap percentile CI.
    ///
    /// Clustered designs resample whole PSUs; other designs resample rows.
    /// The point estimate is always the full-sample weighted median; the
    /// draws only feed the interval and the SE.
    #[must_use]
    pub fn median(&self, var: &str, sample_design: &str) -> EstimateResult {
        let mut out = EstimateResult::empty(EstimateKind::Median, sample_design);
        out.variable = Some(var.to_string());

        let Some(design) = SamplingDesign::parse_estimation(sample_design) else {
            out.error = Some(format!("Unknown sample design: {sample_design}"));
            return out;
        };
        let Some(values) = self.data.numeric(var) else {
            out.error = Some(format!("Column not found: {var}"));
            return out;
        };

        out.estimate = weighted_median(values, self.weights);
        out.psu_count = self.psu_count();
        out.method = Some(EstimateMethod::Bootstrap);
        out.bootstrap_iterations = Some(self.bootstrap_iterations);

        let draws = if design.is_clustered()
            && let Some(cluster) = self.cluster
        {
            let psu_rows = psu_row_indices(cluster);
            let groups = psu_rows.len();
            bootstrap_draws(self.bootstrap_iterations, |rng| {
                let mut boot_values = Vec::with_capacity(values.len());
                let mut boot_weights = Vec::with_capacity(values.len());
                for _ in 0..groups {
                    for &row in &psu_rows[rng.random_range(0..groups)] {
                        boot_values.push(values[row]);
                        boot_weights.push(self.weights[row]);
                    }
                }
                Some(weighted_median(&boot_values, &boot_weights))
            })
        } else {
            let n = values.len();
            bootstrap_draws(self.bootstrap_iterations, |rng| {
                let mut boot_values = Vec::with_capacity(n);
                let mut boot_weights = Vec::with_capacity(n);
                for _ in 0..n {
                    let row = rng.random_range(0..n);
                    boot_values.push(values[row]);
                    boot_weights.push(self.weights[row]);
                }
                Some(weighted_median(&boot_values, &boot_weights))
            })
        };

        if let Some(summary) = summarize(draws) {
            out.standard_error = Some(summary.se);
            out.ci_lower = Some(summary.ci_lower);
            out.ci_upper = Some(summary.ci_upper);
        }
        out
    }

    /// Per-PSU weighted partial sums of two variables, in first-appearance
    /// order so resampling is deterministic.
    fn psu_partial_sums(&self, num_values: &[f64], den_values: &[f64]) -> Vec<(f64, f64)> {
        // Unreachable without a cluster column; the delta branch handles
        // that case.
        let Some(cluster) = self.cluster else {
            return Vec::new();
        };
        let mut sums: Vec<(f64, f64)> = Vec::new();
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, psu) in cluster.iter().enumerate() {
            let slot = *index.entry(psu.as_str()).or_insert_with(|| {
                sums.push((0.0, 0.0));
                sums.len() - 1
            });
            sums[slot].0 += num_values[i] * self.weights[i];
            sums[slot].1 += den_values[i] * self.weights[i];
        }
        sums
    }
}

/// Row indices per PSU, in first-appearance order.
fn psu_row_indices(cluster: &[String]) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, psu) in cluster.iter().enumerate() {
        let slot = *index.entry(psu.as_str()).or_insert_with(|| {
            rows.push(Vec::new());
            rows.len() - 1
        });
        rows[slot].push(i);
    }
    rows
}
