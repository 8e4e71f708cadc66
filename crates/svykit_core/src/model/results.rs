//! Result types returned by the sizing calculators and the estimator.

use serde::{Deserialize, Serialize};

/// Individual and household sample sizes from the individual-to-household
/// conversion. Each is ceiled independently of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualHouseholdSize {
    pub individuals: u64,
    pub households: u64,
}

/// Sample sizes from the mortality/recall-period formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortalitySampleSize {
    pub individuals: u64,
    /// Person-time denominator: individuals under observation times the
    /// recall period in days.
    pub person_time: u64,
    pub households: u64,
}

/// Field-planning output.
///
/// `psus_needed` and `psu_size` are populated for clustered designs only;
/// simple-random and stratified plans are expressed purely in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningResult {
    pub psus_needed: Option<u64>,
    /// Households a single team can complete within one PSU per day.
    pub psu_size: Option<u64>,
    pub days_needed: u64,
}

/// Which statistic an [`EstimateResult`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateKind {
    Mean,
    Proportion,
    Ratio,
    Median,
}

/// How the standard error / confidence interval was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMethod {
    /// First-order (delta method) approximation under simple random sampling.
    Delta,
    /// Taylor-linearized variance with between-PSU correction.
    SurveyCorrected,
    /// Percentile interval over resampled draws.
    Bootstrap,
}

/// A single survey-weighted estimate with its uncertainty and diagnostics.
///
/// Statistical edge cases (unknown design string, degenerate inputs) populate
/// `error` instead of raising, so reporting code can branch on the field and
/// still render the rest of a results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub kind: EstimateKind,
    /// Outcome variable for mean/proportion/median estimates.
    pub variable: Option<String>,
    /// Numerator variable for ratio estimates.
    pub numerator: Option<String>,
    /// Denominator variable for ratio estimates.
    pub denominator: Option<String>,
    /// Point estimate. NaN for a ratio with a zero denominator.
    pub estimate: f64,
    pub standard_error: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    /// Ratio of the design variance to the simple-random variance at the
    /// Kish effective sample size. `None` when the SRS variance is zero.
    pub design_effect: Option<f64>,
    pub method: Option<EstimateMethod>,
    pub sample_design: String,
    /// Unique PSU count, when a cluster vector was supplied.
    pub psu_count: Option<usize>,
    pub bootstrap_iterations: Option<usize>,
    pub error: Option<String>,
}

impl EstimateResult {
    /// Skeleton result with everything unset except identity fields.
    pub(crate) fn empty(kind: EstimateKind, sample_design: &str) -> Self {
        Self {
            kind,
            variable: None,
            numerator: None,
            denominator: None,
            estimate: f64::NAN,
            standard_error: None,
            ci_lower: None,
            ci_upper: None,
            design_effect: None,
            method: None,
            sample_design: sample_design.to_string(),
            psu_count: None,
            bootstrap_iterations: None,
            error: None,
        }
    }

    /// True when the estimate carries a populated error field.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
