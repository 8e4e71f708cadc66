//! Closed-form sample-size formulas for household and individual surveys.
//!
//! All three calculators share the same skeleton: a normal-approximation
//! base size at a 95% confidence level, an optional finite population
//! correction, a design-effect inflation on the clustered branch only, and a
//! non-response adjustment. Percentage inputs are normalized to fractions
//! once, and the ceiling is applied exactly once per output so intermediate
//! rounding never compounds.

use crate::error::SizingError;
use crate::model::{IndividualHouseholdSize, MortalitySampleSize, SamplingDesign};
use crate::validate::float_in_range;

/// Critical value at 95% confidence for simple-random and stratified designs.
pub const Z_CRITICAL: f64 = 1.96;

/// Critical value at 95% confidence for cluster surveys (t-distribution,
/// 29 degrees of freedom — the conventional 30-cluster planning assumption).
pub const T_CRITICAL_CLUSTER: f64 = 2.045;

/// Critical value for the given design.
#[must_use]
fn critical_value(design: SamplingDesign) -> f64 {
    if design.is_clustered() {
        T_CRITICAL_CLUSTER
    } else {
        Z_CRITICAL
    }
}

/// Fraction of the sample expected to respond.
fn response_rate(non_response: f64) -> Result<f64, SizingError> {
    float_in_range(non_response, "Non-response rate", Some(0.0), Some(100.0))?;
    let rate = (100.0 - non_response) / 100.0;
    if rate <= 0.0 {
        return Err(SizingError::FullNonResponse { non_response });
    }
    Ok(rate)
}

/// Finite population correction: n0 / (1 + (n0 - 1) / N) when enabled.
#[must_use]
fn fpc_correct(n0: f64, population_size: u64, fpc: bool) -> f64 {
    if fpc {
        n0 / (1.0 + (n0 - 1.0) / population_size as f64)
    } else {
        n0
    }
}

/// Design effect for the clustered branch; ignored (and allowed absent)
/// otherwise.
fn clustered_design_effect(
    design: SamplingDesign,
    design_effect: Option<f64>,
) -> Result<f64, SizingError> {
    if !design.is_clustered() {
        return Ok(1.0);
    }
    let deff = design_effect.ok_or(SizingError::MissingDesignEffect)?;
    float_in_range(deff, "Design effect", Some(1.0), None)?;
    Ok(deff)
}

/// Unrounded proportion-based sample size shared by the basic and
/// individual-to-household calculators.
fn base_size(
    design: SamplingDesign,
    population_size: u64,
    proportion: f64,
    margin_of_error: f64,
    design_effect: Option<f64>,
    fpc: bool,
) -> Result<f64, SizingError> {
    float_in_range(proportion, "Proportion", Some(0.0), Some(100.0))?;
    float_in_range(margin_of_error, "Margin of error", Some(0.0), Some(100.0))?;
    if margin_of_error == 0.0 {
        return Err(SizingError::ZeroMarginOfError);
    }

    let crit = critical_value(design);
    let deff = clustered_design_effect(design, design_effect)?;
    let p = proportion / 100.0;
    let e = margin_of_error / 100.0;

    let n0 = crit.powi(2) * p * (1.0 - p) / e.powi(2);
    Ok(fpc_correct(n0, population_size, fpc) * deff)
}

/// Sample size of individuals or households at 95% confidence.
///
/// `design_effect` is required for (and only applied to) clustered designs.
/// The ceiling is applied once, after the non-response adjustment.
pub fn calculate_sample_size(
    design: &str,
    population_size: u64,
    proportion: f64,
    margin_of_error: f64,
    non_response: f64,
    design_effect: Option<f64>,
    fpc: bool,
) -> Result<u64, SizingError> {
    let design = SamplingDesign::parse_sizing(design)?;
    let n = base_size(
        design,
        population_size,
        proportion,
        margin_of_error,
        design_effect,
        fpc,
    )?;
    let rate = response_rate(non_response)?;
    Ok((n / rate).ceil() as u64)
}

/// Individual sample size converted to an estimated household count.
///
/// The individual size uses individual-scoped proportion, margin of error and
/// design effect. Households assume every eligible individual in a sampled
/// household is selected: `n_hh = n_ind / (household_size * prop_sub)`, then
/// the non-response adjustment. The two outputs are ceiled independently
/// from the unrounded individual size.
pub fn calculate_sample_size_ind_to_hh(
    design: &str,
    population_size: u64,
    proportion: f64,
    margin_of_error: f64,
    non_response: f64,
    design_effect: Option<f64>,
    fpc: bool,
    household_size: f64,
    prop_subpopulation: f64,
) -> Result<IndividualHouseholdSize, SizingError> {
    let design = SamplingDesign::parse_sizing(design)?;
    float_in_range(household_size, "Average household size", Some(1.0), Some(50.0))?;
    float_in_range(
        prop_subpopulation,
        "Proportion of subpopulation",
        Some(0.0),
        Some(100.0),
    )?;
    if prop_subpopulation == 0.0 {
        return Err(SizingError::ZeroSubpopulation);
    }

    let n_ind = base_size(
        design,
        population_size,
        proportion,
        margin_of_error,
        design_effect,
        fpc,
    )?;
    let rate = response_rate(non_response)?;
    let n_hh = n_ind / (household_size * prop_subpopulation / 100.0) / rate;

    Ok(IndividualHouseholdSize {
        individuals: n_ind.ceil() as u64,
        households: n_hh.ceil() as u64,
    })
}

/// Sample size for a mortality-rate estimate over a recall period.
///
/// `mortality_rate` is deaths per 10,000 per day and `margin_of_error` is on
/// the same scale. Person-time is individuals under observation times the
/// recall period; households divide individuals by the average household
/// size with the non-response adjustment. Each output is ceiled
/// independently from the unrounded individual size.
pub fn calculate_sample_size_mortality_rate(
    design: &str,
    population_size: u64,
    mortality_rate: f64,
    margin_of_error: f64,
    non_response: f64,
    design_effect: Option<f64>,
    fpc: bool,
    recall_period: u32,
    household_size: f64,
) -> Result<MortalitySampleSize, SizingError> {
    let design = SamplingDesign::parse_sizing(design)?;
    float_in_range(mortality_rate, "Mortality rate", Some(0.0), Some(50.0))?;
    float_in_range(margin_of_error, "Margin of error for rates", Some(0.0), Some(50.0))?;
    float_in_range(household_size, "Average household size", Some(1.0), Some(50.0))?;
    if margin_of_error == 0.0 {
        return Err(SizingError::ZeroMarginOfError);
    }
    if recall_period == 0 {
        return Err(SizingError::ZeroRecallPeriod);
    }

    let crit = critical_value(design);
    let deff = clustered_design_effect(design, design_effect)?;
    let rate = response_rate(non_response)?;

    let r = mortality_rate / 10_000.0;
    let d = margin_of_error / 10_000.0;

    let numerator = crit.powi(2) * r * (1.0 - r) * deff;
    let n0 = numerator / (d.powi(2) * f64::from(recall_period));
    let n_ind = fpc_correct(n0, population_size, fpc);

    Ok(MortalitySampleSize {
        individuals: n_ind.ceil() as u64,
        person_time: (n_ind * f64::from(recall_period)).ceil() as u64,
        households: (n_ind / household_size / rate).ceil() as u64,
    })
}
