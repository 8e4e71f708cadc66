//! Survey sampling design and estimation library
//!
//! This crate provides the numeric core for planning and analyzing household
//! surveys. It supports:
//! - Closed-form sample-size formulas (simple-random, stratified, clustered)
//!   with finite population correction and design effects
//! - Individual-to-household conversion and mortality/recall-period sizing
//! - Field-planning sizing (PSUs, per-PSU workload, survey days)
//! - Survey-weighted estimation: mean, proportion, ratio, and median with
//!   delta-method or cluster-bootstrap confidence intervals and
//!   design-effect diagnostics
//!
//! # Quick start
//!
//! ```ignore
//! use svykit_core::config::SurveyParameters;
//!
//! let mut params = SurveyParameters::new();
//! params.set_total_population("5000")?;
//! params.set_margin_of_error("10")?;
//! let n = params.compute_sample_size()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod estimator;
pub mod planning;
pub mod sample_size;
pub mod validate;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SurveyParameters;
pub use estimator::SurveyEstimator;
pub use model::{EstimateResult, WeightedDataset};
