//! Integration tests for the survey sizing and estimation engine
//!
//! Tests are organized by topic:
//! - `sample_size` - Reference scenarios cross-checked against external
//!   sample-size calculators, plus sizing invariants
//! - `params` - SurveyParameters defaults, validated setters, result caching
//! - `estimator` - Weighted estimation with exact hand-computed expectations

mod estimator;
