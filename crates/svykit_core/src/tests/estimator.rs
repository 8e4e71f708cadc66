//! Tests for survey-weighted estimation
//!
//! Expectations are hand-computed: self-weighting designs reduce to
//! textbook formulas, and constant-valued datasets make every bootstrap
//! draw collapse to the point estimate exactly.

use crate::error::EstimatorError;
use crate::estimator::SurveyEstimator;
use crate::model::{EstimateMethod, WeightedDataset};

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn dataset(columns: &[(&str, Vec<f64>)], label_columns: &[(&str, Vec<String>)]) -> WeightedDataset {
    let mut data = WeightedDataset::new();
    for (name, values) in columns {
        data.push_numeric(*name, values.clone()).unwrap();
    }
    for (name, values) in label_columns {
        data.push_labels(*name, values.clone()).unwrap();
    }
    data
}

#[test]
fn test_construction_failures() {
    let empty = WeightedDataset::new();
    assert_eq!(
        SurveyEstimator::new(&empty, "w", None, None).err(),
        Some(EstimatorError::EmptyDataset)
    );

    let data = dataset(&[("y", vec![1.0, 2.0])], &[]);
    assert_eq!(
        SurveyEstimator::new(&data, "w", None, None).err(),
        Some(EstimatorError::ColumnNotFound("w".to_string()))
    );

    let data = dataset(&[("y", vec![1.0, 2.0]), ("w", vec![1.0, 0.0])], &[]);
    assert_eq!(
        SurveyEstimator::new(&data, "w", None, None).err(),
        Some(EstimatorError::NonPositiveWeight { row: 1, value: 0.0 })
    );
}

#[test]
fn test_mean_equal_weights_matches_srs_formula() {
    let data = dataset(
        &[
            ("y", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("w", vec![1.0; 5]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.mean("y", "simple_random");

    assert!(result.error.is_none());
    assert_eq!(result.estimate, 3.0);
    // Self-weighting rows-as-PSUs linearization equals sqrt(s^2 / n).
    let se = result.standard_error.unwrap();
    assert!((se - 0.5f64.sqrt()).abs() < 1e-12);
    assert_eq!(result.method, Some(EstimateMethod::Delta));
    assert_eq!(result.design_effect, Some(1.0));
    assert!((result.ci_lower.unwrap() - (3.0 - 1.96 * se)).abs() < 1e-12);
    assert!((result.ci_upper.unwrap() - (3.0 + 1.96 * se)).abs() < 1e-12);
    assert_eq!(result.psu_count, None);
}

#[test]
fn test_mean_clustered_two_psu_exact() {
    // Two PSUs with totals -0.5 and 0.5 of the influence scores give a
    // linearized variance of exactly 1.0.
    let data = dataset(
        &[
            ("y", vec![0.0, 0.0, 2.0, 2.0]),
            ("w", vec![1.0; 4]),
        ],
        &[("psu", labels(&["a", "a", "b", "b"]))],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let result = est.mean("y", "clustered");

    assert_eq!(result.estimate, 1.0);
    assert!((result.standard_error.unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(result.method, Some(EstimateMethod::SurveyCorrected));
    // weighted variance 1.0, n_eff 4 -> SRS variance 0.25 -> deff 4.
    assert!((result.design_effect.unwrap() - 4.0).abs() < 1e-12);
    assert_eq!(result.psu_count, Some(2));
}

#[test]
fn test_proportion_ci_is_clipped() {
    let data = dataset(
        &[
            ("x", vec![1.0, 1.0, 1.0, 1.0, 0.0]),
            ("w", vec![1.0; 5]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.proportion("x", "simple_random");

    assert!((result.estimate - 0.8).abs() < 1e-12);
    // Unclipped upper bound is 0.8 + 1.96 * 0.2 = 1.192.
    assert!((result.standard_error.unwrap() - 0.2).abs() < 1e-12);
    assert_eq!(result.ci_upper, Some(1.0));
    assert!(result.ci_lower.unwrap() > 0.0);
}

#[test]
fn test_unknown_design_sets_error_field() {
    let data = dataset(&[("y", vec![1.0, 2.0]), ("w", vec![1.0, 1.0])], &[]);
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();

    for result in [
        est.mean("y", "OMEGA"),
        est.proportion("y", "OMEGA"),
        est.ratio("y", "y", "OMEGA"),
        est.median("y", "OMEGA"),
        // Stratified is a sizing design, not an estimation design.
        est.mean("y", "stratified"),
    ] {
        assert!(result.is_error(), "{:?}", result.sample_design);
        assert!(result.error.as_deref().is_some_and(|e| e.contains("sample design")));
        assert!(result.method.is_none());
    }
}

#[test]
fn test_missing_column_sets_error_field() {
    let data = dataset(&[("y", vec![1.0, 2.0]), ("w", vec![1.0, 1.0])], &[]);
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.mean("missing", "simple_random");
    assert!(result.is_error());
}

#[test]
fn test_ratio_delta_of_identical_columns_is_one() {
    let data = dataset(
        &[
            ("num", vec![2.0, 4.0, 6.0]),
            ("den", vec![2.0, 4.0, 6.0]),
            ("w", vec![1.0, 2.0, 1.0]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.ratio("num", "den", "simple_random");

    assert_eq!(result.estimate, 1.0);
    assert_eq!(result.method, Some(EstimateMethod::Delta));
    assert!(result.ci_lower.unwrap() <= 1.0);
    assert!(result.ci_upper.unwrap() >= 1.0);
    assert!(result.error.is_none());
}

#[test]
fn test_ratio_zero_denominator_is_nan_not_error() {
    let data = dataset(
        &[
            ("num", vec![1.0, 2.0]),
            ("den", vec![0.0, 0.0]),
            ("w", vec![1.0, 1.0]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.ratio("num", "den", "simple_random");

    assert!(result.estimate.is_nan());
    assert!(result.error.is_none());
    assert!(result.method.is_none());
    assert!(result.standard_error.is_none());
}

#[test]
fn test_ratio_clustered_few_psus_uses_bootstrap() {
    // Three PSUs is below the delta threshold. The numerator is exactly
    // twice the denominator in every row, so every bootstrap draw is 2.0.
    let data = dataset(
        &[
            ("num", vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0]),
            ("den", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("w", vec![1.0; 6]),
        ],
        &[("psu", labels(&["a", "a", "b", "b", "c", "c"]))],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let result = est.ratio("num", "den", "clustered");

    assert_eq!(result.method, Some(EstimateMethod::Bootstrap));
    assert_eq!(result.bootstrap_iterations, Some(500));
    assert_eq!(result.psu_count, Some(3));
    assert_eq!(result.estimate, 2.0);
    assert_eq!(result.standard_error, Some(0.0));
    assert_eq!(result.ci_lower, Some(2.0));
    assert_eq!(result.ci_upper, Some(2.0));
}

#[test]
fn test_ratio_clustered_many_psus_uses_delta() {
    let rows = 40;
    let psus: Vec<String> = (0..rows).map(|i| format!("psu{i}")).collect();
    let data = dataset(
        &[
            ("num", (0..rows).map(|i| i as f64 + 1.0).collect()),
            ("den", vec![1.0; rows]),
            ("w", vec![1.0; rows]),
        ],
        &[("psu", psus)],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let result = est.ratio("num", "den", "clustered");

    assert_eq!(result.method, Some(EstimateMethod::Delta));
    assert_eq!(result.psu_count, Some(rows));
    assert!((result.estimate - 20.5).abs() < 1e-12);
}

#[test]
fn test_ratio_clustered_without_cluster_column_uses_delta() {
    let data = dataset(
        &[
            ("num", vec![2.0, 4.0]),
            ("den", vec![1.0, 2.0]),
            ("w", vec![1.0, 1.0]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.ratio("num", "den", "clustered");
    assert_eq!(result.method, Some(EstimateMethod::Delta));
    assert_eq!(result.psu_count, None);
    assert_eq!(result.estimate, 2.0);
}

#[test]
fn test_median_point_estimate_and_bracketing_ci() {
    let data = dataset(
        &[
            ("y", (1..=9).map(f64::from).collect()),
            ("w", vec![1.0; 9]),
        ],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    let result = est.median("y", "simple_random");

    assert_eq!(result.estimate, 5.0);
    assert_eq!(result.method, Some(EstimateMethod::Bootstrap));
    assert_eq!(result.bootstrap_iterations, Some(500));
    assert!(result.ci_lower.unwrap() <= 5.0);
    assert!(result.ci_upper.unwrap() >= 5.0);
}

#[test]
fn test_median_constant_data_collapses() {
    let data = dataset(
        &[("y", vec![7.0; 8]), ("w", vec![1.0; 8])],
        &[("psu", labels(&["a", "a", "b", "b", "c", "c", "d", "d"]))],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let result = est.median("y", "clustered");

    assert_eq!(result.estimate, 7.0);
    assert_eq!(result.ci_lower, Some(7.0));
    assert_eq!(result.ci_upper, Some(7.0));
    assert_eq!(result.standard_error, Some(0.0));
    assert_eq!(result.psu_count, Some(4));
}

#[test]
fn test_weighted_median_honors_weights() {
    // Half the total weight (3.0) is reached at the first value.
    let data = dataset(
        &[("y", vec![1.0, 2.0, 3.0]), ("w", vec![3.0, 2.0, 1.0])],
        &[],
    );
    let est = SurveyEstimator::new(&data, "w", None, None).unwrap();
    assert_eq!(est.median("y", "simple_random").estimate, 1.0);
}

#[test]
fn test_estimate_result_serializes_with_snake_case_tags() {
    let data = dataset(
        &[("y", vec![1.0, 2.0, 3.0]), ("w", vec![1.0; 3])],
        &[("psu", labels(&["a", "b", "c"]))],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let value = serde_json::to_value(est.mean("y", "clustered")).unwrap();

    assert_eq!(value["kind"], "mean");
    assert_eq!(value["method"], "survey_corrected");
    assert_eq!(value["sample_design"], "clustered");
    assert_eq!(value["psu_count"], 3);
    assert!(value["error"].is_null());
}

#[test]
fn test_bootstrap_results_are_deterministic() {
    let data = dataset(
        &[
            ("num", vec![3.0, 5.0, 2.0, 8.0, 1.0, 9.0]),
            ("den", vec![1.0, 2.0, 1.0, 3.0, 1.0, 2.0]),
            ("w", vec![1.0, 2.0, 1.5, 1.0, 2.0, 1.0]),
        ],
        &[("psu", labels(&["a", "a", "b", "b", "c", "c"]))],
    );
    let est = SurveyEstimator::new(&data, "w", Some("psu"), None).unwrap();
    let first = est.ratio("num", "den", "clustered");
    let second = est.ratio("num", "den", "clustered");
    assert_eq!(first, second);
}
