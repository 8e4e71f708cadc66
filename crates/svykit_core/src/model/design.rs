use serde::{Deserialize, Serialize};

use crate::error::SizingError;

/// Sampling design of a survey.
///
/// `Stratified` sizes like `SimpleRandom` (per-stratum allocation happens
/// outside this engine), and `Systematic` estimates like `SimpleRandom`.
/// Sizing accepts `simple_random`/`stratified`/`clustered`; estimation
/// accepts `simple_random`/`systematic`/`clustered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingDesign {
    SimpleRandom,
    Stratified,
    Systematic,
    Clustered,
}

impl SamplingDesign {
    /// Design strings accepted by the sample-size and planning calculators.
    pub const SIZING_DESIGNS: &'static [&'static str] =
        &["simple_random", "stratified", "clustered"];

    /// Design strings accepted by the estimator.
    pub const ESTIMATION_DESIGNS: &'static [&'static str] =
        &["simple_random", "systematic", "clustered"];

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple_random" => Some(Self::SimpleRandom),
            "stratified" => Some(Self::Stratified),
            "systematic" => Some(Self::Systematic),
            "clustered" => Some(Self::Clustered),
            _ => None,
        }
    }

    /// Parse a design string for a sizing/planning operation.
    pub fn parse_sizing(s: &str) -> Result<Self, SizingError> {
        match Self::parse(s) {
            Some(design) if design != Self::Systematic => Ok(design),
            _ => Err(SizingError::UnknownDesign(s.to_string())),
        }
    }

    /// Parse a design string for an estimation operation. `None` maps to the
    /// estimator's tolerant error channel, not a raised error.
    #[must_use]
    pub fn parse_estimation(s: &str) -> Option<Self> {
        match Self::parse(s) {
            Some(Self::Stratified) | None => None,
            design => design,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleRandom => "simple_random",
            Self::Stratified => "stratified",
            Self::Systematic => "systematic",
            Self::Clustered => "clustered",
        }
    }

    #[must_use]
    pub fn is_clustered(self) -> bool {
        self == Self::Clustered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for s in ["simple_random", "stratified", "systematic", "clustered"] {
            assert_eq!(SamplingDesign::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(SamplingDesign::parse("OMEGA"), None);
    }

    #[test]
    fn test_sizing_rejects_systematic_and_unknown() {
        assert_eq!(
            SamplingDesign::parse_sizing("stratified"),
            Ok(SamplingDesign::Stratified)
        );
        assert!(matches!(
            SamplingDesign::parse_sizing("systematic"),
            Err(SizingError::UnknownDesign(_))
        ));
        assert!(matches!(
            SamplingDesign::parse_sizing("OMEGA"),
            Err(SizingError::UnknownDesign(_))
        ));
    }

    #[test]
    fn test_estimation_rejects_stratified() {
        assert_eq!(
            SamplingDesign::parse_estimation("systematic"),
            Some(SamplingDesign::Systematic)
        );
        assert_eq!(SamplingDesign::parse_estimation("stratified"), None);
        assert_eq!(SamplingDesign::parse_estimation("OMEGA"), None);
    }
}
