//! Core type definitions: sampling designs, datasets, and result structs.

mod dataset;
mod design;
mod results;

pub use dataset::WeightedDataset;
pub use design::SamplingDesign;
pub use results::{
    EstimateKind, EstimateMethod, EstimateResult, IndividualHouseholdSize, MortalitySampleSize,
    PlanningResult,
};
