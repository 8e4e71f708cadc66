//! Survey parameter configuration.
//!
//! [`SurveyParameters`] is the mutable counterpart of the pure calculators in
//! [`crate::sample_size`] and [`crate::planning`]: it owns one value per
//! survey input, starts from documented defaults, and only changes through
//! setters that coerce and range-check raw text. Compute methods fill in the
//! defaults and delegate to the pure functions, caching the result on the
//! object.
//!
//! Cached results are not invalidated when a parameter changes; callers
//! recompute after edits and read the cache afterwards.

use jiff::civil::{Time, time};
use serde::{Deserialize, Serialize};

use crate::error::{SizingError, ValidateError};
use crate::model::{
    IndividualHouseholdSize, MortalitySampleSize, PlanningResult, SamplingDesign,
};
use crate::planning::calculate_planning_parameters;
use crate::sample_size::{
    calculate_sample_size, calculate_sample_size_ind_to_hh,
    calculate_sample_size_mortality_rate,
};
use crate::validate::{choice, float_in_range, int_in_range, parse_float, parse_int, parse_time};

/// All inputs to the sample-size and field-planning calculators, with
/// defaults suitable for a mid-size household survey.
///
/// Three of the sizing parameter groups repeat the same proportion / margin
/// of error / non-response / design-effect quartet: one scoped to the whole
/// household sample, one to an individual subpopulation, and one to
/// mortality rates. They are deliberately independent fields so a user can
/// tune one calculator without disturbing another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyParameters {
    sample_design: SamplingDesign,
    total_population: u64,
    fpc: bool,

    proportion: f64,
    margin_of_error: f64,
    non_response: f64,
    design_effect: f64,

    proportion_ind: f64,
    margin_of_error_ind: f64,
    non_response_ind: f64,
    design_effect_ind: f64,
    average_household_size: f64,
    prop_subpopulation: f64,

    mortality_rate: f64,
    margin_of_error_rate: f64,
    non_response_rate: f64,
    design_effect_rate: f64,
    average_household_size_rate: f64,
    recall_period: u32,

    planning_sample_size: u64,
    num_days: u32,
    num_enumerators_per_team: u32,
    num_teams: u32,
    psu_per_team_per_day: u32,
    start_time: Time,
    end_time: Time,
    average_interview_time: u32,
    average_travel_time: u32,
    average_rest_time: u32,

    result_sample_size: Option<u64>,
    result_ind_to_hh: Option<IndividualHouseholdSize>,
    result_mortality: Option<MortalitySampleSize>,
    result_planning: Option<PlanningResult>,
}

impl Default for SurveyParameters {
    fn default() -> Self {
        Self {
            sample_design: SamplingDesign::SimpleRandom,
            total_population: 20_000,
            fpc: true,

            proportion: 50.0,
            margin_of_error: 5.5,
            non_response: 3.5,
            design_effect: 1.0,

            proportion_ind: 50.0,
            margin_of_error_ind: 5.5,
            non_response_ind: 3.5,
            design_effect_ind: 1.0,
            average_household_size: 4.5,
            prop_subpopulation: 20.0,

            mortality_rate: 0.1,
            margin_of_error_rate: 0.05,
            non_response_rate: 10.0,
            design_effect_rate: 1.0,
            average_household_size_rate: 4.5,
            recall_period: 90,

            planning_sample_size: 450,
            num_days: 12,
            num_enumerators_per_team: 3,
            num_teams: 4,
            psu_per_team_per_day: 1,
            start_time: time(9, 30, 0, 0),
            end_time: time(17, 30, 0, 0),
            average_interview_time: 30,
            average_travel_time: 90,
            average_rest_time: 60,

            result_sample_size: None,
            result_ind_to_hh: None,
            result_mortality: None,
            result_planning: None,
        }
    }
}

impl SurveyParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Setters ===
    //
    // Every setter takes raw text from the adapter layer, coerces it through
    // `validate`, and stores the coerced value only on success. Reading the
    // field back therefore always yields the coerced value.

    pub fn set_sample_design(&mut self, raw: &str) -> Result<(), ValidateError> {
        let value = choice(raw, SamplingDesign::SIZING_DESIGNS, "Sample design")?;
        // Membership in SIZING_DESIGNS guarantees the parse succeeds.
        if let Some(design) = SamplingDesign::parse(value) {
            self.sample_design = design;
        }
        Ok(())
    }

    pub fn set_total_population(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_int(raw, "Total population")?;
        self.total_population = int_in_range(v, "Total population", Some(1), None)? as u64;
        Ok(())
    }

    pub fn set_fpc(&mut self, raw: &str) -> Result<(), ValidateError> {
        self.fpc = crate::validate::parse_bool(raw, "FPC selection")?;
        Ok(())
    }

    pub fn set_proportion(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_float(raw, "Proportion")?;
        self.proportion = float_in_range(v, "Proportion", Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_margin_of_error(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_float(raw, "Margin of error")?;
        self.margin_of_error = float_in_range(v, "Margin of error", Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_non_response(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_float(raw, "Non-response rate")?;
        self.non_response = float_in_range(v, "Non-response rate", Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_design_effect(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_float(raw, "Design effect")?;
        self.design_effect = float_in_range(v, "Design effect", Some(1.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_proportion_ind(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Proportion for individual sample";
        let v = parse_float(raw, name)?;
        self.proportion_ind = float_in_range(v, name, Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_margin_of_error_ind(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Margin of error for individual sample";
        let v = parse_float(raw, name)?;
        self.margin_of_error_ind = float_in_range(v, name, Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_non_response_ind(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Non-response rate for individual sample";
        let v = parse_float(raw, name)?;
        self.non_response_ind = float_in_range(v, name, Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_design_effect_ind(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Design effect for individual sample";
        let v = parse_float(raw, name)?;
        self.design_effect_ind = float_in_range(v, name, Some(1.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_average_household_size(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Average household size";
        let v = parse_float(raw, name)?;
        self.average_household_size = float_in_range(v, name, Some(1.0), Some(50.0))?;
        Ok(())
    }

    pub fn set_prop_subpopulation(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Proportion of subpopulation";
        let v = parse_float(raw, name)?;
        self.prop_subpopulation = float_in_range(v, name, Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_mortality_rate(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_float(raw, "Mortality rate")?;
        self.mortality_rate = float_in_range(v, "Mortality rate", Some(0.0), Some(50.0))?;
        Ok(())
    }

    pub fn set_margin_of_error_rate(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Margin of error for rates";
        let v = parse_float(raw, name)?;
        self.margin_of_error_rate = float_in_range(v, name, Some(0.0), Some(50.0))?;
        Ok(())
    }

    pub fn set_non_response_rate(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Non-response rate for rates";
        let v = parse_float(raw, name)?;
        self.non_response_rate = float_in_range(v, name, Some(0.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_design_effect_rate(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Design effect for rates";
        let v = parse_float(raw, name)?;
        self.design_effect_rate = float_in_range(v, name, Some(1.0), Some(100.0))?;
        Ok(())
    }

    pub fn set_average_household_size_rate(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Average household size for rates";
        let v = parse_float(raw, name)?;
        self.average_household_size_rate = float_in_range(v, name, Some(1.0), Some(50.0))?;
        Ok(())
    }

    pub fn set_recall_period(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_int(raw, "Recall period")?;
        self.recall_period = int_in_range(v, "Recall period", Some(0), Some(1000))? as u32;
        Ok(())
    }

    pub fn set_planning_sample_size(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Number of planned surveys";
        let v = parse_int(raw, name)?;
        self.planning_sample_size = int_in_range(v, name, Some(1), Some(100_000))? as u64;
        Ok(())
    }

    pub fn set_num_days(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Number of survey days";
        let v = parse_int(raw, name)?;
        self.num_days = int_in_range(v, name, Some(1), Some(1000))? as u32;
        Ok(())
    }

    pub fn set_num_enumerators_per_team(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Number of enumerators per team";
        let v = parse_int(raw, name)?;
        self.num_enumerators_per_team = int_in_range(v, name, Some(1), Some(1000))? as u32;
        Ok(())
    }

    pub fn set_num_teams(&mut self, raw: &str) -> Result<(), ValidateError> {
        let v = parse_int(raw, "Number of teams")?;
        self.num_teams = int_in_range(v, "Number of teams", Some(1), Some(100))? as u32;
        Ok(())
    }

    pub fn set_psu_per_team_per_day(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Number of PSUs per team per day";
        let v = parse_int(raw, name)?;
        self.psu_per_team_per_day = int_in_range(v, name, Some(1), Some(100))? as u32;
        Ok(())
    }

    pub fn set_start_time(&mut self, raw: &str) -> Result<(), ValidateError> {
        self.start_time = parse_time(raw, "Daily start time")?;
        Ok(())
    }

    pub fn set_end_time(&mut self, raw: &str) -> Result<(), ValidateError> {
        self.end_time = parse_time(raw, "Daily end time")?;
        Ok(())
    }

    pub fn set_average_interview_time(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Average interview time";
        let v = parse_int(raw, name)?;
        self.average_interview_time = int_in_range(v, name, Some(1), Some(600))? as u32;
        Ok(())
    }

    pub fn set_average_travel_time(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Average travel time";
        let v = parse_int(raw, name)?;
        self.average_travel_time = int_in_range(v, name, Some(1), Some(600))? as u32;
        Ok(())
    }

    pub fn set_average_rest_time(&mut self, raw: &str) -> Result<(), ValidateError> {
        let name = "Average rest time";
        let v = parse_int(raw, name)?;
        self.average_rest_time = int_in_range(v, name, Some(1), Some(600))? as u32;
        Ok(())
    }

    // === Getters ===

    #[must_use]
    pub fn sample_design(&self) -> &'static str {
        self.sample_design.as_str()
    }

    #[must_use]
    pub fn total_population(&self) -> u64 {
        self.total_population
    }

    #[must_use]
    pub fn fpc(&self) -> bool {
        self.fpc
    }

    #[must_use]
    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    #[must_use]
    pub fn margin_of_error(&self) -> f64 {
        self.margin_of_error
    }

    #[must_use]
    pub fn non_response(&self) -> f64 {
        self.non_response
    }

    #[must_use]
    pub fn design_effect(&self) -> f64 {
        self.design_effect
    }

    #[must_use]
    pub fn proportion_ind(&self) -> f64 {
        self.proportion_ind
    }

    #[must_use]
    pub fn margin_of_error_ind(&self) -> f64 {
        self.margin_of_error_ind
    }

    #[must_use]
    pub fn non_response_ind(&self) -> f64 {
        self.non_response_ind
    }

    #[must_use]
    pub fn design_effect_ind(&self) -> f64 {
        self.design_effect_ind
    }

    #[must_use]
    pub fn average_household_size(&self) -> f64 {
        self.average_household_size
    }

    #[must_use]
    pub fn prop_subpopulation(&self) -> f64 {
        self.prop_subpopulation
    }

    #[must_use]
    pub fn mortality_rate(&self) -> f64 {
        self.mortality_rate
    }

    #[must_use]
    pub fn margin_of_error_rate(&self) -> f64 {
        self.margin_of_error_rate
    }

    #[must_use]
    pub fn non_response_rate(&self) -> f64 {
        self.non_response_rate
    }

    #[must_use]
    pub fn design_effect_rate(&self) -> f64 {
        self.design_effect_rate
    }

    #[must_use]
    pub fn average_household_size_rate(&self) -> f64 {
        self.average_household_size_rate
    }

    #[must_use]
    pub fn recall_period(&self) -> u32 {
        self.recall_period
    }

    #[must_use]
    pub fn planning_sample_size(&self) -> u64 {
        self.planning_sample_size
    }

    #[must_use]
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    #[must_use]
    pub fn num_enumerators_per_team(&self) -> u32 {
        self.num_enumerators_per_team
    }

    #[must_use]
    pub fn num_teams(&self) -> u32 {
        self.num_teams
    }

    #[must_use]
    pub fn psu_per_team_per_day(&self) -> u32 {
        self.psu_per_team_per_day
    }

    #[must_use]
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> Time {
        self.end_time
    }

    #[must_use]
    pub fn average_interview_time(&self) -> u32 {
        self.average_interview_time
    }

    #[must_use]
    pub fn average_travel_time(&self) -> u32 {
        self.average_travel_time
    }

    #[must_use]
    pub fn average_rest_time(&self) -> u32 {
        self.average_rest_time
    }

    // === Cached results ===

    #[must_use]
    pub fn result_sample_size(&self) -> Option<u64> {
        self.result_sample_size
    }

    #[must_use]
    pub fn result_ind_to_hh(&self) -> Option<IndividualHouseholdSize> {
        self.result_ind_to_hh
    }

    #[must_use]
    pub fn result_mortality(&self) -> Option<MortalitySampleSize> {
        self.result_mortality
    }

    #[must_use]
    pub fn result_planning(&self) -> Option<PlanningResult> {
        self.result_planning
    }

    // === Computation ===
    //
    // Each compute method overwrites its cache slot in a single assignment,
    // after the calculator has fully succeeded.

    /// Household sample size from the general parameter group.
    pub fn compute_sample_size(&mut self) -> Result<u64, SizingError> {
        let n = calculate_sample_size(
            self.sample_design.as_str(),
            self.total_population,
            self.proportion,
            self.margin_of_error,
            self.non_response,
            Some(self.design_effect),
            self.fpc,
        )?;
        self.result_sample_size = Some(n);
        Ok(n)
    }

    /// Individual and household sizes from the individual parameter group.
    pub fn compute_sample_size_ind_to_hh(
        &mut self,
    ) -> Result<IndividualHouseholdSize, SizingError> {
        let result = calculate_sample_size_ind_to_hh(
            self.sample_design.as_str(),
            self.total_population,
            self.proportion_ind,
            self.margin_of_error_ind,
            self.non_response_ind,
            Some(self.design_effect_ind),
            self.fpc,
            self.average_household_size,
            self.prop_subpopulation,
        )?;
        self.result_ind_to_hh = Some(result);
        Ok(result)
    }

    /// Mortality-rate sample sizes from the rate parameter group.
    pub fn compute_sample_size_mortality_rate(
        &mut self,
    ) -> Result<MortalitySampleSize, SizingError> {
        let result = calculate_sample_size_mortality_rate(
            self.sample_design.as_str(),
            self.total_population,
            self.mortality_rate,
            self.margin_of_error_rate,
            self.non_response_rate,
            Some(self.design_effect_rate),
            self.fpc,
            self.recall_period,
            self.average_household_size_rate,
        )?;
        self.result_mortality = Some(result);
        Ok(result)
    }

    /// Field plan from the planning parameter group.
    pub fn compute_planning_parameters(&mut self) -> Result<PlanningResult, SizingError> {
        let result = calculate_planning_parameters(
            self.sample_design.as_str(),
            self.planning_sample_size,
            self.start_time,
            self.end_time,
            self.num_teams,
            self.num_enumerators_per_team,
            self.psu_per_team_per_day,
            self.average_interview_time,
            self.average_travel_time,
            self.average_rest_time,
        )?;
        self.result_planning = Some(result);
        Ok(result)
    }
}
