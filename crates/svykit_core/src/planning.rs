//! Field-planning sizing: how many PSUs and survey days a team roster needs
//! to complete a household sample.

use jiff::civil::Time;

use crate::error::SizingError;
use crate::model::{PlanningResult, SamplingDesign};

/// Minutes between two times of day, ignoring seconds.
#[must_use]
fn elapsed_minutes(start_time: Time, end_time: Time) -> i64 {
    let start = i64::from(start_time.hour()) * 60 + i64::from(start_time.minute());
    let end = i64::from(end_time.hour()) * 60 + i64::from(end_time.minute());
    end - start
}

/// PSU count, per-PSU workload, and survey days for a field plan.
///
/// The working day runs from `start_time` to `end_time`; rest and travel
/// minutes come off the top before any interview capacity is counted. For
/// simple-random and stratified designs the plan is expressed purely in
/// days. For clustered designs the capacity of one team inside one PSU is
/// computed first (floored, a partial interview does not count) and PSUs are
/// then spread over teams and days.
pub fn calculate_planning_parameters(
    design: &str,
    household_sample_size: u64,
    start_time: Time,
    end_time: Time,
    num_teams: u32,
    enumerators_per_team: u32,
    psu_per_team_per_day: u32,
    avg_interview_time: u32,
    avg_travel_time: u32,
    avg_rest_time: u32,
) -> Result<PlanningResult, SizingError> {
    let design = SamplingDesign::parse_sizing(design)?;

    let total_minutes = elapsed_minutes(start_time, end_time);
    let effective_minutes =
        total_minutes - i64::from(avg_rest_time) - i64::from(avg_travel_time);
    if effective_minutes <= 0 {
        return Err(SizingError::NoFieldTime {
            total_minutes,
            rest_minutes: i64::from(avg_rest_time),
            travel_minutes: i64::from(avg_travel_time),
        });
    }
    let effective_minutes = effective_minutes as f64;

    if !design.is_clustered() {
        let capacity =
            effective_minutes * f64::from(num_teams) * f64::from(enumerators_per_team);
        let days = (household_sample_size as f64 * f64::from(avg_interview_time) / capacity)
            .ceil() as u64;
        return Ok(PlanningResult {
            psus_needed: None,
            psu_size: None,
            days_needed: days,
        });
    }

    let psu_size = (effective_minutes / f64::from(psu_per_team_per_day)
        / f64::from(avg_interview_time)
        * f64::from(enumerators_per_team))
    .floor() as u64;
    if psu_size == 0 {
        return Err(SizingError::ZeroPsuCapacity);
    }

    let psus_needed = household_sample_size.div_ceil(psu_size);
    let psus_per_day = u64::from(psu_per_team_per_day) * u64::from(num_teams);
    let days = psus_needed.div_ceil(psus_per_day);

    Ok(PlanningResult {
        psus_needed: Some(psus_needed),
        psu_size: Some(psu_size),
        days_needed: days,
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;

    #[test]
    fn test_srs_plan_is_days_only() {
        // 9:30-17:30 = 480 min, minus 60 rest and 90 travel = 330 effective.
        // 450 households * 30 min / (330 * 4 teams * 3 enumerators) = 3.4...
        let plan = calculate_planning_parameters(
            "simple_random",
            450,
            time(9, 30, 0, 0),
            time(17, 30, 0, 0),
            4,
            3,
            1,
            30,
            90,
            60,
        )
        .unwrap();
        assert_eq!(plan.psus_needed, None);
        assert_eq!(plan.psu_size, None);
        assert_eq!(plan.days_needed, 4);
    }

    #[test]
    fn test_clustered_plan() {
        // 330 effective / 1 psu/day / 30 min * 3 enumerators = 33 households
        // per PSU; 450 / 33 -> 14 PSUs; 14 / (1 * 4 teams) -> 4 days.
        let plan = calculate_planning_parameters(
            "clustered",
            450,
            time(9, 30, 0, 0),
            time(17, 30, 0, 0),
            4,
            3,
            1,
            30,
            90,
            60,
        )
        .unwrap();
        assert_eq!(plan.psus_needed, Some(14));
        assert_eq!(plan.psu_size, Some(33));
        assert_eq!(plan.days_needed, 4);
    }

    #[test]
    fn test_rest_and_travel_consuming_the_day_is_an_error() {
        let err = calculate_planning_parameters(
            "simple_random",
            450,
            time(10, 30, 0, 0),
            time(12, 0, 0, 0),
            4,
            3,
            1,
            30,
            60,
            60,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SizingError::NoFieldTime {
                total_minutes: 90,
                rest_minutes: 60,
                travel_minutes: 60,
            }
        );
    }

    #[test]
    fn test_end_before_start_is_an_error() {
        assert!(matches!(
            calculate_planning_parameters(
                "simple_random",
                450,
                time(17, 30, 0, 0),
                time(9, 30, 0, 0),
                4,
                3,
                1,
                30,
                90,
                60,
            ),
            Err(SizingError::NoFieldTime { .. })
        ));
    }

    #[test]
    fn test_zero_psu_capacity_is_an_error() {
        // 330 effective / 12 psus/day / 60 min * 1 enumerator = 0.45 -> 0.
        assert_eq!(
            calculate_planning_parameters(
                "clustered",
                450,
                time(9, 30, 0, 0),
                time(17, 30, 0, 0),
                4,
                1,
                12,
                60,
                90,
                60,
            ),
            Err(SizingError::ZeroPsuCapacity)
        );
    }

    #[test]
    fn test_unknown_design_rejected() {
        assert!(matches!(
            calculate_planning_parameters(
                "OMEGA",
                450,
                time(9, 30, 0, 0),
                time(17, 30, 0, 0),
                4,
                3,
                1,
                30,
                90,
                60,
            ),
            Err(SizingError::UnknownDesign(_))
        ));
    }
}
