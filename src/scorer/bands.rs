use super::grade::{AppraisalGrade, InteriorRank};
use chrono::{Datelike, NaiveDate};

/// Months between January of the model year and `today`.
///
/// The model year is treated as January of that year. This undercounts the
/// age of most vehicles and the grade bands are tuned against it, so it is
/// kept as is. Model years after `today` yield 0.
pub fn elapsed_months(vehicle_year: i32, today: NaiveDate) -> u32 {
    let years = i64::from(today.year()) - i64::from(vehicle_year);
    let months = years * 12 + i64::from(today.month0());
    months.clamp(0, i64::from(u32::MAX)) as u32
}

/// Best grade the vehicle can reach before defects are considered.
///
/// Repair history caps everything at `R`. Otherwise the first band whose
/// conditions hold wins; mileage limits are exclusive.
pub fn max_grade(
    mileage_km: u32,
    elapsed_months: u32,
    has_repair_history: bool,
    interior_rank: InteriorRank,
    has_exterior_replacement: bool,
) -> AppraisalGrade {
    use InteriorRank::*;

    if has_repair_history {
        return AppraisalGrade::R;
    }

    if mileage_km < 10_000 && elapsed_months <= 12 {
        AppraisalGrade::S
    } else if mileage_km < 30_000 && elapsed_months <= 36 {
        AppraisalGrade::Six
    } else if mileage_km < 50_000 && !has_exterior_replacement {
        AppraisalGrade::Five
    } else if mileage_km < 100_000 && matches!(interior_rank, A | B) {
        AppraisalGrade::FourHalf
    } else if mileage_km < 150_000 && matches!(interior_rank, A | B | C) {
        AppraisalGrade::Four
    } else if mileage_km < 200_000 {
        AppraisalGrade::ThreeHalf
    } else {
        AppraisalGrade::Three
    }
}
