use super::grade::InteriorRank;
use super::types::ScoreBreakdown;
use crate::config::ReferenceWeights;

/// Resolved reference-score weights (see `config::ReferenceWeights`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceTable {
    pub mileage_points_per_10k: f32,
    pub mileage_points_cap: f32,
    pub age_points_per_year: f32,
    pub age_points_cap: f32,
    pub interior_penalties: [f32; 5],
}

impl ReferenceTable {
    pub fn new(weights: &ReferenceWeights, interior_penalties: [f32; 5]) -> Self {
        Self {
            mileage_points_per_10k: weights.mileage_points_per_10k,
            mileage_points_cap: weights.mileage_points_cap,
            age_points_per_year: weights.age_points_per_year,
            age_points_cap: weights.age_points_cap,
            interior_penalties,
        }
    }
}

fn capped(points: f32, cap: f32) -> f32 {
    if points.is_finite() {
        points.clamp(0.0, cap.max(0.0))
    } else {
        0.0
    }
}

/// Informational 0..=100 score from mileage, age and interior condition.
///
/// Fills the reference components of `breakdown` and returns the score.
pub fn reference_score(
    mileage_km: u32,
    elapsed_months: u32,
    interior_rank: InteriorRank,
    table: &ReferenceTable,
    breakdown: &mut ScoreBreakdown,
) -> u8 {
    let mileage = capped(
        mileage_km as f32 / 10_000.0 * table.mileage_points_per_10k,
        table.mileage_points_cap,
    );
    let age = capped(
        elapsed_months as f32 / 12.0 * table.age_points_per_year,
        table.age_points_cap,
    );
    let interior = capped(table.interior_penalties[interior_rank.index()], 100.0);

    breakdown.mileage_points = mileage;
    breakdown.age_points = age;
    breakdown.interior_points = interior;
    breakdown.elapsed_months = elapsed_months;

    (100.0 - mileage - age - interior).clamp(0.0, 100.0).round() as u8
}
