use super::grade::{AppraisalGrade, InteriorRank};
use crate::lenient;
use serde::{Deserialize, Serialize};

/// Raw inputs the engine scores a vehicle on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub mileage_km: u32,
    pub vehicle_year: i32,
    pub interior_rank: InteriorRank,
    pub has_repair_history: bool,
    pub has_exterior_replacement: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreBreakdown {
    // Reference score components (points removed from 100)
    #[serde(deserialize_with = "lenient::float")]
    pub mileage_points: f32,
    #[serde(deserialize_with = "lenient::float")]
    pub age_points: f32,
    #[serde(deserialize_with = "lenient::float")]
    pub interior_points: f32,

    #[serde(deserialize_with = "lenient::number")]
    pub elapsed_months: u32,

    // Defects
    #[serde(deserialize_with = "lenient::number")]
    pub defect_count: usize,
    #[serde(deserialize_with = "lenient::float")]
    pub damage_points: f32, // Catalog-weighted, informational
    #[serde(deserialize_with = "lenient::float")]
    pub deduction: f32, // Grade points removed
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub max_grade: AppraisalGrade,
    pub grade: AppraisalGrade,
    pub reference_score: u8,
    pub breakdown: ScoreBreakdown,
}
