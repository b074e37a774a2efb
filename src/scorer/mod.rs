pub mod bands;
pub mod deduction;
pub mod grade;
pub mod reference;
pub mod types;

pub use self::grade::{AppraisalGrade, InteriorRank};
pub use self::types::{Evaluation, ScoreBreakdown, ScoreInput};
use self::reference::ReferenceTable;
use crate::config::ReferenceWeights;
use crate::consts::DEFAULT_INTERIOR_PENALTIES;
use crate::error::AppraisalResult;
use crate::registry::DefectRegistry;
use chrono::NaiveDate;
use tracing::debug;

/// Score engine bound to a set of reference weights.
///
/// Everything here is pure: the only notion of time is the `today` argument.
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ReferenceWeights,
    table: ReferenceTable,
}

impl Default for Scorer {
    fn default() -> Self {
        let weights = ReferenceWeights::default();
        let penalties = weights
            .get_interior_penalties()
            .unwrap_or(DEFAULT_INTERIOR_PENALTIES);
        let table = ReferenceTable::new(&weights, penalties);
        Self { weights, table }
    }
}

impl Scorer {
    pub fn new(weights: ReferenceWeights) -> AppraisalResult<Self> {
        let table = ReferenceTable::new(&weights, weights.get_interior_penalties()?);
        Ok(Self { weights, table })
    }

    pub fn weights(&self) -> &ReferenceWeights {
        &self.weights
    }

    /// Upper-bound grade, deduction, final grade and reference score.
    pub fn evaluate(
        &self,
        input: &ScoreInput,
        registry: &DefectRegistry,
        today: NaiveDate,
    ) -> Evaluation {
        let months = bands::elapsed_months(input.vehicle_year, today);
        let replaced = input.has_exterior_replacement || registry.has_replacement();

        let max_grade = bands::max_grade(
            input.mileage_km,
            months,
            input.has_repair_history,
            input.interior_rank,
            replaced,
        );

        let mut breakdown = ScoreBreakdown {
            defect_count: registry.total_defect_count(),
            damage_points: registry.weighted_cost(),
            deduction: deduction::deduction(registry.defects()),
            ..Default::default()
        };
        let grade = if max_grade == AppraisalGrade::R {
            AppraisalGrade::R
        } else {
            deduction::apply_deduction(max_grade, breakdown.deduction)
        };
        let reference_score = reference::reference_score(
            input.mileage_km,
            months,
            input.interior_rank,
            &self.table,
            &mut breakdown,
        );

        debug!(
            "Scored {} km / {} months / interior {}: max {} - {} => {} (ref {})",
            input.mileage_km,
            months,
            input.interior_rank,
            max_grade,
            breakdown.deduction,
            grade,
            reference_score
        );

        Evaluation {
            max_grade,
            grade,
            reference_score,
            breakdown,
        }
    }
}
