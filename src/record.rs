use crate::consts::MAX_INSPECTOR_COMMENTS;
use crate::registry::DefectRegistry;
use crate::scorer::{AppraisalGrade, InteriorRank, ScoreBreakdown, ScoreInput, Scorer};
use chrono::{DateTime, Utc};
use crate::lenient;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::info;
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceRecordStatus {
    Present,
    Absent,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleSpec {
    #[serde(deserialize_with = "lenient::string")]
    pub model_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub model_name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub year: i32,
    #[serde(deserialize_with = "lenient::number")]
    pub mileage_km: u32,
    #[serde(alias = "maintenanceRecord", deserialize_with = "lenient::or_default")]
    pub maintenance_record_status: MaintenanceRecordStatus,
    #[serde(deserialize_with = "lenient::strings")]
    pub inspector_comments: Vec<String>,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub vehicle_image_ref: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub vin: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_no: Option<String>,
    /// Grade printed on the auction sheet, as scanned. Shown to the
    /// inspector only; never an input to scoring.
    #[serde(
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub auction_grade: Option<String>,
}

impl VehicleSpec {
    /// Adds a comment unless the comment list is full.
    pub fn add_comment(&mut self, comment: &str) -> bool {
        let comment = comment.trim();
        if comment.is_empty() || self.inspector_comments.len() >= MAX_INSPECTOR_COMMENTS {
            return false;
        }
        self.inspector_comments.push(comment.to_string());
        true
    }

    /// Drops blank comments and anything past the comment limit.
    pub fn normalize(&mut self) {
        self.inspector_comments.retain(|c| !c.trim().is_empty());
        self.inspector_comments.truncate(MAX_INSPECTOR_COMMENTS);
    }
}

/// Everything the inspector submits alongside the defect diagram.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EvaluationInput {
    pub vehicle_spec: VehicleSpec,
    pub interior_rank: InteriorRank,
    #[builder(default = false)]
    pub has_repair_history: bool,
    #[builder(default = false)]
    pub has_exterior_replacement: bool,
}

impl EvaluationInput {
    pub fn score_input(&self) -> ScoreInput {
        ScoreInput {
            mileage_km: self.vehicle_spec.mileage_km,
            vehicle_year: self.vehicle_spec.year,
            interior_rank: self.interior_rank,
            has_repair_history: self.has_repair_history,
            has_exterior_replacement: self.has_exterior_replacement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalRecord {
    pub id: Uuid,
    pub vehicle_spec: VehicleSpec,
    pub interior_rank: InteriorRank,
    pub has_repair_history: bool,
    pub has_exterior_replacement: bool,
    pub max_grade: AppraisalGrade,
    pub computed_grade: AppraisalGrade,
    pub reference_score: u8,
    pub breakdown: ScoreBreakdown,
    pub defects: DefectRegistry,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppraisalRecord {
    pub fn input(&self) -> EvaluationInput {
        EvaluationInput {
            vehicle_spec: self.vehicle_spec.clone(),
            interior_rank: self.interior_rank,
            has_repair_history: self.has_repair_history,
            has_exterior_replacement: self.has_exterior_replacement,
        }
    }
}

/// Turns an evaluation submission into a self-contained record.
#[derive(Debug, Clone, Default)]
pub struct AppraisalBuilder {
    scorer: Scorer,
}

impl AppraisalBuilder {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Scores the submission and snapshots `registry` into a new record with
    /// a fresh id. Later edits to `registry` do not reach the record.
    pub fn build(
        &self,
        input: &EvaluationInput,
        registry: &DefectRegistry,
        now: DateTime<Utc>,
    ) -> AppraisalRecord {
        let record = self.compose(Uuid::new_v4(), now, input, registry, now);
        info!(
            "Built appraisal {} ({} {}, grade {}, {} defects)",
            record.id,
            record.vehicle_spec.model_name,
            record.vehicle_spec.year,
            record.computed_grade,
            record.breakdown.defect_count
        );
        record
    }

    /// Re-scores an existing record against an edited registry. The id and
    /// creation time are kept; `updated_at` moves to `now`.
    pub fn revise(
        &self,
        record: &AppraisalRecord,
        registry: &DefectRegistry,
        now: DateTime<Utc>,
    ) -> AppraisalRecord {
        let revised = self.compose(record.id, record.created_at, &record.input(), registry, now);
        info!(
            "Revised appraisal {}: grade {} -> {}",
            revised.id, record.computed_grade, revised.computed_grade
        );
        revised
    }

    fn compose(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
        input: &EvaluationInput,
        registry: &DefectRegistry,
        now: DateTime<Utc>,
    ) -> AppraisalRecord {
        let eval = self
            .scorer
            .evaluate(&input.score_input(), registry, now.date_naive());

        let mut vehicle_spec = input.vehicle_spec.clone();
        vehicle_spec.normalize();

        AppraisalRecord {
            id,
            vehicle_spec,
            interior_rank: input.interior_rank,
            has_repair_history: input.has_repair_history,
            has_exterior_replacement: input.has_exterior_replacement,
            max_grade: eval.max_grade,
            computed_grade: eval.grade,
            reference_score: eval.reference_score,
            breakdown: eval.breakdown,
            defects: registry.clone(),
            created_at,
            updated_at: now,
        }
    }
}
