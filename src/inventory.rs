//! Persisted inventory: the JSON array of evaluated vehicles the intake app
//! keeps between sessions.
//!
//! Decoding is permissive. Records written by older app versions carry
//! numeric ids, string numbers, numeric grades and unlabeled parts; those are
//! accepted as-is and upgraded by [`InventoryRecord::migrate`]. A record that
//! cannot be read at all is skipped with a warning instead of failing the
//! whole file.

use crate::consts::INVENTORY_SCHEMA_VERSION;
use crate::diagram::VehicleDiagram;
use crate::error::AppraisalResult;
use crate::record::{AppraisalRecord, VehicleSpec};
use crate::lenient;
use crate::registry::{lenient_registry, DefectRegistry};
use crate::scorer::grade::{lenient_grade, lenient_rank};
use crate::scorer::{AppraisalGrade, Evaluation, InteriorRank, ScoreBreakdown, ScoreInput, Scorer};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryEvaluation {
    #[serde(deserialize_with = "lenient_score")]
    pub reference_score: Option<u8>,
    /// Final grade after deduction.
    #[serde(deserialize_with = "lenient_grade")]
    pub overall_grade: Option<AppraisalGrade>,
    #[serde(deserialize_with = "lenient_rank")]
    pub interior_rank: Option<InteriorRank>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub breakdown: ScoreBreakdown,
    /// Upper-bound grade from the band table.
    #[serde(deserialize_with = "lenient_grade")]
    pub grade: Option<AppraisalGrade>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub vehicle_spec: VehicleSpec,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_repair_history: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_exterior_replacement: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub evaluation: InventoryEvaluation,
    #[serde(deserialize_with = "lenient_registry")]
    pub part_defects: DefectRegistry,
    #[serde(deserialize_with = "lenient::number")]
    pub schema_version: u32,
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let score = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8))
}

/// RFC 3339 strings or epoch milliseconds.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

impl InventoryRecord {
    pub fn from_record(record: &AppraisalRecord) -> Self {
        Self {
            id: record.id.to_string(),
            date: record.created_at.format("%Y-%m-%d").to_string(),
            evaluation: InventoryEvaluation {
                reference_score: Some(record.reference_score),
                overall_grade: Some(record.computed_grade),
                interior_rank: Some(record.interior_rank),
                breakdown: record.breakdown.clone(),
                grade: Some(record.max_grade),
                timestamp: Some(record.updated_at),
                vehicle_spec: record.vehicle_spec.clone(),
                has_repair_history: record.has_repair_history,
                has_exterior_replacement: record.has_exterior_replacement,
            },
            part_defects: record.defects.clone(),
            schema_version: INVENTORY_SCHEMA_VERSION,
        }
    }

    pub fn needs_migration(&self) -> bool {
        self.schema_version < INVENTORY_SCHEMA_VERSION
    }

    /// Upgrades a legacy record in place. Returns whether anything changed.
    ///
    /// Duplicate pairs and empty parts are already dropped while decoding;
    /// this fills in part labels and normalizes the vehicle spec.
    pub fn migrate(&mut self, diagram: &VehicleDiagram) -> bool {
        if !self.needs_migration() {
            return false;
        }
        let mut labelled = 0;
        for entry in self.part_defects.entries_mut() {
            if entry.part_label.trim().is_empty() {
                entry.part_label = diagram.label_for(&entry.part_id);
                labelled += 1;
            }
        }
        self.evaluation.vehicle_spec.normalize();
        debug!(
            "Migrated record '{}' from schema {} ({} labels filled)",
            self.id, self.schema_version, labelled
        );
        self.schema_version = INVENTORY_SCHEMA_VERSION;
        true
    }

    /// Score inputs as stored. `None` when the interior rank was never saved.
    pub fn score_input(&self) -> Option<ScoreInput> {
        let eval = &self.evaluation;
        Some(ScoreInput {
            mileage_km: eval.vehicle_spec.mileage_km,
            vehicle_year: eval.vehicle_spec.year,
            interior_rank: eval.interior_rank?,
            has_repair_history: eval.has_repair_history,
            has_exterior_replacement: eval.has_exterior_replacement,
        })
    }

    /// Re-runs the score engine on the stored inputs.
    pub fn rescore(&self, scorer: &Scorer, today: NaiveDate) -> Option<Evaluation> {
        let input = self.score_input()?;
        Some(scorer.evaluate(&input, &self.part_defects, today))
    }

    /// Compact defect summary, e.g. `hood:A1 U2; trunk:XX`.
    pub fn defect_notation(&self) -> String {
        self.part_defects
            .entries()
            .map(|e| {
                let codes: Vec<String> = e.defects.iter().map(|d| d.notation()).collect();
                format!("{}:{}", e.part_id, codes.join(" "))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    id: &'a str,
    date: &'a str,
    model: &'a str,
    year: i32,
    mileage_km: u32,
    interior: String,
    max_grade: String,
    grade: String,
    reference_score: String,
    defect_count: usize,
    defects: String,
}

fn opt_to_string<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Ordered collection of inventory records, unique by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    records: Vec<InventoryRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppraisalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let inventory = Self::from_json(&content)?;
        info!(
            "Loaded {} inventory records from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Parses a JSON array, skipping elements that are not readable records.
    pub fn from_json(content: &str) -> AppraisalResult<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(content)?;
        let mut inventory = Self::new();
        for (idx, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<InventoryRecord>(value) {
                Ok(record) => {
                    inventory.upsert(record);
                }
                Err(e) => warn!("Skipping unreadable inventory record #{}: {}", idx, e),
            }
        }
        Ok(inventory)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppraisalResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json)?;
        info!("Saved {} inventory records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts a record, replacing any existing one with the same id in
    /// place. Returns `true` when a record was replaced.
    pub fn upsert(&mut self, record: InventoryRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.records.push(record);
                false
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<InventoryRecord> {
        let idx = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(idx))
    }

    /// Migrates every legacy record; returns how many changed.
    pub fn migrate_all(&mut self, diagram: &VehicleDiagram) -> usize {
        let changed = self
            .records
            .iter_mut()
            .map(|r| r.migrate(diagram))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            info!("Migrated {} legacy inventory records", changed);
        }
        changed
    }

    /// One summary row per record, with a header.
    pub fn export_csv<W: Write>(&self, writer: W) -> AppraisalResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for r in &self.records {
            let eval = &r.evaluation;
            wtr.serialize(CsvRow {
                id: &r.id,
                date: &r.date,
                model: &eval.vehicle_spec.model_name,
                year: eval.vehicle_spec.year,
                mileage_km: eval.vehicle_spec.mileage_km,
                interior: opt_to_string(eval.interior_rank),
                max_grade: opt_to_string(eval.grade),
                grade: opt_to_string(eval.overall_grade),
                reference_score: opt_to_string(eval.reference_score),
                defect_count: r.part_defects.total_defect_count(),
                defects: r.defect_notation(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
