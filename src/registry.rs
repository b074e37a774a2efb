use crate::catalog::{self, lenient_code, lenient_level, DefectTypeCode, Severity};
use crate::error::{AppraisalError, AppraisalResult};
use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One recorded (type, level) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Defect {
    #[serde(
        rename = "type",
        alias = "code",
        default,
        deserialize_with = "lenient_code"
    )]
    pub code: DefectTypeCode,
    #[serde(
        default,
        deserialize_with = "lenient_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Severity>,
}

impl Defect {
    pub fn new(code: DefectTypeCode, level: Option<Severity>) -> Self {
        Self { code, level }
    }

    pub fn graded(code: DefectTypeCode, level: Severity) -> Self {
        Self::new(code, Some(level))
    }

    pub fn weighted_cost(&self) -> f32 {
        catalog::weighted_cost(self.code, self.level)
    }

    /// Diagram notation, e.g. `A1`, `U3`, `Gcrack`, `XX`.
    pub fn notation(&self) -> String {
        match self.level {
            Some(l) => format!("{}{}", self.code.short_code(), l.label()),
            None => self.code.short_code().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDefectEntry {
    #[serde(default, alias = "part", alias = "id", deserialize_with = "lenient::string")]
    pub part_id: String,
    #[serde(default, alias = "label", alias = "name", deserialize_with = "lenient::string")]
    pub part_label: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub defects: Vec<Defect>,
    /// Opaque image reference (inline data or `idb:<id>`), passed through.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_ref: Option<String>,
}

impl PartDefectEntry {
    pub fn new(part_id: &str, part_label: &str) -> Self {
        Self {
            part_id: part_id.to_string(),
            part_label: part_label.to_string(),
            defects: Vec::new(),
            photo_ref: None,
        }
    }

    pub fn contains(&self, defect: &Defect) -> bool {
        self.defects.contains(defect)
    }
}

/// Keeps the first occurrence of each (type, level) pair.
fn dedup_defects(defects: Vec<Defect>) -> Vec<Defect> {
    let mut out: Vec<Defect> = Vec::with_capacity(defects.len());
    for d in defects {
        if !out.contains(&d) {
            out.push(d);
        }
    }
    out
}

/// Defects recorded for one vehicle, keyed by part id.
///
/// Parts without defects are never stored. The optional capacity bounds the
/// number of defects per part and is enforced by every mutation that can grow
/// a part's list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PartDefectEntry>", into = "Vec<PartDefectEntry>")]
pub struct DefectRegistry {
    entries: BTreeMap<String, PartDefectEntry>,
    capacity: Option<usize>,
}

impl From<Vec<PartDefectEntry>> for DefectRegistry {
    fn from(list: Vec<PartDefectEntry>) -> Self {
        let mut entries = BTreeMap::new();
        for mut entry in list {
            if entry.part_id.trim().is_empty() {
                warn!("Dropping entry without a part id ({} defects)", entry.defects.len());
                continue;
            }
            entry.defects = dedup_defects(entry.defects);
            if entry.defects.is_empty() {
                continue;
            }
            entries.insert(entry.part_id.clone(), entry);
        }
        Self {
            entries,
            capacity: None,
        }
    }
}

/// Field deserializer for a persisted registry that skips entries it cannot
/// read instead of failing the enclosing record.
pub fn lenient_registry<'de, D>(deserializer: D) -> Result<DefectRegistry, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<PartDefectEntry> = lenient::list(deserializer)?;
    Ok(DefectRegistry::from(entries))
}

impl From<DefectRegistry> for Vec<PartDefectEntry> {
    fn from(reg: DefectRegistry) -> Self {
        reg.entries.into_values().collect()
    }
}

impl DefectRegistry {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
    }

    fn check_capacity(&self, part_id: &str, len: usize) -> AppraisalResult<()> {
        match self.capacity {
            Some(cap) if len > cap => {
                warn!("Defect limit reached for '{}' ({} > {})", part_id, len, cap);
                Err(AppraisalError::CapacityExceeded {
                    part_id: part_id.to_string(),
                    capacity: cap,
                })
            }
            _ => Ok(()),
        }
    }

    /// Replaces the entry for `part_id`. An empty list removes the part.
    pub fn upsert(
        &mut self,
        part_id: &str,
        part_label: &str,
        defects: Vec<Defect>,
    ) -> AppraisalResult<()> {
        let defects = dedup_defects(defects);
        if defects.is_empty() {
            self.entries.remove(part_id);
            return Ok(());
        }
        self.check_capacity(part_id, defects.len())?;

        let photo_ref = self.entries.get(part_id).and_then(|e| e.photo_ref.clone());
        self.entries.insert(
            part_id.to_string(),
            PartDefectEntry {
                part_id: part_id.to_string(),
                part_label: part_label.to_string(),
                defects,
                photo_ref,
            },
        );
        Ok(())
    }

    /// Appends `defect` to a part, creating the entry if needed.
    ///
    /// Recording a pair the part already holds is a no-op. On
    /// `CapacityExceeded` the registry is left untouched.
    pub fn add_defect(
        &mut self,
        part_id: &str,
        part_label: &str,
        defect: Defect,
    ) -> AppraisalResult<()> {
        let current = self.entries.get(part_id);
        if current.is_some_and(|e| e.contains(&defect)) {
            debug!("Duplicate {} on '{}' ignored", defect.notation(), part_id);
            return Ok(());
        }
        let len = current.map_or(0, |e| e.defects.len());
        self.check_capacity(part_id, len + 1)?;

        let entry = self
            .entries
            .entry(part_id.to_string())
            .or_insert_with(|| PartDefectEntry::new(part_id, part_label));
        entry.defects.push(defect);
        debug!("Recorded {} on '{}'", defect.notation(), part_id);
        Ok(())
    }

    /// Removes the defect at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, part_id: &str, index: usize) {
        let Some(entry) = self.entries.get_mut(part_id) else {
            return;
        };
        if index >= entry.defects.len() {
            return;
        }
        entry.defects.remove(index);
        if entry.defects.is_empty() {
            self.entries.remove(part_id);
        }
    }

    pub fn remove_part(&mut self, part_id: &str) -> Option<PartDefectEntry> {
        self.entries.remove(part_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Attaches an image reference to a part that already has defects.
    pub fn attach_photo(&mut self, part_id: &str, photo_ref: String) -> bool {
        match self.entries.get_mut(part_id) {
            Some(entry) => {
                entry.photo_ref = Some(photo_ref);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, part_id: &str) -> Option<&PartDefectEntry> {
        self.entries.get(part_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PartDefectEntry> {
        self.entries.values()
    }

    pub fn defects(&self) -> impl Iterator<Item = &Defect> {
        self.entries.values().flat_map(|e| e.defects.iter())
    }

    pub fn total_defect_count(&self) -> usize {
        self.entries.values().map(|e| e.defects.len()).sum()
    }

    pub fn part_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_replacement(&self) -> bool {
        self.defects()
            .any(|d| d.code == DefectTypeCode::ReplacementHistory)
    }

    /// Sum of catalog point costs over every defect.
    pub fn weighted_cost(&self) -> f32 {
        self.defects().map(|d| d.weighted_cost()).sum()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut PartDefectEntry> {
        self.entries.values_mut()
    }
}
