use crate::catalog::DefectTypeCode;
use crate::config::Config;
use crate::diagram::VehicleDiagram;
use crate::error::AppraisalResult;
use crate::gesture::{CaptureOutcome, DefectCapture};
use crate::inventory::InventoryRecord;
use crate::record::{AppraisalBuilder, AppraisalRecord, EvaluationInput, VehicleSpec};
use crate::registry::DefectRegistry;
use crate::scan::ScanRecord;
use crate::scorer::{InteriorRank, Scorer};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Everything one appraisal form needs: the diagram, the defects recorded so
/// far, the capture dialog and the vehicle details being edited.
///
/// A session edits one vehicle at a time. Call [`AppraisalSession::reset`]
/// before starting the next vehicle.
#[derive(Debug, Clone)]
pub struct AppraisalSession {
    config: Config,
    diagram: VehicleDiagram,
    registry: DefectRegistry,
    capture: DefectCapture,
    builder: AppraisalBuilder,
    vehicle_spec: VehicleSpec,
    editing: Option<AppraisalRecord>,
}

impl Default for AppraisalSession {
    fn default() -> Self {
        let config = Config::default();
        Self {
            registry: DefectRegistry::new(config.registry.part_capacity),
            capture: DefectCapture::new(config.gesture.clone()),
            builder: AppraisalBuilder::default(),
            diagram: VehicleDiagram::standard(),
            vehicle_spec: VehicleSpec::default(),
            editing: None,
            config,
        }
    }
}

impl AppraisalSession {
    pub fn new(config: Config, diagram: VehicleDiagram) -> AppraisalResult<Self> {
        config.validate()?;
        let scorer = Scorer::new(config.reference.clone())?;
        Ok(Self {
            registry: DefectRegistry::new(config.registry.part_capacity),
            capture: DefectCapture::new(config.gesture.clone()),
            builder: AppraisalBuilder::new(scorer),
            diagram,
            vehicle_spec: VehicleSpec::default(),
            editing: None,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn diagram(&self) -> &VehicleDiagram {
        &self.diagram
    }

    pub fn registry(&self) -> &DefectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DefectRegistry {
        &mut self.registry
    }

    pub fn capture(&self) -> &DefectCapture {
        &self.capture
    }

    pub fn vehicle_spec(&self) -> &VehicleSpec {
        &self.vehicle_spec
    }

    pub fn vehicle_spec_mut(&mut self) -> &mut VehicleSpec {
        &mut self.vehicle_spec
    }

    /// Record currently being revised, if one was loaded.
    pub fn editing(&self) -> Option<&AppraisalRecord> {
        self.editing.as_ref()
    }

    // --- Diagram & capture dialog ---

    /// Opens the capture dialog for the hotspot under the point.
    pub fn tap_diagram(&mut self, x: f32, y: f32) -> Option<String> {
        let (id, label) = {
            let spot = self.diagram.hotspot_at(x, y)?;
            (spot.id.clone(), spot.label.clone())
        };
        self.capture.open(&id, &label);
        debug!("Opened capture for '{}'", id);
        Some(id)
    }

    /// Opens the capture dialog by part id. Unknown ids are ignored.
    pub fn open_part(&mut self, part_id: &str) -> bool {
        let Some(spot) = self.diagram.get(part_id) else {
            return false;
        };
        let label = spot.label.clone();
        self.capture.open(part_id, &label);
        true
    }

    pub fn close_part(&mut self) {
        self.capture.close();
    }

    pub fn pointer_down(&mut self, code: DefectTypeCode, x: f32, y: f32, at_ms: u64) {
        self.capture.press(code, x, y, at_ms);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.capture.move_to(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.capture.cancel();
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, at_ms: u64) -> CaptureOutcome {
        self.capture.release(x, y, at_ms, &mut self.registry)
    }

    /// Timer tick while a button is held.
    pub fn poll(&mut self, now_ms: u64) -> CaptureOutcome {
        self.capture.poll_long_press(now_ms)
    }

    pub fn inline_message(&self) -> Option<&str> {
        self.capture.inline_message()
    }

    pub fn remove_defect(&mut self, part_id: &str, index: usize) {
        self.registry.remove(part_id, index);
    }

    pub fn attach_photo(&mut self, part_id: &str, photo_ref: String) -> bool {
        self.registry.attach_photo(part_id, photo_ref)
    }

    // --- Vehicle details ---

    /// Fills the vehicle form from a scanner payload. On error the form is
    /// left untouched.
    pub fn apply_scan(&mut self, payload: &str) -> AppraisalResult<ScanRecord> {
        let scan = ScanRecord::parse(payload)?;
        self.vehicle_spec = scan.apply_to(&self.vehicle_spec);
        info!(
            "Applied scan ({} {})",
            self.vehicle_spec.model_name, self.vehicle_spec.year
        );
        Ok(scan)
    }

    // --- Evaluation ---

    /// Scores the current form. A loaded record is revised under its own id;
    /// otherwise a new record is built.
    pub fn evaluate(
        &mut self,
        interior_rank: InteriorRank,
        has_repair_history: bool,
        has_exterior_replacement: bool,
        now: DateTime<Utc>,
    ) -> AppraisalRecord {
        let record = match &self.editing {
            Some(previous) => {
                let mut base = previous.clone();
                base.vehicle_spec = self.vehicle_spec.clone();
                base.interior_rank = interior_rank;
                base.has_repair_history = has_repair_history;
                base.has_exterior_replacement = has_exterior_replacement;
                self.builder.revise(&base, &self.registry, now)
            }
            None => {
                let input = EvaluationInput::builder()
                    .vehicle_spec(self.vehicle_spec.clone())
                    .interior_rank(interior_rank)
                    .has_repair_history(has_repair_history)
                    .has_exterior_replacement(has_exterior_replacement)
                    .build();
                self.builder.build(&input, &self.registry, now)
            }
        };
        self.editing = Some(record.clone());
        record
    }

    /// Loads a saved record for editing. The session works on a copy of its
    /// defects.
    pub fn load(&mut self, record: &AppraisalRecord) {
        self.capture.close();
        let mut registry = record.defects.clone();
        registry.set_capacity(self.config.registry.part_capacity);
        self.registry = registry;
        self.vehicle_spec = record.vehicle_spec.clone();
        self.editing = Some(record.clone());
    }

    pub fn reset(&mut self) {
        self.capture.close();
        self.registry.clear();
        self.vehicle_spec = VehicleSpec::default();
        self.editing = None;
    }

    pub fn to_inventory(&self, record: &AppraisalRecord) -> InventoryRecord {
        InventoryRecord::from_record(record)
    }
}
