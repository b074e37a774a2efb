use super::classifier::{GestureClassifier, GestureResolution};
use crate::catalog::DefectTypeCode;
use crate::config::GestureParams;
use crate::error::AppraisalError;
use crate::registry::{Defect, DefectRegistry};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Recorded(Defect),
    /// The part already holds this pair; nothing changed.
    Duplicate(Defect),
    LimitReached { part_id: String, limit: usize },
    /// Long press: the UI should open photo capture for the part.
    PhotoRequested { part_id: String, code: DefectTypeCode },
    /// Release without an active gesture or part.
    Ignored,
}

#[derive(Debug, Clone)]
struct OpenPart {
    id: String,
    label: String,
}

/// The per-part defect dialog opened from a diagram hotspot.
///
/// Owns the gesture classifier and applies its own per-part limit before
/// handing defects to the registry, so manual entry stays short while the
/// registry itself may be unbounded.
#[derive(Debug, Clone)]
pub struct DefectCapture {
    classifier: GestureClassifier,
    part_limit: usize,
    part: Option<OpenPart>,
    message: Option<String>,
}

impl DefectCapture {
    pub fn new(params: GestureParams) -> Self {
        let part_limit = params.gesture_part_limit;
        Self {
            classifier: GestureClassifier::new(params),
            part_limit,
            part: None,
            message: None,
        }
    }

    pub fn open(&mut self, part_id: &str, part_label: &str) {
        self.classifier.cancel();
        self.message = None;
        self.part = Some(OpenPart {
            id: part_id.to_string(),
            label: part_label.to_string(),
        });
    }

    pub fn close(&mut self) {
        self.classifier.cancel();
        self.part = None;
        self.message = None;
    }

    pub fn open_part(&self) -> Option<&str> {
        self.part.as_ref().map(|p| p.id.as_str())
    }

    pub fn part_limit(&self) -> usize {
        self.part_limit
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Message to show next to the defect buttons, if any.
    pub fn inline_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn press(&mut self, code: DefectTypeCode, x: f32, y: f32, at_ms: u64) {
        if self.part.is_none() {
            return;
        }
        self.message = None;
        self.classifier.press(code, x, y, at_ms);
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.classifier.move_to(x, y);
    }

    /// Pointer left the button area.
    pub fn cancel(&mut self) {
        self.classifier.cancel();
    }

    pub fn poll_long_press(&mut self, now_ms: u64) -> CaptureOutcome {
        match (self.classifier.poll_long_press(now_ms), &self.part) {
            (Some(code), Some(part)) => CaptureOutcome::PhotoRequested {
                part_id: part.id.clone(),
                code,
            },
            _ => CaptureOutcome::Ignored,
        }
    }

    pub fn release(
        &mut self,
        x: f32,
        y: f32,
        at_ms: u64,
        registry: &mut DefectRegistry,
    ) -> CaptureOutcome {
        let Some(part) = self.part.clone() else {
            self.classifier.cancel();
            return CaptureOutcome::Ignored;
        };

        match self.classifier.release(x, y, at_ms) {
            None => CaptureOutcome::Ignored,
            Some(GestureResolution::LongPress(code)) => CaptureOutcome::PhotoRequested {
                part_id: part.id,
                code,
            },
            Some(GestureResolution::Defect(defect)) => self.record(&part, defect, registry),
        }
    }

    fn record(
        &mut self,
        part: &OpenPart,
        defect: Defect,
        registry: &mut DefectRegistry,
    ) -> CaptureOutcome {
        let existing = registry.get(&part.id);
        if existing.is_some_and(|e| e.contains(&defect)) {
            return CaptureOutcome::Duplicate(defect);
        }

        let held = existing.map_or(0, |e| e.defects.len());
        if held >= self.part_limit {
            return self.limit_reached(&part.id, self.part_limit);
        }

        match registry.add_defect(&part.id, &part.label, defect) {
            Ok(()) => {
                info!("Recorded {} on {}", defect.notation(), part.label);
                CaptureOutcome::Recorded(defect)
            }
            Err(AppraisalError::CapacityExceeded { part_id, capacity }) => {
                self.limit_reached(&part_id, capacity)
            }
            Err(e) => {
                warn!("Could not record defect: {}", e);
                self.message = Some(e.to_string());
                CaptureOutcome::Ignored
            }
        }
    }

    fn limit_reached(&mut self, part_id: &str, limit: usize) -> CaptureOutcome {
        self.message = Some(format!("Up to {} defects can be recorded per part", limit));
        CaptureOutcome::LimitReached {
            part_id: part_id.to_string(),
            limit,
        }
    }
}
