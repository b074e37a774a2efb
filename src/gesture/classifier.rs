use crate::catalog::{DefectTypeCode, LevelScheme, Severity};
use crate::config::GestureParams;
use crate::registry::Defect;
use tracing::debug;

/// Swipe direction after the tap threshold is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Horizontal,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressedGesture {
    pub code: DefectTypeCode,
    pub start: (f32, f32),
    pub current: (f32, f32),
    pub pressed_at_ms: u64,
    long_press_fired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed(PressedGesture),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureResolution {
    Defect(Defect),
    /// Held in place past the long-press threshold.
    LongPress(DefectTypeCode),
}

/// Classifies the angle of a swipe. `dy` grows downwards (screen space).
///
/// Up and down sectors are checked first; anything outside every sector
/// falls back to horizontal.
pub fn classify_direction(dx: f32, dy: f32, params: &GestureParams) -> Direction {
    let angle = dy.atan2(dx).to_degrees(); // (-180, 180]

    if (angle + 90.0).abs() <= params.vertical_sector_deg {
        return Direction::Up;
    }
    if (angle - 90.0).abs() <= params.vertical_sector_deg {
        return Direction::Down;
    }
    let horizontal = angle.abs() <= params.horizontal_sector_deg
        || angle.abs() >= 180.0 - params.horizontal_sector_deg;
    if !horizontal {
        debug!("Angle {:.1} outside all sectors, using horizontal", angle);
    }
    Direction::Horizontal
}

/// Severity selected by swiping `direction` on a `code` button.
pub fn level_for(code: DefectTypeCode, direction: Direction) -> Option<Severity> {
    match code.level_scheme() {
        LevelScheme::Graded => Some(match direction {
            Direction::Up => Severity::Minor,
            Direction::Horizontal => Severity::Moderate,
            Direction::Down => Severity::Severe,
        }),
        LevelScheme::Binary { first, second } => Some(match direction {
            Direction::Up => first,
            Direction::Horizontal | Direction::Down => second,
        }),
        LevelScheme::LevelLess => None,
    }
}

/// Turns press / move / release sequences on a defect-type button into a
/// (type, level) pair.
///
/// Only one gesture is in flight at a time: a second press cancels the first.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    params: GestureParams,
    state: GestureState,
}

impl GestureClassifier {
    pub fn new(params: GestureParams) -> Self {
        Self {
            params,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    /// Starts a gesture. Returns the gesture it displaced, if any.
    pub fn press(&mut self, code: DefectTypeCode, x: f32, y: f32, at_ms: u64) -> Option<PressedGesture> {
        let stale = match self.state {
            GestureState::Pressed(p) => {
                debug!("Press on {} cancels in-flight {} gesture", code, p.code);
                Some(p)
            }
            GestureState::Idle => None,
        };
        self.state = GestureState::Pressed(PressedGesture {
            code,
            start: (x, y),
            current: (x, y),
            pressed_at_ms: at_ms,
            long_press_fired: false,
        });
        stale
    }

    /// Tracks the pointer for live feedback; does not classify.
    pub fn move_to(&mut self, x: f32, y: f32) {
        if let GestureState::Pressed(ref mut p) = self.state {
            p.current = (x, y);
        }
    }

    /// Live preview of the level the current position would select.
    pub fn preview(&self) -> Option<Option<Severity>> {
        match self.state {
            GestureState::Pressed(p) => {
                let (dx, dy) = (p.current.0 - p.start.0, p.current.1 - p.start.1);
                Some(self.resolve_level(p.code, dx, dy))
            }
            GestureState::Idle => None,
        }
    }

    /// Fires the long-press once the pointer has been held still long enough.
    /// The release that follows a fired long-press produces nothing.
    pub fn poll_long_press(&mut self, now_ms: u64) -> Option<DefectTypeCode> {
        let threshold = self.params.long_press_ms;
        let tap = self.params.tap_threshold_px;
        match self.state {
            GestureState::Pressed(ref mut p) if threshold > 0 && !p.long_press_fired => {
                let moved = distance(p.start, p.current);
                if moved < tap && now_ms.saturating_sub(p.pressed_at_ms) >= threshold {
                    p.long_press_fired = true;
                    return Some(p.code);
                }
                None
            }
            _ => None,
        }
    }

    pub fn release(&mut self, x: f32, y: f32, at_ms: u64) -> Option<GestureResolution> {
        let GestureState::Pressed(p) = std::mem::take(&mut self.state) else {
            return None;
        };
        if p.long_press_fired {
            return None;
        }

        let (dx, dy) = (x - p.start.0, y - p.start.1);
        let is_tap = distance(p.start, (x, y)) < self.params.tap_threshold_px;
        let held = at_ms.saturating_sub(p.pressed_at_ms);

        if is_tap && self.params.long_press_ms > 0 && held >= self.params.long_press_ms {
            debug!("Long press on {}", p.code);
            return Some(GestureResolution::LongPress(p.code));
        }

        let defect = Defect::new(p.code, self.resolve_level(p.code, dx, dy));
        debug!(
            "Resolved {} (dx {:.0}, dy {:.0}, tap {})",
            defect.notation(),
            dx,
            dy,
            is_tap
        );
        Some(GestureResolution::Defect(defect))
    }

    /// Drops the in-flight gesture, if any.
    pub fn cancel(&mut self) -> bool {
        let was_pressed = !self.is_idle();
        if was_pressed {
            debug!("Gesture cancelled");
        }
        self.state = GestureState::Idle;
        was_pressed
    }

    fn resolve_level(&self, code: DefectTypeCode, dx: f32, dy: f32) -> Option<Severity> {
        if (dx * dx + dy * dy).sqrt() < self.params.tap_threshold_px {
            code.tap_level()
        } else {
            level_for(code, classify_direction(dx, dy, &self.params))
        }
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    (dx * dx + dy * dy).sqrt()
}
