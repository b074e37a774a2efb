pub mod capture;
pub mod classifier;

pub use self::capture::{CaptureOutcome, DefectCapture};
pub use self::classifier::{
    classify_direction, level_for, Direction, GestureClassifier, GestureResolution, GestureState,
};
