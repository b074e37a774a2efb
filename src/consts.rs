/// Base point cost substituted for defect codes the catalog does not know.
pub const DEFAULT_BASE_COST: f32 = 0.2;

/// Level multiplier substituted for missing or unrecognised levels.
pub const DEFAULT_LEVEL_MULTIPLIER: f32 = 1.0;

/// Per-defect deduction contributions, in tenths of a grade point.
pub const DEDUCTION_LEVEL1_TENTHS: u32 = 1;
pub const DEDUCTION_LEVEL2_TENTHS: u32 = 3;
pub const DEDUCTION_LEVEL3_TENTHS: u32 = 5;
pub const DEDUCTION_UNGRADED_TENTHS: u32 = 1;
pub const DEDUCTION_DENT_SURCHARGE_TENTHS: u32 = 1;
pub const DEDUCTION_REPLACEMENT_TENTHS: u32 = 10;

/// Deductions are rounded up to this many tenths (half a grade point).
pub const DEDUCTION_STEP_TENTHS: u32 = 5;

/// Lowest grade reachable through defect deduction alone.
pub const GRADE_FLOOR: f32 = 3.0;

/// Maximum number of free-text inspector comments kept on a vehicle spec.
pub const MAX_INSPECTOR_COMMENTS: usize = 12;

/// Per-part limit applied by the gesture capture dialog.
pub const DEFAULT_GESTURE_PART_LIMIT: usize = 2;

/// Current persisted inventory schema.
pub const INVENTORY_SCHEMA_VERSION: u32 = 1;

/// Reference-score points removed per interior rank, A..=E.
pub const DEFAULT_INTERIOR_PENALTIES: [f32; 5] = [0.0, 5.0, 10.0, 20.0, 30.0];
