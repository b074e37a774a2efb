use super::grade::AppraisalGrade;
use crate::catalog::DefectTypeCode;
use crate::consts::*;
use crate::registry::Defect;

// Contributions are summed in tenths of a point so the half-point rounding
// below never sees float noise (five 0.1s must be exactly 0.5).
pub fn defect_tenths(defect: &Defect) -> u32 {
    if defect.code == DefectTypeCode::ReplacementHistory {
        return DEDUCTION_REPLACEMENT_TENTHS;
    }

    let base = match defect.level.and_then(|l| l.ordinal()) {
        Some(1) => DEDUCTION_LEVEL1_TENTHS,
        Some(2) => DEDUCTION_LEVEL2_TENTHS,
        Some(3) => DEDUCTION_LEVEL3_TENTHS,
        _ => DEDUCTION_UNGRADED_TENTHS,
    };

    if defect.code.is_dent_like() {
        base + DEDUCTION_DENT_SURCHARGE_TENTHS
    } else {
        base
    }
}

/// Total deduction in half-point steps, rounded up.
pub fn deduction_halves<'a, I>(defects: I) -> u32
where
    I: IntoIterator<Item = &'a Defect>,
{
    let tenths: u32 = defects.into_iter().map(defect_tenths).sum();
    tenths.div_ceil(DEDUCTION_STEP_TENTHS)
}

/// Grade points removed for `defects`: a non-negative multiple of 0.5.
pub fn deduction<'a, I>(defects: I) -> f32
where
    I: IntoIterator<Item = &'a Defect>,
{
    deduction_halves(defects) as f32 * 0.5
}

/// Applies a deduction to an upper-bound grade.
///
/// `R` is final. Anything else never drops below grade 3.
pub fn apply_deduction(max: AppraisalGrade, deduction: f32) -> AppraisalGrade {
    match max.numeric() {
        None => AppraisalGrade::R,
        Some(value) => AppraisalGrade::from_numeric((value - deduction).max(GRADE_FLOOR)),
    }
}

pub fn final_grade<'a, I>(max: AppraisalGrade, defects: I) -> AppraisalGrade
where
    I: IntoIterator<Item = &'a Defect>,
{
    if max == AppraisalGrade::R {
        return AppraisalGrade::R;
    }
    apply_deduction(max, deduction(defects))
}
