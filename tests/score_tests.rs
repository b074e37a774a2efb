use appraiser::catalog::{DefectTypeCode, Severity};
use appraiser::config::ReferenceWeights;
use appraiser::registry::{Defect, DefectRegistry};
use appraiser::scorer::bands::{elapsed_months, max_grade};
use appraiser::scorer::deduction::{apply_deduction, deduction, final_grade};
use appraiser::scorer::reference::{reference_score, ReferenceTable};
use appraiser::scorer::{AppraisalGrade, InteriorRank, ScoreBreakdown, ScoreInput, Scorer};
use chrono::NaiveDate;
use rstest::rstest;

use AppraisalGrade as G;
use InteriorRank::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn d(code: DefectTypeCode, level: Severity) -> Defect {
    Defect::graded(code, level)
}

fn xx() -> Defect {
    Defect::new(DefectTypeCode::ReplacementHistory, None)
}

#[rstest]
#[case(2024, date(2024, 1, 31), 0)]
#[case(2024, date(2024, 7, 15), 6)]
#[case(2020, date(2024, 3, 10), 50)]
#[case(2019, date(2024, 12, 1), 71)]
#[case(2026, date(2024, 5, 1), 0)]
fn test_elapsed_months(#[case] year: i32, #[case] today: NaiveDate, #[case] expected: u32) {
    assert_eq!(elapsed_months(year, today), expected);
}

#[rstest]
// Scenario: new car
#[case(5_000, 6, A, false, G::S)]
#[case(9_999, 12, E, true, G::S)]
#[case(10_000, 12, A, false, G::Six)]
#[case(9_999, 13, A, false, G::Six)]
#[case(29_999, 36, A, false, G::Six)]
#[case(30_000, 36, A, false, G::Five)]
#[case(49_999, 100, E, false, G::Five)]
#[case(49_999, 100, E, true, G::ThreeHalf)]
#[case(49_999, 100, B, true, G::FourHalf)]
#[case(99_999, 100, B, false, G::FourHalf)]
#[case(100_000, 100, A, false, G::Four)]
// Scenario: replacement with interior C lands in the 4 band
#[case(45_000, 50, C, true, G::Four)]
#[case(149_999, 0, C, false, G::Four)]
#[case(149_999, 0, D, false, G::ThreeHalf)]
#[case(150_000, 0, A, false, G::ThreeHalf)]
#[case(199_999, 200, E, true, G::ThreeHalf)]
#[case(200_000, 0, A, false, G::Three)]
fn test_max_grade_bands(
    #[case] mileage: u32,
    #[case] months: u32,
    #[case] rank: InteriorRank,
    #[case] replaced: bool,
    #[case] expected: AppraisalGrade,
) {
    assert_eq!(max_grade(mileage, months, false, rank, replaced), expected);
}

#[rstest]
#[case(0)]
#[case(5_000)]
#[case(250_000)]
fn test_repair_history_is_r(#[case] mileage: u32) {
    assert_eq!(max_grade(mileage, 0, true, A, false), G::R);
}

#[rstest]
#[case(vec![], 0.0)]
// Any positive remainder rounds up to half a point
#[case(vec![d(DefectTypeCode::Scratch, Severity::Minor)], 0.5)]
#[case(vec![xx()], 1.0)]
#[case(vec![d(DefectTypeCode::Dent, Severity::Minor)], 0.5)]
#[case(vec![d(DefectTypeCode::Dent, Severity::Severe)], 1.0)]
#[case(vec![d(DefectTypeCode::BumperScuff, Severity::Moderate)], 0.5)]
#[case(vec![d(DefectTypeCode::Scratch, Severity::Severe)], 0.5)]
#[case(vec![d(DefectTypeCode::Scratch, Severity::Severe), d(DefectTypeCode::Rust, Severity::Severe)], 1.0)]
#[case(vec![xx(), d(DefectTypeCode::Scratch, Severity::Minor)], 1.5)]
#[case(vec![
    d(DefectTypeCode::Scratch, Severity::Minor),
    d(DefectTypeCode::Rust, Severity::Minor),
    d(DefectTypeCode::RepairMark, Severity::Minor),
    d(DefectTypeCode::PaintLoss, Severity::Minor),
    Defect::new(DefectTypeCode::GlassDamage, None),
], 0.5)]
#[case(vec![
    d(DefectTypeCode::Scratch, Severity::Minor),
    d(DefectTypeCode::Rust, Severity::Minor),
    d(DefectTypeCode::RepairMark, Severity::Minor),
    d(DefectTypeCode::PaintLoss, Severity::Minor),
    d(DefectTypeCode::GlassDamage, Severity::Crack),
    d(DefectTypeCode::Scratch, Severity::Moderate),
], 1.0)]
fn test_deduction(#[case] defects: Vec<Defect>, #[case] expected: f32) {
    assert_eq!(deduction(&defects), expected);
}

#[rstest]
#[case(G::Five, 0.5, G::FourHalf)]
#[case(G::Five, 1.0, G::Four)]
#[case(G::FourHalf, 0.5, G::Four)]
#[case(G::S, 0.5, G::Six)]
#[case(G::S, 4.0, G::Six)]
#[case(G::S, 4.5, G::Five)]
#[case(G::Three, 1.0, G::Three)]
#[case(G::ThreeHalf, 2.0, G::Three)]
#[case(G::Four, 0.0, G::Four)]
#[case(G::R, 1.0, G::R)]
fn test_apply_deduction(
    #[case] max: AppraisalGrade,
    #[case] deduction: f32,
    #[case] expected: AppraisalGrade,
) {
    assert_eq!(apply_deduction(max, deduction), expected);
}

#[test]
fn test_final_grade_r_ignores_defects() {
    assert_eq!(final_grade(G::R, &[]), G::R);
    assert_eq!(final_grade(G::R, &[xx()]), G::R);
}

#[test]
fn test_grade_order_and_display() {
    assert!(G::S > G::Six);
    assert!(G::FourHalf > G::Four);
    assert!(G::Three > G::R);
    assert_eq!(G::ThreeHalf.to_string(), "3.5");
    assert_eq!(serde_json::to_string(&G::FourHalf).unwrap(), "\"4.5\"");
    assert_eq!(G::from_numeric(4.9), G::FourHalf);
    assert_eq!(G::from_numeric(2.0), G::R);
}

#[rstest]
#[case(serde_json::json!("4.5"), Some(G::FourHalf))]
#[case(serde_json::json!(4.5), Some(G::FourHalf))]
#[case(serde_json::json!(5), Some(G::Five))]
#[case(serde_json::json!("s"), Some(G::S))]
#[case(serde_json::json!(4.2), None)]
#[case(serde_json::json!(null), None)]
fn test_grade_from_json(#[case] value: serde_json::Value, #[case] expected: Option<AppraisalGrade>) {
    assert_eq!(AppraisalGrade::from_json(&value), expected);
}

#[test]
fn test_reference_score_components() {
    let table = ReferenceTable {
        mileage_points_per_10k: 2.0,
        mileage_points_cap: 40.0,
        age_points_per_year: 3.0,
        age_points_cap: 30.0,
        interior_penalties: [0.0, 5.0, 10.0, 20.0, 30.0],
    };
    let mut b = ScoreBreakdown::default();
    assert_eq!(reference_score(45_000, 48, C, &table, &mut b), 69);
    assert_eq!(b.mileage_points, 9.0);
    assert_eq!(b.age_points, 12.0);
    assert_eq!(b.interior_points, 10.0);
    assert_eq!(b.elapsed_months, 48);

    assert_eq!(reference_score(0, 0, A, &table, &mut b), 100);
    // Every component capped
    assert_eq!(reference_score(400_000, 300, E, &table, &mut b), 0);
    assert_eq!(b.mileage_points, 40.0);
    assert_eq!(b.age_points, 30.0);
}

#[test]
fn test_scorer_rejects_bad_penalties() {
    let weights = ReferenceWeights {
        interior_penalties: "0,5,10".to_string(),
        ..Default::default()
    };
    assert!(Scorer::new(weights).is_err());
}

fn input(mileage_km: u32, vehicle_year: i32, interior_rank: InteriorRank) -> ScoreInput {
    ScoreInput {
        mileage_km,
        vehicle_year,
        interior_rank,
        has_repair_history: false,
        has_exterior_replacement: false,
    }
}

#[test]
fn test_evaluate_new_car() {
    let scorer = Scorer::default();
    let eval = scorer.evaluate(&input(5_000, 2024, A), &DefectRegistry::default(), date(2024, 7, 15));
    assert_eq!(eval.max_grade, G::S);
    assert_eq!(eval.grade, G::S);
    assert_eq!(eval.breakdown.elapsed_months, 6);
    assert_eq!(eval.breakdown.deduction, 0.0);
}

#[test]
fn test_evaluate_registry_replacement_caps_band() {
    let mut reg = DefectRegistry::default();
    reg.add_defect("left-front-door", "Left front door", xx()).unwrap();

    let scorer = Scorer::default();
    let eval = scorer.evaluate(&input(45_000, 2020, A), &reg, date(2024, 3, 10));
    // Five is ruled out by the replaced panel
    assert_eq!(eval.max_grade, G::FourHalf);
    assert_eq!(eval.breakdown.deduction, 1.0);
    assert_eq!(eval.grade, G::ThreeHalf);
    assert_eq!(eval.breakdown.defect_count, 1);
    assert_eq!(eval.breakdown.elapsed_months, 50);
}

#[test]
fn test_evaluate_repair_history_zero_defects() {
    let scorer = Scorer::default();
    let mut i = input(5_000, 2024, A);
    i.has_repair_history = true;
    let eval = scorer.evaluate(&i, &DefectRegistry::default(), date(2024, 2, 1));
    assert_eq!(eval.max_grade, G::R);
    assert_eq!(eval.grade, G::R);
}

#[test]
fn test_default_scorer_matches_default_weights() {
    let built = Scorer::new(ReferenceWeights::default()).unwrap();
    let scorer = Scorer::default();
    assert_eq!(
        scorer.weights().interior_penalties,
        built.weights().interior_penalties
    );
    assert_eq!(scorer.weights().age_points_cap, built.weights().age_points_cap);

    let mut reg = DefectRegistry::default();
    reg.add_defect("hood", "Hood", d(DefectTypeCode::Dent, Severity::Moderate)).unwrap();
    for rank in [A, B, InteriorRank::E] {
        let i = input(130_000, 2015, rank);
        let today = date(2024, 3, 10);
        assert_eq!(scorer.evaluate(&i, &reg, today), built.evaluate(&i, &reg, today));
    }
}

#[test]
fn test_evaluate_is_pure() {
    let mut reg = DefectRegistry::default();
    reg.add_defect("hood", "Hood", d(DefectTypeCode::Dent, Severity::Moderate)).unwrap();
    let scorer = Scorer::default();
    let today = date(2024, 3, 10);
    let a = scorer.evaluate(&input(80_000, 2018, B), &reg, today);
    let b = scorer.evaluate(&input(80_000, 2018, B), &reg, today);
    assert_eq!(a, b);
    assert_eq!(a.max_grade, G::FourHalf);
    assert_eq!(a.grade, G::Four);
}
