use appraiser::catalog::{
    level_multiplier, parse_code, parse_level, weighted_cost, DefectTypeCode, LevelScheme,
    Severity,
};
use appraiser::consts::{DEFAULT_BASE_COST, DEFAULT_LEVEL_MULTIPLIER};
use appraiser::error::AppraisalError;
use appraiser::registry::Defect;
use rstest::rstest;

#[rstest]
#[case("A", DefectTypeCode::Scratch)]
#[case("scratch", DefectTypeCode::Scratch)]
#[case("U", DefectTypeCode::Dent)]
#[case("bumper-scuff", DefectTypeCode::BumperScuff)]
#[case("W", DefectTypeCode::RepairMark)]
#[case("glass", DefectTypeCode::GlassDamage)]
#[case("G", DefectTypeCode::GlassDamage)]
#[case("XX", DefectTypeCode::ReplacementHistory)]
#[case(" paint-loss ", DefectTypeCode::PaintLoss)]
fn test_parse_code(#[case] input: &str, #[case] expected: DefectTypeCode) {
    assert_eq!(parse_code(input).unwrap(), expected);
}

#[rstest]
#[case("Z")]
#[case("")]
#[case("unknown")]
fn test_parse_code_rejects(#[case] input: &str) {
    assert!(matches!(
        parse_code(input),
        Err(AppraisalError::UnknownDefectCode(_))
    ));
}

#[rstest]
#[case("1", Severity::Minor)]
#[case("moderate", Severity::Moderate)]
#[case("3", Severity::Severe)]
#[case("Crack", Severity::Crack)]
#[case("repaired", Severity::Repaired)]
fn test_parse_level(#[case] input: &str, #[case] expected: Severity) {
    assert_eq!(parse_level(input).unwrap(), expected);
}

#[test]
fn test_parse_level_rejects_out_of_range() {
    assert!(matches!(
        parse_level("4"),
        Err(AppraisalError::UnknownSeverityLevel(_))
    ));
}

#[test]
fn test_every_known_code_has_positive_cost() {
    let codes: Vec<_> = DefectTypeCode::known().collect();
    assert_eq!(codes.len(), 8);
    assert!(!codes.contains(&DefectTypeCode::Unknown));
    for code in codes {
        assert!(code.base_cost() > 0.0, "{} has no cost", code);
        assert!(!code.label().is_empty());
    }
}

#[test]
fn test_unknown_substitutes_defaults() {
    assert_eq!(DefectTypeCode::Unknown.base_cost(), DEFAULT_BASE_COST);
    assert_eq!(level_multiplier(None), DEFAULT_LEVEL_MULTIPLIER);
    assert!((weighted_cost(DefectTypeCode::Unknown, None) - 0.2).abs() < 1e-6);
}

#[test]
fn test_weighted_cost_scales_with_level() {
    let minor = weighted_cost(DefectTypeCode::Dent, Some(Severity::Minor));
    let severe = weighted_cost(DefectTypeCode::Dent, Some(Severity::Severe));
    assert!((severe - 3.0 * minor).abs() < 1e-6);
}

#[test]
fn test_level_schemes() {
    assert_eq!(DefectTypeCode::Scratch.level_scheme(), LevelScheme::Graded);
    assert_eq!(
        DefectTypeCode::GlassDamage.level_scheme(),
        LevelScheme::Binary {
            first: Severity::Crack,
            second: Severity::Repaired
        }
    );
    assert_eq!(
        DefectTypeCode::ReplacementHistory.level_scheme(),
        LevelScheme::LevelLess
    );

    assert!(DefectTypeCode::GlassDamage.accepts(Some(Severity::Crack)));
    assert!(!DefectTypeCode::GlassDamage.accepts(Some(Severity::Moderate)));
    assert!(!DefectTypeCode::ReplacementHistory.accepts(Some(Severity::Minor)));
    assert!(DefectTypeCode::ReplacementHistory.accepts(None));
}

#[test]
fn test_tap_levels() {
    assert_eq!(DefectTypeCode::Scratch.tap_level(), Some(Severity::Minor));
    assert_eq!(DefectTypeCode::GlassDamage.tap_level(), None);
    assert_eq!(DefectTypeCode::ReplacementHistory.tap_level(), None);
}

#[test]
fn test_severity_serializes_by_scheme() {
    assert_eq!(serde_json::to_string(&Severity::Moderate).unwrap(), "2");
    assert_eq!(serde_json::to_string(&Severity::Crack).unwrap(), "\"crack\"");
}

#[rstest]
#[case(r#"{"type":"scratch","level":2}"#, DefectTypeCode::Scratch, Some(Severity::Moderate))]
#[case(r#"{"type":"A","level":"2"}"#, DefectTypeCode::Scratch, Some(Severity::Moderate))]
#[case(r#"{"code":"glass","level":"crack"}"#, DefectTypeCode::GlassDamage, Some(Severity::Crack))]
#[case(r#"{"type":"dent","level":9}"#, DefectTypeCode::Dent, None)]
#[case(r#"{"type":"hail","level":1}"#, DefectTypeCode::Unknown, Some(Severity::Minor))]
#[case(r#"{"type":42}"#, DefectTypeCode::Unknown, None)]
#[case(r#"{"level":1}"#, DefectTypeCode::Unknown, Some(Severity::Minor))]
fn test_defect_decodes_leniently(
    #[case] json: &str,
    #[case] code: DefectTypeCode,
    #[case] level: Option<Severity>,
) {
    let d: Defect = serde_json::from_str(json).unwrap();
    assert_eq!(d, Defect::new(code, level));
}

#[test]
fn test_notation() {
    assert_eq!(Defect::graded(DefectTypeCode::Scratch, Severity::Minor).notation(), "A1");
    assert_eq!(Defect::graded(DefectTypeCode::GlassDamage, Severity::Crack).notation(), "Gcrack");
    assert_eq!(Defect::new(DefectTypeCode::ReplacementHistory, None).notation(), "XX");
}
