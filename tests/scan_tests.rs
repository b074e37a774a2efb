use appraiser::error::AppraisalError;
use appraiser::record::VehicleSpec;
use appraiser::scan::{sanitize_mileage, ScanRecord};
use rstest::rstest;

#[test]
fn test_parse_json_payload() {
    let scan = ScanRecord::parse(
        r#"{"model": "Prius", "modelType": "DAA-ZVW30", "year": "2019", "mileage": 45000, "vin": "jtdkn3du0a0123456"}"#,
    )
    .unwrap();
    assert_eq!(scan.model.as_deref(), Some("Prius"));
    assert_eq!(scan.model_type.as_deref(), Some("DAA-ZVW30"));
    assert_eq!(scan.year, Some(2019));
    assert_eq!(scan.mileage, Some(45_000));
    assert_eq!(scan.vin.as_deref(), Some("JTDKN3DU0A0123456"));
}

#[rstest]
#[case("model=Fit;year=2018;mileage=32,100 km")]
#[case("MODEL: Fit\nYear: H30 (2018)\nOdometer: 32100")]
#[case("model=Fit&model_year=2018&km=32100.7")]
fn test_parse_text_payload(#[case] payload: &str) {
    let scan = ScanRecord::parse(payload).unwrap();
    assert_eq!(scan.model.as_deref(), Some("Fit"));
    assert_eq!(scan.year, Some(2018));
    assert_eq!(scan.mileage, Some(32_100));
}

#[test]
fn test_json_numbers_other_than_mileage_keep_their_value() {
    let scan = ScanRecord::parse(r#"{"model": "Fit", "grade": 4.5, "colorNo": 202, "mileage": -120.5}"#)
        .unwrap();
    assert_eq!(scan.grade.as_deref(), Some("4.5"));
    assert_eq!(scan.color_no.as_deref(), Some("202"));
    assert_eq!(scan.mileage, Some(0));

    let spec = scan.apply_to(&VehicleSpec::default());
    assert_eq!(spec.auction_grade.as_deref(), Some("4.5"));
    assert_eq!(spec.mileage_km, 0);
}

#[test]
fn test_partial_scan_keeps_readable_fields() {
    let scan = ScanRecord::parse("model=Note;year=unknown;colour=blue").unwrap();
    assert_eq!(scan.model.as_deref(), Some("Note"));
    assert_eq!(scan.year, None);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("hello world")]
#[case("foo=bar;baz=1")]
#[case("{not json")]
#[case("year=abcd")]
fn test_malformed_payloads(#[case] payload: &str) {
    assert!(matches!(
        ScanRecord::parse(payload),
        Err(AppraisalError::MalformedScanData(_))
    ));
}

#[test]
fn test_apply_fills_only_scanned_fields() {
    let current = VehicleSpec {
        model_name: "typed by hand".to_string(),
        year: 2015,
        mileage_km: 99_000,
        inspector_comments: vec!["keep me".to_string()],
        ..Default::default()
    };
    let scan = ScanRecord::parse("year=2017;vin=abc123").unwrap();
    let spec = scan.apply_to(&current);

    assert_eq!(spec.model_name, "typed by hand");
    assert_eq!(spec.year, 2017);
    assert_eq!(spec.mileage_km, 99_000);
    assert_eq!(spec.vin.as_deref(), Some("ABC123"));
    assert_eq!(spec.inspector_comments, vec!["keep me".to_string()]);
}

#[rstest]
#[case(45_000.9, 45_000)]
#[case(-1.0, 0)]
#[case(f64::NAN, 0)]
#[case(f64::INFINITY, 0)]
#[case(1e12, u32::MAX)]
fn test_sanitize_mileage(#[case] value: f64, #[case] expected: u32) {
    assert_eq!(sanitize_mileage(value), expected);
}
