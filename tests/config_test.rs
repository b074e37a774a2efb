use appraiser::config::{Config, GestureParams, ReferenceWeights, RegistryParams};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let matches = TestCli::command().get_matches_from(args);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

#[test]
fn test_defaults_match_between_serde_and_clap() {
    let (from_cli, _) = parse(&["test"]);
    let from_serde: Config = serde_json::from_str("{}").unwrap();
    let from_default = Config::default();

    for c in [&from_cli, &from_serde] {
        assert_eq!(c.gesture.tap_threshold_px, from_default.gesture.tap_threshold_px);
        assert_eq!(c.gesture.vertical_sector_deg, 45.0);
        assert_eq!(c.gesture.long_press_ms, 0);
        assert_eq!(c.gesture.gesture_part_limit, 2);
        assert_eq!(c.registry.part_capacity, None);
        assert_eq!(c.reference.interior_penalties, "0,5,10,20,30");
    }
    assert!(from_default.validate().is_ok());
}

#[test]
fn test_load_partial_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"gesture": {{"long_press_ms": 600}}, "registry": {{"part_capacity": 4}}}}"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.gesture.long_press_ms, 600);
    assert_eq!(config.gesture.tap_threshold_px, 36.0);
    assert_eq!(config.registry.part_capacity, Some(4));
    assert_eq!(config.reference.age_points_cap, 30.0);
}

#[test]
fn test_load_rejects_invalid_values() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"gesture": {{"vertical_sector_deg": 80}}}}"#).unwrap();
    assert!(Config::load_from_file(file.path()).is_err());
}

#[test]
fn test_validate() {
    let bad_tap = Config {
        gesture: GestureParams {
            tap_threshold_px: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(bad_tap.validate().is_err());

    let bad_limit = Config {
        gesture: GestureParams {
            gesture_part_limit: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(bad_limit.validate().is_err());

    let bad_penalties = Config {
        reference: ReferenceWeights {
            interior_penalties: "0,5,x,20,30".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(bad_penalties.validate().is_err());

    let wide = Config {
        gesture: GestureParams {
            vertical_sector_deg: 60.0,
            horizontal_sector_deg: 50.0,
            ..Default::default()
        },
        registry: RegistryParams {
            part_capacity: Some(2),
        },
        ..Default::default()
    };
    assert!(wide.validate().is_ok());
}

#[test]
fn test_interior_penalties_parse() {
    let w = ReferenceWeights {
        interior_penalties: " 0, 2.5,5 ,10,15".to_string(),
        ..Default::default()
    };
    assert_eq!(w.get_interior_penalties().unwrap(), [0.0, 2.5, 5.0, 10.0, 15.0]);
}

#[test]
fn test_merge_only_overrides_explicit_flags() {
    let mut file_config = Config::default();
    file_config.gesture.long_press_ms = 700;
    file_config.gesture.tap_threshold_px = 20.0;
    file_config.registry.part_capacity = Some(3);

    let (cli_config, matches) = parse(&["test", "--tap-threshold-px", "48", "--age-points-cap", "25"]);
    file_config.merge_from_cli(&cli_config, &matches);

    assert_eq!(file_config.gesture.tap_threshold_px, 48.0);
    assert_eq!(file_config.reference.age_points_cap, 25.0);
    // Untouched on the command line: file values survive
    assert_eq!(file_config.gesture.long_press_ms, 700);
    assert_eq!(file_config.registry.part_capacity, Some(3));
}
