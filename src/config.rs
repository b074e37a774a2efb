use crate::error::{AppraisalError, AppraisalResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub gesture: GestureParams,
    #[command(flatten)]
    pub registry: RegistryParams,
    #[command(flatten)]
    pub reference: ReferenceWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureParams {
    // Movement below this distance is a tap
    #[arg(long, default_value_t = 36.0)]
    pub tap_threshold_px: f32,

    // Half-width of the up/down sectors, degrees
    #[arg(long, default_value_t = 45.0)]
    pub vertical_sector_deg: f32,

    // Half-width of the left/right sectors, degrees
    #[arg(long, default_value_t = 45.0)]
    pub horizontal_sector_deg: f32,

    // 0 disables long-press
    #[arg(long, default_value_t = 0)]
    pub long_press_ms: u64,

    #[arg(long, default_value_t = 2)]
    pub gesture_part_limit: usize,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            tap_threshold_px: 36.0,
            vertical_sector_deg: 45.0,
            horizontal_sector_deg: 45.0,
            long_press_ms: 0,
            gesture_part_limit: 2,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegistryParams {
    // Unbounded when absent
    #[arg(long)]
    pub part_capacity: Option<usize>,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceWeights {
    // === MILEAGE ===
    #[arg(long, default_value_t = 2.0)]
    pub mileage_points_per_10k: f32,
    #[arg(long, default_value_t = 40.0)]
    pub mileage_points_cap: f32,

    // === AGE ===
    #[arg(long, default_value_t = 3.0)]
    pub age_points_per_year: f32,
    #[arg(long, default_value_t = 30.0)]
    pub age_points_cap: f32,

    // === INTERIOR (A..E) ===
    #[arg(long, default_value = "0,5,10,20,30")]
    pub interior_penalties: String,
}

impl Default for ReferenceWeights {
    fn default() -> Self {
        Self {
            mileage_points_per_10k: 2.0,
            mileage_points_cap: 40.0,
            age_points_per_year: 3.0,
            age_points_cap: 30.0,
            interior_penalties: "0,5,10,20,30".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppraisalResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppraisalResult<()> {
        let g = &self.gesture;
        if !(g.tap_threshold_px.is_finite() && g.tap_threshold_px > 0.0) {
            return Err(AppraisalError::Config(format!(
                "tap_threshold_px must be positive, got {}",
                g.tap_threshold_px
            )));
        }
        for (name, deg) in [
            ("vertical_sector_deg", g.vertical_sector_deg),
            ("horizontal_sector_deg", g.horizontal_sector_deg),
        ] {
            if !(45.0..=60.0).contains(&deg) {
                return Err(AppraisalError::Config(format!(
                    "{} must be within 45..=60 degrees, got {}",
                    name, deg
                )));
            }
        }
        if g.gesture_part_limit == 0 {
            return Err(AppraisalError::Config(
                "gesture_part_limit must be at least 1".to_string(),
            ));
        }
        self.reference.get_interior_penalties()?;
        Ok(())
    }

    /// Overwrites fields the user explicitly passed on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(gesture.tap_threshold_px);
        update_if_present!(gesture.vertical_sector_deg);
        update_if_present!(gesture.horizontal_sector_deg);
        update_if_present!(gesture.long_press_ms);
        update_if_present!(gesture.gesture_part_limit);

        update_if_present!(registry.part_capacity);

        update_if_present!(reference.mileage_points_per_10k);
        update_if_present!(reference.mileage_points_cap);
        update_if_present!(reference.age_points_per_year);
        update_if_present!(reference.age_points_cap);
        update_if_present!(reference.interior_penalties);
    }
}

impl ReferenceWeights {
    pub fn get_interior_penalties(&self) -> AppraisalResult<[f32; 5]> {
        parse_f32_array::<5>(&self.interior_penalties, "interior_penalties")
    }
}

fn parse_f32_array<const N: usize>(s: &str, name: &str) -> AppraisalResult<[f32; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(AppraisalError::Config(format!(
            "--{} requires {} values",
            name, N
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p
            .trim()
            .parse()
            .map_err(|_| AppraisalError::Config(format!("Invalid number in {}: '{}'", name, p)))?;
    }
    Ok(arr)
}
