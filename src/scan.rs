//! Intake for QR / VIN scan payloads.
//!
//! Scanners return loosely formatted text. Fields that cannot be read are
//! dropped one by one so a partial scan still fills what it can; only a
//! payload with nothing usable is rejected.

use crate::error::{AppraisalError, AppraisalResult};
use crate::record::VehicleSpec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanRecord {
    pub model_type: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<u32>,
    pub vin: Option<String>,
    pub grade: Option<String>,
    pub color_no: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanField {
    ModelType,
    Model,
    Year,
    Mileage,
    Vin,
    Grade,
    ColorNo,
}

fn field_for(key: &str) -> Option<ScanField> {
    let k: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    match k.as_str() {
        "modeltype" | "type" | "typecode" => Some(ScanField::ModelType),
        "model" | "modelname" | "name" => Some(ScanField::Model),
        "year" | "modelyear" | "firstregistration" => Some(ScanField::Year),
        "mileage" | "odometer" | "km" => Some(ScanField::Mileage),
        "vin" | "chassis" | "chassisno" => Some(ScanField::Vin),
        "grade" => Some(ScanField::Grade),
        "colorno" | "color" | "colorcode" => Some(ScanField::ColorNo),
        _ => None,
    }
}

/// First plausible four-digit year in the text.
fn parse_year(s: &str) -> Option<i32> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| run.len() == 4)
        .filter_map(|run| run.parse::<i32>().ok())
        .find(|y| (1900..=2100).contains(y))
}

/// Plain numbers go through [`sanitize_mileage`]; otherwise the digits of the
/// integer part, ignoring separators and units ("45,000 km").
fn parse_mileage(s: &str) -> Option<u32> {
    if let Ok(f) = s.trim().parse::<f64>() {
        return Some(sanitize_mileage(f));
    }
    let integer = s.split('.').next().unwrap_or("");
    let digits: String = integer.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Coerces an untrusted scanned number to a whole non-negative value
/// (negative, NaN → 0). Fractions are truncated.
pub fn sanitize_mileage(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

impl ScanRecord {
    pub fn parse(text: &str) -> AppraisalResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppraisalError::MalformedScanData("empty payload".to_string()));
        }

        let pairs = if text.starts_with('{') {
            json_pairs(text)?
        } else {
            text_pairs(text)
        };

        let mut rec = ScanRecord::default();
        let mut recognised = 0;
        for (key, value) in pairs {
            let Some(field) = field_for(&key) else {
                debug!("Ignoring scan key '{}'", key);
                continue;
            };
            let applied = rec.set(field, &value);
            if applied {
                recognised += 1;
            } else {
                warn!("Unreadable scan value for '{}': '{}'", key, value);
            }
        }

        if recognised == 0 {
            return Err(AppraisalError::MalformedScanData(
                "no recognised fields".to_string(),
            ));
        }
        Ok(rec)
    }

    fn set(&mut self, field: ScanField, value: &str) -> bool {
        match field {
            ScanField::ModelType => {
                self.model_type = non_empty(value);
                self.model_type.is_some()
            }
            ScanField::Model => {
                self.model = non_empty(value);
                self.model.is_some()
            }
            ScanField::Year => {
                self.year = parse_year(value);
                self.year.is_some()
            }
            ScanField::Mileage => {
                self.mileage = parse_mileage(value);
                self.mileage.is_some()
            }
            ScanField::Vin => {
                self.vin = non_empty(value).map(|v| v.to_ascii_uppercase());
                self.vin.is_some()
            }
            ScanField::Grade => {
                self.grade = non_empty(value);
                self.grade.is_some()
            }
            ScanField::ColorNo => {
                self.color_no = non_empty(value);
                self.color_no.is_some()
            }
        }
    }

    /// Copy of `spec` with every field this scan supplied filled in; the rest
    /// keep their current form values.
    pub fn apply_to(&self, spec: &VehicleSpec) -> VehicleSpec {
        let mut out = spec.clone();
        if let Some(v) = &self.model_type {
            out.model_type = v.clone();
        }
        if let Some(v) = &self.model {
            out.model_name = v.clone();
        }
        if let Some(v) = self.year {
            out.year = v;
        }
        if let Some(v) = self.mileage {
            out.mileage_km = v;
        }
        if let Some(v) = &self.vin {
            out.vin = Some(v.clone());
        }
        if let Some(v) = &self.color_no {
            out.color_no = Some(v.clone());
        }
        if let Some(v) = &self.grade {
            out.auction_grade = Some(v.clone());
        }
        out
    }
}

fn json_pairs(text: &str) -> AppraisalResult<Vec<(String, String)>> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
        .map_err(|e| AppraisalError::MalformedScanData(format!("invalid JSON: {}", e)))?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            serde_json::Value::Number(n) => Some((k, n.to_string())),
            _ => None,
        })
        .collect())
}

fn text_pairs(text: &str) -> Vec<(String, String)> {
    text.split(['\n', ';', '&'])
        .filter_map(|pair| {
            let pair = pair.trim();
            let idx = pair.find(['=', ':'])?;
            let (k, v) = pair.split_at(idx);
            Some((k.trim().to_string(), v[1..].trim().to_string()))
        })
        .collect()
}
