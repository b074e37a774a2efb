//! Static defect catalog: what kinds of damage exist, how they are graded and
//! what they cost.

use crate::consts::{DEFAULT_BASE_COST, DEFAULT_LEVEL_MULTIPLIER};
use crate::error::{AppraisalError, AppraisalResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum DefectTypeCode {
    #[strum(to_string = "scratch", serialize = "A")]
    #[serde(alias = "A")]
    Scratch,
    #[strum(to_string = "dent", serialize = "U")]
    #[serde(alias = "U")]
    Dent,
    #[strum(to_string = "bumper-scuff", serialize = "B")]
    #[serde(alias = "B")]
    BumperScuff,
    #[strum(to_string = "repair-mark", serialize = "W")]
    #[serde(alias = "W")]
    RepairMark,
    #[strum(to_string = "rust", serialize = "S")]
    #[serde(alias = "S")]
    Rust,
    #[strum(to_string = "glass-damage", serialize = "G", serialize = "glass")]
    #[serde(alias = "G", alias = "glass")]
    GlassDamage,
    #[strum(to_string = "paint-loss", serialize = "P")]
    #[serde(alias = "P")]
    PaintLoss,
    #[strum(to_string = "replacement-history", serialize = "XX", serialize = "X")]
    #[serde(alias = "XX", alias = "X")]
    ReplacementHistory,

    // Stale or foreign codes read back from storage.
    #[strum(to_string = "unknown")]
    #[serde(other)]
    Unknown,
}

impl Default for DefectTypeCode {
    fn default() -> Self {
        Self::Unknown
    }
}

/// How a defect type expresses severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelScheme {
    /// Minor / Moderate / Severe.
    Graded,
    /// Two alternative labels instead of numeric levels.
    Binary { first: Severity, second: Severity },
    /// No severity at all.
    LevelLess,
}

impl DefectTypeCode {
    /// Every code an inspector can record (excludes `Unknown`).
    pub fn known() -> impl Iterator<Item = DefectTypeCode> {
        DefectTypeCode::iter().filter(|c| *c != DefectTypeCode::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scratch => "Scratch",
            Self::Dent => "Dent",
            Self::BumperScuff => "Bumper scuff",
            Self::RepairMark => "Repair mark",
            Self::Rust => "Rust",
            Self::GlassDamage => "Glass chip/crack",
            Self::PaintLoss => "Paint loss",
            Self::ReplacementHistory => "Replaced",
            Self::Unknown => "Unknown",
        }
    }

    /// Auction-sheet style short code printed on the diagram.
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Scratch => "A",
            Self::Dent => "U",
            Self::BumperScuff => "B",
            Self::RepairMark => "W",
            Self::Rust => "S",
            Self::GlassDamage => "G",
            Self::PaintLoss => "P",
            Self::ReplacementHistory => "XX",
            Self::Unknown => "?",
        }
    }

    pub fn base_cost(&self) -> f32 {
        match self {
            Self::Scratch => 0.2,
            Self::Dent => 0.3,
            Self::BumperScuff => 0.2,
            Self::RepairMark => 0.4,
            Self::Rust => 0.3,
            Self::GlassDamage => 0.3,
            Self::PaintLoss => 0.2,
            Self::ReplacementHistory => 1.0,
            Self::Unknown => DEFAULT_BASE_COST,
        }
    }

    pub fn level_scheme(&self) -> LevelScheme {
        match self {
            Self::GlassDamage => LevelScheme::Binary {
                first: Severity::Crack,
                second: Severity::Repaired,
            },
            Self::ReplacementHistory => LevelScheme::LevelLess,
            _ => LevelScheme::Graded,
        }
    }

    /// Deformation-type damage that carries the dent surcharge.
    pub fn is_dent_like(&self) -> bool {
        matches!(self, Self::Dent | Self::BumperScuff)
    }

    /// Level recorded when the inspector taps instead of swiping.
    pub fn tap_level(&self) -> Option<Severity> {
        match self.level_scheme() {
            LevelScheme::Graded => Some(Severity::Minor),
            LevelScheme::Binary { .. } | LevelScheme::LevelLess => None,
        }
    }

    /// Whether `level` is meaningful for this type.
    pub fn accepts(&self, level: Option<Severity>) -> bool {
        match (self.level_scheme(), level) {
            (_, None) => true,
            (LevelScheme::Graded, Some(l)) => l.ordinal().is_some(),
            (LevelScheme::Binary { first, second }, Some(l)) => l == first || l == second,
            (LevelScheme::LevelLess, Some(_)) => false,
        }
    }
}

/// Severity of a recorded defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Crack,
    Repaired,
}

impl Severity {
    /// Numeric level 1..=3 for graded severities.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Minor => Some(1),
            Self::Moderate => Some(2),
            Self::Severe => Some(3),
            Self::Crack | Self::Repaired => None,
        }
    }

    pub fn from_ordinal(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::Minor),
            2 => Some(Self::Moderate),
            3 => Some(Self::Severe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "1",
            Self::Moderate => "2",
            Self::Severe => "3",
            Self::Crack => "crack",
            Self::Repaired => "repaired",
        }
    }

    pub fn multiplier(&self) -> f32 {
        match self {
            Self::Minor => 1.0,
            Self::Moderate => 2.0,
            Self::Severe => 3.0,
            Self::Crack => 2.0,
            Self::Repaired => 1.0,
        }
    }

    /// Lenient decoding of a stored level value.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_ordinal),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for Severity {
    type Err = AppraisalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        match t.as_str() {
            "1" | "minor" | "l1" => Ok(Self::Minor),
            "2" | "moderate" | "l2" => Ok(Self::Moderate),
            "3" | "severe" | "l3" => Ok(Self::Severe),
            "crack" | "cracked" => Ok(Self::Crack),
            "repaired" | "repair" => Ok(Self::Repaired),
            _ => Err(AppraisalError::UnknownSeverityLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Graded levels are stored as numbers, alternative labels as strings.
impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.ordinal() {
            Some(n) => serializer.serialize_u8(n),
            None => serializer.serialize_str(self.label()),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Severity::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown severity level {}", value)))
    }
}

/// Field deserializer for `Option<Severity>` that never fails: anything it
/// cannot read becomes "no level".
pub fn lenient_level<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => {
            let parsed = Severity::from_json(&v);
            if parsed.is_none() {
                warn!("Ignoring unrecognised severity level {}", v);
            }
            parsed
        }
    })
}

/// Field deserializer for `DefectTypeCode` that maps anything unreadable
/// (numbers, objects, retired codes) to `Unknown`.
pub fn lenient_code<'de, D>(deserializer: D) -> Result<DefectTypeCode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let code = match &value {
        serde_json::Value::String(s) => DefectTypeCode::from_str(s.trim()).ok(),
        _ => None,
    };
    Ok(code.unwrap_or_else(|| {
        warn!("Substituting unknown defect code for {}", value);
        DefectTypeCode::Unknown
    }))
}

/// Strict code lookup for operator input.
pub fn parse_code(s: &str) -> AppraisalResult<DefectTypeCode> {
    match DefectTypeCode::from_str(s.trim()) {
        Ok(DefectTypeCode::Unknown) | Err(_) => {
            Err(AppraisalError::UnknownDefectCode(s.trim().to_string()))
        }
        Ok(code) => Ok(code),
    }
}

pub fn parse_level(s: &str) -> AppraisalResult<Severity> {
    s.parse()
}

/// Multiplier for an optional level, defaulting when absent.
pub fn level_multiplier(level: Option<Severity>) -> f32 {
    level.map_or(DEFAULT_LEVEL_MULTIPLIER, |l| l.multiplier())
}

/// Informational point cost of a single (type, level) pair.
pub fn weighted_cost(code: DefectTypeCode, level: Option<Severity>) -> f32 {
    code.base_cost() * level_multiplier(level)
}
