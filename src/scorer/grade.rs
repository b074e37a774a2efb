use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Appraisal grade scale. Declaration order is ascending, so the derived
/// ordering gives `R < 3 < 3.5 < 4 < 4.5 < 5 < 6 < S`.
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
pub enum AppraisalGrade {
    #[strum(to_string = "R")]
    #[serde(rename = "R")]
    R,
    #[strum(to_string = "3")]
    #[serde(rename = "3")]
    Three,
    #[strum(to_string = "3.5")]
    #[serde(rename = "3.5")]
    ThreeHalf,
    #[strum(to_string = "4")]
    #[serde(rename = "4")]
    Four,
    #[strum(to_string = "4.5")]
    #[serde(rename = "4.5")]
    FourHalf,
    #[strum(to_string = "5")]
    #[serde(rename = "5")]
    Five,
    #[strum(to_string = "6")]
    #[serde(rename = "6")]
    Six,
    #[strum(to_string = "S")]
    #[serde(rename = "S")]
    S,
}

impl AppraisalGrade {
    /// Numeric scale value; `R` has none.
    pub fn numeric(&self) -> Option<f32> {
        match self {
            Self::S => Some(10.0),
            Self::Six => Some(6.0),
            Self::Five => Some(5.0),
            Self::FourHalf => Some(4.5),
            Self::Four => Some(4.0),
            Self::ThreeHalf => Some(3.5),
            Self::Three => Some(3.0),
            Self::R => None,
        }
    }

    /// Highest grade whose numeric value is at or below `value`.
    pub fn from_numeric(value: f32) -> Self {
        if value >= 10.0 {
            Self::S
        } else if value >= 6.0 {
            Self::Six
        } else if value >= 5.0 {
            Self::Five
        } else if value >= 4.5 {
            Self::FourHalf
        } else if value >= 4.0 {
            Self::Four
        } else if value >= 3.5 {
            Self::ThreeHalf
        } else if value >= 3.0 {
            Self::Three
        } else {
            Self::R
        }
    }

    /// Lenient decoding of a stored grade (string or number).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::from_str(s.trim()).ok(),
            serde_json::Value::Number(n) => {
                let v = n.as_f64()? as f32;
                match Self::from_numeric(v) {
                    g if g.numeric() == Some(v) => Some(g),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Field deserializer for `Option<AppraisalGrade>` that never fails.
pub fn lenient_grade<'de, D>(deserializer: D) -> Result<Option<AppraisalGrade>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(AppraisalGrade::from_json))
}

/// Cabin condition, A (best) to E.
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
pub enum InteriorRank {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
    #[serde(alias = "d")]
    D,
    #[serde(alias = "e")]
    E,
}

impl InteriorRank {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Field deserializer for `Option<InteriorRank>` that never fails.
pub fn lenient_rank<'de, D>(deserializer: D) -> Result<Option<InteriorRank>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => InteriorRank::from_str(s.trim()).ok(),
        _ => None,
    })
}
