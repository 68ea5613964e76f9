//! Common domain type definitions

use serde::Deserialize;
use serde::de::{self, Deserializer};

/// Population above which a row counts as medium
pub const MEDIUM_POPULATION_THRESHOLD: f64 = 1_000_000.0;
/// Population above which a row counts as high
pub const HIGH_POPULATION_THRESHOLD: f64 = 5_000_000.0;

/// Coarse population size category used to colour list rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopulationBand {
    /// Up to one million
    Low,
    /// More than one million
    Medium,
    /// More than five million
    High,
}

impl From<f64> for PopulationBand {
    fn from(population: f64) -> Self {
        if population > HIGH_POPULATION_THRESHOLD {
            Self::High
        } else if population > MEDIUM_POPULATION_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl From<u64> for PopulationBand {
    #[allow(clippy::cast_precision_loss)]
    fn from(population: u64) -> Self {
        Self::from(population as f64)
    }
}

impl std::fmt::Display for PopulationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.pad(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Accept a JSON number or a numeric string
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("not a number: {s:?} ({e})"))),
    }
}

/// Accept a JSON integer or an integer string
pub(crate) fn lenient_i32<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!("not a year: {value}")));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(value as i32)
}
