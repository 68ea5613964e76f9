//! Whole-country aggregates from the secondary provider

use serde::{Deserialize, Serialize};

/// Population and flag snapshot for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryAggregate {
    /// Common country name
    pub name: String,
    /// Total population
    pub population: u64,
    /// Flag image URL (SVG)
    pub flag: String,
}

/// Country entry as returned by the "all countries" endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct RawCountry {
    pub name: RawCountryName,
    #[serde(default)]
    pub flags: RawFlagImages,
    #[serde(default)]
    pub population: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCountryName {
    pub common: String,
}

/// Flag image variants offered by the country providers
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFlagImages {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
}

impl RawFlagImages {
    /// PNG when present, otherwise SVG; blank URLs are ignored
    pub fn preferred(&self) -> Option<&str> {
        [self.png.as_deref(), self.svg.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
    }
}

impl From<RawCountry> for CountryAggregate {
    fn from(raw: RawCountry) -> Self {
        Self {
            name: raw.name.common,
            population: raw.population,
            flag: raw.flags.svg.unwrap_or_default(),
        }
    }
}
