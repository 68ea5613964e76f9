//! City-level population records from the primary provider

use serde::{Deserialize, Serialize};

use super::types::{lenient_f64, lenient_i32};

/// One observation in a city's population series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationCount {
    /// Census or estimate year
    #[serde(deserialize_with = "lenient_i32")]
    pub year: i32,
    /// Population count
    #[serde(deserialize_with = "lenient_f64")]
    pub value: f64,
}

/// Population time series for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// Country name as spelled by the provider
    pub country: String,
    /// City name
    pub city: String,
    /// Observations in provider order; may be empty
    #[serde(rename = "populationCounts", default)]
    pub population_counts: Vec<PopulationCount>,
}

impl PopulationRecord {
    /// Create a record
    #[must_use]
    pub fn new(country: &str, city: &str, population_counts: Vec<PopulationCount>) -> Self {
        Self {
            country: country.to_string(),
            city: city.to_string(),
            population_counts,
        }
    }

    /// The figure shown in list and chart views: the first observation, or 0
    #[must_use]
    pub fn headline_population(&self) -> f64 {
        self.population_counts.first().map_or(0.0, |count| count.value)
    }

    /// The observation with the highest year, if any
    #[must_use]
    pub fn latest_count(&self) -> Option<&PopulationCount> {
        self.population_counts.iter().max_by_key(|count| count.year)
    }

    /// Series sorted by year, for charting
    #[must_use]
    pub fn series_by_year(&self) -> Vec<(i32, f64)> {
        let mut series: Vec<(i32, f64)> = self
            .population_counts
            .iter()
            .map(|count| (count.year, count.value))
            .collect();
        series.sort_by_key(|(year, _)| *year);
        series
    }
}
