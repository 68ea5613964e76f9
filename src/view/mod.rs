//! View models for the city and country lists and charts
//!
//! Search, sort and pagination operate on borrowed slices so the loaded
//! dataset stays untouched between queries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::loader::CityDataset;
use crate::models::{CountryAggregate, PopulationBand, PopulationRecord};

/// One page of a filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// Items on this page
    pub items: &'a [T],
    /// Zero-based page index after clamping
    pub index: usize,
    /// Number of pages; at least one
    pub page_count: usize,
    /// Number of items across all pages
    pub total: usize,
}

impl<T> Page<'_, T> {
    /// Whether a previous page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Whether a next page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index + 1 < self.page_count
    }
}

/// Slice out page `page` of `items`; out-of-range pages clamp to the last one
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let page_count = total.div_ceil(page_size).max(1);
    let index = page.min(page_count - 1);
    let start = (index * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: &items[start..end],
        index,
        page_count,
        total,
    }
}

/// City records whose city or country contains `query`, ignoring case
#[must_use]
pub fn search_cities<'a>(
    records: &'a [PopulationRecord],
    query: &str,
) -> Vec<&'a PopulationRecord> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            query.is_empty()
                || record.country.to_lowercase().contains(&query)
                || record.city.to_lowercase().contains(&query)
        })
        .collect()
}

/// Countries whose name contains `query`, ignoring case
#[must_use]
pub fn search_countries<'a>(
    countries: &'a [CountryAggregate],
    query: &str,
) -> Vec<&'a CountryAggregate> {
    let query = query.trim().to_lowercase();
    countries
        .iter()
        .filter(|country| query.is_empty() || country.name.to_lowercase().contains(&query))
        .collect()
}

/// Sort order for the country list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountrySort {
    /// Name, A to Z
    #[default]
    NameAsc,
    /// Name, Z to A
    NameDesc,
    /// Smallest population first
    PopulationAsc,
    /// Largest population first
    PopulationDesc,
}

impl FromStr for CountrySort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "population-asc" => Ok(Self::PopulationAsc),
            "population-desc" => Ok(Self::PopulationDesc),
            other => Err(format!(
                "unknown sort {other:?}; expected name-asc, name-desc, \
                 population-asc or population-desc"
            )),
        }
    }
}

impl fmt::Display for CountrySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::PopulationAsc => "population-asc",
            Self::PopulationDesc => "population-desc",
        };
        f.write_str(s)
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Sort countries in place; ties keep their relative order
pub fn sort_countries(countries: &mut [&CountryAggregate], sort: CountrySort) {
    match sort {
        CountrySort::NameAsc => countries.sort_by(|a, b| compare_names(&a.name, &b.name)),
        CountrySort::NameDesc => countries.sort_by(|a, b| compare_names(&b.name, &a.name)),
        CountrySort::PopulationAsc => countries.sort_by_key(|c| c.population),
        CountrySort::PopulationDesc => countries.sort_by(|a, b| b.population.cmp(&a.population)),
    }
}

/// Round a population figure for display
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn display_population(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// A city list row with its reconciled flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRow<'a> {
    /// Country as spelled by the provider
    pub country: &'a str,
    /// City name
    pub city: &'a str,
    /// Headline population, rounded
    pub population: u64,
    /// Size category
    pub band: PopulationBand,
    /// Flag URL, `""` when none is known
    pub flag: &'a str,
}

/// Build list rows for `records`, looking up each flag in `dataset`
#[must_use]
pub fn city_rows<'a>(
    dataset: &'a CityDataset,
    records: &[&'a PopulationRecord],
) -> Vec<CityRow<'a>> {
    records
        .iter()
        .map(|record| {
            let population = display_population(record.headline_population());
            CityRow {
                country: &record.country,
                city: &record.city,
                population,
                band: PopulationBand::from(population),
                flag: dataset.flag_for(record),
            }
        })
        .collect()
}

/// Labels and values for a bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Chart title
    pub title: String,
    /// Dataset label
    pub label: String,
    /// One label per bar
    pub labels: Vec<String>,
    /// One value per bar
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Largest value, 0 for an empty series
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Whether the chart has no bars
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Bar chart of city headline populations
#[must_use]
pub fn city_chart(records: &[&PopulationRecord]) -> ChartSeries {
    ChartSeries {
        title: "Population Chart".to_string(),
        label: "Population".to_string(),
        labels: records.iter().map(|r| r.city.clone()).collect(),
        values: records.iter().map(|r| r.headline_population()).collect(),
    }
}

/// Bar chart of country populations
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn country_chart(countries: &[&CountryAggregate]) -> ChartSeries {
    ChartSeries {
        title: "Country Population Distribution".to_string(),
        label: "Population".to_string(),
        labels: countries.iter().map(|c| c.name.clone()).collect(),
        values: countries.iter().map(|c| c.population as f64).collect(),
    }
}
