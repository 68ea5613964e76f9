//! Whole-country aggregate fetcher

use log::{error, info};

use super::{FetchOutcome, decode_entries};
use crate::config::Endpoints;
use crate::error::PopulationError;
use crate::models::CountryAggregate;
use crate::models::country::RawCountry;
use crate::transport::JsonTransport;

const COUNTRIES_ENDPOINT: &str = "all countries";

/// Fetcher for the secondary provider's country listing
#[derive(Debug, Clone)]
pub struct SecondaryFetcher<T> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: JsonTransport> SecondaryFetcher<T> {
    /// Create a fetcher
    pub const fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Fetch name, population and flag for every country
    ///
    /// Fields come straight from the response; no reconciliation is needed.
    /// A failed call yields an empty outcome.
    pub async fn fetch_country_aggregates(&self) -> FetchOutcome<CountryAggregate> {
        let body = match self.endpoints.all_countries_url() {
            Ok(url) => self
                .transport
                .get_json(&url)
                .await
                .map_err(|e| PopulationError::unavailable(COUNTRIES_ENDPOINT, e)),
            Err(e) => Err(e),
        };

        let outcome = match body {
            Ok(serde_json::Value::Array(entries)) => {
                decode_entries::<RawCountry>(COUNTRIES_ENDPOINT, entries)
                    .map(CountryAggregate::from)
            }
            Ok(_) => FetchOutcome::unavailable(PopulationError::unavailable(
                COUNTRIES_ENDPOINT,
                "expected an array of countries",
            )),
            Err(e) => FetchOutcome::unavailable(e),
        };

        if let Some(e) = outcome.error().filter(|_| outcome.data().is_empty()) {
            error!("Error fetching countries data: {e}");
        }
        info!("Fetched {} country aggregates", outcome.data().len());
        outcome
    }
}
