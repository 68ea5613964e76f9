//! City population and flag list fetcher
//!
//! The primary provider wraps payloads in `{ "error": bool, "msg": ..., "data": [...] }`.

use log::{error, info};
use reqwest::Url;
use serde_json::Value;

use super::{FetchOutcome, decode_entries};
use crate::config::Endpoints;
use crate::error::{PopulationError, Result};
use crate::models::{FlagEntry, PopulationRecord};
use crate::transport::JsonTransport;

const RECORDS_ENDPOINT: &str = "city population";
const FLAGS_ENDPOINT: &str = "flag images";

/// Fetcher for the primary provider's two independent endpoints
#[derive(Debug, Clone)]
pub struct PrimaryFetcher<T> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: JsonTransport> PrimaryFetcher<T> {
    /// Create a fetcher
    pub const fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Fetch city population records; a failed call yields an empty outcome
    pub async fn fetch_population_records(&self) -> FetchOutcome<PopulationRecord> {
        let outcome = self
            .fetch(RECORDS_ENDPOINT, self.endpoints.city_population_url())
            .await;
        info!(
            "Fetched {} population records{}",
            outcome.data().len(),
            if outcome.is_degraded() { " (degraded)" } else { "" }
        );
        outcome
    }

    /// Fetch raw flag entries; a failed call yields an empty outcome
    pub async fn fetch_flag_entries(&self) -> FetchOutcome<FlagEntry> {
        let outcome = self
            .fetch(FLAGS_ENDPOINT, self.endpoints.flag_images_url())
            .await;
        info!(
            "Fetched {} flag entries{}",
            outcome.data().len(),
            if outcome.is_degraded() { " (degraded)" } else { "" }
        );
        outcome
    }

    async fn fetch<E>(&self, endpoint: &str, url: Result<Url>) -> FetchOutcome<E>
    where
        E: serde::de::DeserializeOwned,
    {
        let entries = match url {
            Ok(url) => match self.transport.get_json(&url).await {
                Ok(body) => unwrap_envelope(endpoint, body),
                Err(e) => Err(PopulationError::unavailable(endpoint, e)),
            },
            Err(e) => Err(e),
        };

        match entries {
            Ok(entries) => decode_entries(endpoint, entries),
            Err(e) => {
                error!("Error fetching {endpoint}: {e}");
                FetchOutcome::unavailable(e)
            }
        }
    }
}

/// Extract the `data` array, accepting a bare array as well
fn unwrap_envelope(endpoint: &str, body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut envelope) => {
            if envelope.get("error").and_then(Value::as_bool) == Some(true) {
                let msg = envelope
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("provider reported an error");
                return Err(PopulationError::unavailable(endpoint, msg));
            }
            match envelope.remove("data") {
                Some(Value::Array(entries)) => Ok(entries),
                _ => Err(PopulationError::unavailable(
                    endpoint,
                    "response has no data array",
                )),
            }
        }
        _ => Err(PopulationError::unavailable(
            endpoint,
            "unexpected response shape",
        )),
    }
}
