//! Per-country flag lookup against the fallback provider
//!
//! Names are looked up one at a time, each request awaited before the next
//! starts, so a large missing set never floods the provider. Each name gets
//! its own result; the lookup as a whole never fails.

use log::{debug, error, info, warn};
use rustc_hash::FxHashMap;

use crate::config::Endpoints;
use crate::error::{PopulationError, Result};
use crate::models::country::RawFlagImages;
use crate::transport::JsonTransport;

/// Names the fallback provider only knows under a different spelling
const SPELLING_CORRECTIONS: &[(&str, &str)] = &[("Aland Islands", "Åland Islands")];

/// Per-name results of one fallback pass, in lookup order
#[derive(Debug, Default)]
pub struct FallbackReport {
    outcomes: Vec<(String, Result<String>)>,
}

impl FallbackReport {
    /// All `(name, result)` pairs in lookup order
    #[must_use]
    pub fn outcomes(&self) -> &[(String, Result<String>)] {
        &self.outcomes
    }

    /// Resolved flags keyed by lowercased name
    #[must_use]
    pub fn flags(&self) -> FxHashMap<String, String> {
        self.outcomes
            .iter()
            .filter_map(|(name, result)| {
                result
                    .as_ref()
                    .ok()
                    .map(|url| (name.to_lowercase(), url.clone()))
            })
            .collect()
    }

    /// Number of names that resolved to a flag
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    /// Names that did not resolve, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PopulationError)> {
        self.outcomes
            .iter()
            .filter_map(|(name, result)| result.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Whether no lookups were attempted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Whether a name is safe to place in a URL path segment
///
/// Only ASCII letters, whitespace, apostrophes and hyphens are allowed.
#[must_use]
pub fn is_valid_country_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-')
}

/// The spelling to send to the fallback provider for `name`
#[must_use]
pub fn corrected_spelling(name: &str) -> &str {
    SPELLING_CORRECTIONS
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to)
}

/// Sequential flag lookup by country name
#[derive(Debug, Clone)]
pub struct FallbackFlagLookup<T> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: JsonTransport> FallbackFlagLookup<T> {
    /// Create a lookup
    pub const fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Look up each name in order and report what resolved
    pub async fn fetch_fallback_flags<S: AsRef<str>>(&self, names: &[S]) -> FallbackReport {
        let mut report = FallbackReport::default();

        for name in names {
            let name = name.as_ref();
            let result = self.lookup(name).await;
            report.outcomes.push((name.to_string(), result));
        }

        info!(
            "Fallback flag lookup resolved {} of {} countries",
            report.resolved_count(),
            report.outcomes.len()
        );
        report
    }

    async fn lookup(&self, name: &str) -> Result<String> {
        if !is_valid_country_name(name) {
            warn!("Skipping invalid country entry: {name:?}");
            return Err(PopulationError::InvalidNameInput(name.to_string()));
        }

        let query = corrected_spelling(name);
        let url = self.endpoints.country_by_name_url(query)?;
        debug!("Looking up fallback flag for {name} at {url}");

        let body = match self.transport.get_json(&url).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                warn!("Flag not found for {name}: 404 Not Found");
                return Err(PopulationError::FlagNotFound(name.to_string()));
            }
            Err(e) => {
                error!("Error fetching flag for {name}: {e}");
                return Err(PopulationError::FlagLookupFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let countries: Vec<FallbackCountry> = serde_json::from_value(body).map_err(|e| {
            error!("Error decoding flag response for {name}: {e}");
            PopulationError::FlagLookupFailed {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        countries
            .first()
            .and_then(|country| country.flags.preferred())
            .map(str::to_string)
            .ok_or_else(|| {
                debug!("Fallback response for {name} carries no flag image");
                PopulationError::FlagNotFound(name.to_string())
            })
    }
}

#[derive(Debug, serde::Deserialize)]
struct FallbackCountry {
    #[serde(default)]
    flags: RawFlagImages,
}
