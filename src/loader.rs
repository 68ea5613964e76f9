//! Data loading for the city and country views
//!
//! A city load fetches population records and flag entries concurrently,
//! waits for both, then reconciles them. A country load is a single fetch
//! from the secondary provider. Neither load fails: fetch problems are
//! carried on the returned dataset.

use std::sync::Arc;

use log::{info, warn};

use crate::config::PopulationClientConfig;
use crate::error::{PopulationError, Result};
use crate::fetch::{FallbackFlagLookup, FallbackReport, PrimaryFetcher, SecondaryFetcher};
use crate::models::{CountryAggregate, FlagMap, PopulationRecord};
use crate::normalize::NameNormalizer;
use crate::reconcile::{FlagReconciler, Reconciliation};
use crate::transport::{HttpTransport, JsonTransport};

/// Reconciled city records ready for list, chart and export views
#[derive(Debug)]
pub struct CityDataset {
    /// City records in provider order
    pub records: Vec<PopulationRecord>,
    /// Completed flag map
    pub flags: FlagMap,
    /// Countries that needed a fallback lookup
    pub missing: Vec<String>,
    /// Per-name fallback results
    pub fallback: FallbackReport,
    /// Why the record fetch is incomplete, if it is
    pub records_error: Option<PopulationError>,
    /// Why the flag fetch is incomplete, if it is
    pub flags_error: Option<PopulationError>,
    normalizer: Arc<NameNormalizer>,
}

impl CityDataset {
    fn from_parts(
        reconciliation: Reconciliation,
        records_error: Option<PopulationError>,
        flags_error: Option<PopulationError>,
        normalizer: Arc<NameNormalizer>,
    ) -> Self {
        Self {
            records: reconciliation.records,
            flags: reconciliation.flags,
            missing: reconciliation.missing,
            fallback: reconciliation.fallback,
            records_error,
            flags_error,
            normalizer,
        }
    }

    /// Flag URL for a record's country, `""` when none is known
    #[must_use]
    pub fn flag_for(&self, record: &PopulationRecord) -> &str {
        self.flags.flag_for(&self.normalizer, &record.country)
    }

    /// Normalizer used to build the flag map
    #[must_use]
    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Whether either primary fetch was incomplete
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.records_error.is_some() || self.flags_error.is_some()
    }
}

/// Country aggregates for the country view
#[derive(Debug, Default)]
pub struct CountryDataset {
    /// Countries in provider order
    pub countries: Vec<CountryAggregate>,
    /// Why the fetch is incomplete, if it is
    pub error: Option<PopulationError>,
}

impl CountryDataset {
    /// Whether the fetch was incomplete
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Loads datasets from the providers
#[derive(Debug, Clone)]
pub struct PopulationLoader<T> {
    primary: PrimaryFetcher<T>,
    secondary: SecondaryFetcher<T>,
    reconciler: FlagReconciler<T>,
}

impl PopulationLoader<HttpTransport> {
    /// Loader over HTTP with the default name table
    pub fn from_config(config: &PopulationClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::new(
            transport,
            config,
            Arc::new(NameNormalizer::default()),
        ))
    }
}

impl<T: JsonTransport + Clone> PopulationLoader<T> {
    /// Create a loader sharing one transport across all providers
    pub fn new(
        transport: T,
        config: &PopulationClientConfig,
        normalizer: Arc<NameNormalizer>,
    ) -> Self {
        let endpoints = config.endpoints.clone();
        let reconciler = if config.fallback_enabled {
            FlagReconciler::new(
                normalizer,
                FallbackFlagLookup::new(transport.clone(), endpoints.clone()),
            )
        } else {
            FlagReconciler::without_fallback(normalizer)
        };

        Self {
            primary: PrimaryFetcher::new(transport.clone(), endpoints.clone()),
            secondary: SecondaryFetcher::new(transport, endpoints),
            reconciler,
        }
    }

    /// Fetch records and flags concurrently, then reconcile
    pub async fn load_city_dataset(&self) -> CityDataset {
        let (records, flags) = futures::join!(
            self.primary.fetch_population_records(),
            self.primary.fetch_flag_entries()
        );
        let (records, records_error) = records.into_parts();
        let (flags, flags_error) = flags.into_parts();

        if let Some(e) = &flags_error {
            warn!("Flag list incomplete, more countries will need fallback lookups: {e}");
        }

        let reconciliation = self.reconciler.reconcile(records, &flags).await;
        let dataset = CityDataset::from_parts(
            reconciliation,
            records_error,
            flags_error,
            Arc::clone(self.reconciler.normalizer()),
        );
        info!(
            "City dataset ready: {} records, {} flags{}",
            dataset.records.len(),
            dataset.flags.len(),
            if dataset.is_degraded() { " (degraded)" } else { "" }
        );
        dataset
    }

    /// Fetch whole-country aggregates
    pub async fn load_country_dataset(&self) -> CountryDataset {
        let (countries, error) = self.secondary.fetch_country_aggregates().await.into_parts();
        CountryDataset { countries, error }
    }
}
