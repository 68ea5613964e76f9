//! Flag reconciliation
//!
//! Joins the flag list with the population records through the name
//! normalizer. Reconciliation runs in two passes: build the flag map from
//! the provider's flag list, then patch in the de-duplicated set of
//! countries that are still missing a flag by querying the fallback
//! provider once per country.

use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info};

use crate::fetch::{FallbackFlagLookup, FallbackReport};
use crate::models::{FlagEntry, FlagMap, PopulationRecord};
use crate::normalize::NameNormalizer;
use crate::transport::JsonTransport;

/// Records plus the completed flag map from one reconciliation pass
#[derive(Debug)]
pub struct Reconciliation {
    /// Records, unchanged
    pub records: Vec<PopulationRecord>,
    /// Lowercased canonical name to flag URL (`""` when unresolved)
    pub flags: FlagMap,
    /// Canonical names that had no flag after the first pass, first-seen order
    pub missing: Vec<String>,
    /// Per-name fallback results; empty when nothing was looked up
    pub fallback: FallbackReport,
}

/// Build a flag map keyed by lowercased canonical name
///
/// Later entries overwrite earlier ones with the same key.
#[must_use]
pub fn build_flag_map(normalizer: &NameNormalizer, flags: &[FlagEntry]) -> FlagMap {
    let mut flag_map = FlagMap::default();
    for entry in flags {
        flag_map.insert(normalizer.normalize(&entry.name), entry.flag_url.clone());
    }
    flag_map
}

/// Canonical names of record countries with no usable flag in `flag_map`
///
/// A key whose URL is blank counts as missing. Each country appears once,
/// in the order it is first seen.
#[must_use]
pub fn missing_countries(
    normalizer: &NameNormalizer,
    records: &[PopulationRecord],
    flag_map: &FlagMap,
) -> Vec<String> {
    records
        .iter()
        .map(|record| normalizer.normalize(&record.country))
        .filter(|canonical| flag_map.get(canonical).is_none_or(str::is_empty))
        .unique_by(|canonical| canonical.to_lowercase())
        .map(str::to_string)
        .collect()
}

/// Joins flags to population records, with an optional fallback provider
#[derive(Debug, Clone)]
pub struct FlagReconciler<T> {
    normalizer: Arc<NameNormalizer>,
    fallback: Option<FallbackFlagLookup<T>>,
}

impl<T: JsonTransport> FlagReconciler<T> {
    /// Reconciler that resolves missing flags through `fallback`
    pub const fn new(normalizer: Arc<NameNormalizer>, fallback: FallbackFlagLookup<T>) -> Self {
        Self {
            normalizer,
            fallback: Some(fallback),
        }
    }

    /// Reconciler that leaves missing flags empty without any lookups
    pub const fn without_fallback(normalizer: Arc<NameNormalizer>) -> Self {
        Self {
            normalizer,
            fallback: None,
        }
    }

    /// The normalizer used for join keys
    pub fn normalizer(&self) -> &Arc<NameNormalizer> {
        &self.normalizer
    }

    /// Join `flags` to `records`, resolving missing countries via fallback
    ///
    /// Never fails: countries the fallback cannot resolve map to `""`.
    pub async fn reconcile(
        &self,
        records: Vec<PopulationRecord>,
        flags: &[FlagEntry],
    ) -> Reconciliation {
        let mut flag_map = build_flag_map(&self.normalizer, flags);
        let missing = missing_countries(&self.normalizer, &records, &flag_map);
        debug!(
            "{} flag keys from provider, {} countries missing a flag",
            flag_map.len(),
            missing.len()
        );

        let fallback = match (&self.fallback, missing.is_empty()) {
            (Some(lookup), false) => lookup.fetch_fallback_flags(missing.as_slice()).await,
            _ => FallbackReport::default(),
        };

        let resolved = fallback.flags();
        for name in &missing {
            let flag_url = resolved
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_default();
            flag_map.insert(name, flag_url);
        }

        info!(
            "Reconciled {} records against {} flags ({} missing, {} resolved by fallback)",
            records.len(),
            flag_map.len(),
            missing.len(),
            fallback.resolved_count()
        );

        Reconciliation {
            records,
            flags: flag_map,
            missing,
            fallback,
        }
    }
}
