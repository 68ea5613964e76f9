//! Flag entries and the reconciled flag map

use std::collections::hash_map;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::normalize::NameNormalizer;

/// Raw flag entry keyed by the provider's own spelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEntry {
    /// Country name as spelled by the flag provider
    pub name: String,
    /// Flag image URL
    #[serde(rename = "flag")]
    pub flag_url: String,
}

impl FlagEntry {
    /// Create an entry
    #[must_use]
    pub fn new(name: &str, flag_url: &str) -> Self {
        Self {
            name: name.to_string(),
            flag_url: flag_url.to_string(),
        }
    }
}

/// Lowercased canonical country name to flag URL
///
/// An empty URL means "no flag available". Built by the reconciler during a
/// single load and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    flags: FxHashMap<String, String>,
}

impl FlagMap {
    /// Insert under the lowercased key; later inserts win
    pub(crate) fn insert(&mut self, canonical: &str, flag_url: String) {
        self.flags.insert(canonical.to_lowercase(), flag_url);
    }

    /// Flag URL for a canonical name, in any casing
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.flags.get(&canonical.to_lowercase()).map(String::as_str)
    }

    /// Whether a key exists for this canonical name
    #[must_use]
    pub fn contains(&self, canonical: &str) -> bool {
        self.flags.contains_key(&canonical.to_lowercase())
    }

    /// Flag URL for a provider country name, or `""` when there is none
    #[must_use]
    pub fn flag_for<'a>(&'a self, normalizer: &NameNormalizer, country: &str) -> &'a str {
        self.flags
            .get(&normalizer.canonical_key(country))
            .map_or("", String::as_str)
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the map has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate over `(key, flag_url)` pairs in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.flags.iter()
    }
}

impl<'a> IntoIterator for &'a FlagMap {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
