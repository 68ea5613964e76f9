//! Country name normalization
//!
//! Providers spell the same country differently ("Russian Federation" vs
//! "Russia"). [`NameNormalizer`] maps known alternate spellings to one
//! canonical display name used as the join key between datasets.

use rustc_hash::FxHashMap;

/// Alternate country names (lowercase) and their canonical display names
pub const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("åland islands", "Aland Islands"),
    ("american samoa", "American Samoa"),
    ("bolivia (plurinational state of)", "Bolivia"),
    ("british virgin islands", "British Virgin Islands"),
    ("brunei darussalam", "Brunei"),
    ("cabo verde", "Cape Verde"),
    ("china, hong kong sar", "Hong Kong"),
    ("china, macao sar", "Macao"),
    ("côte d'ivoire", "Ivory Coast"),
    ("democratic people's republic of korea", "North Korea"),
    ("faeroe islands", "Faroe Islands"),
    ("falkland islands (malvinas)", "Falkland Islands"),
    ("french guiana", "French Guiana"),
    ("holy see", "Vatican City"),
    ("iran (islamic republic of)", "Iran"),
    ("lao people's democratic republic", "Laos"),
    ("micronesia (federated states of)", "Micronesia"),
    ("republic of korea", "South Korea"),
    ("republic of moldova", "Moldova"),
    ("republic of south sudan", "South Sudan"),
    ("russian federation", "Russia"),
    ("saint helena ex. dep.", "Saint Helena"),
    ("state of palestine", "Palestine"),
    ("tfyr of macedonia", "North Macedonia"),
    (
        "united kingdom of great britain and northern ireland",
        "United Kingdom",
    ),
    ("united republic of tanzania", "Tanzania"),
    ("united states of america", "United States"),
    ("united states virgin islands", "United States Virgin Islands"),
    ("venezuela (bolivarian republic of)", "Venezuela"),
    ("wallis and futuna islands", "Wallis and Futuna"),
];

/// Immutable alternate-name to canonical-name table
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    aliases: FxHashMap<String, String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::from_pairs(COUNTRY_ALIASES.iter().copied())
    }
}

impl NameNormalizer {
    /// Build a normalizer from `(alternate, canonical)` pairs
    ///
    /// Alternate names are lowercased; canonical names keep their case.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.to_lowercase(), canonical.to_string()))
            .collect();
        Self { aliases }
    }

    /// An empty table; every name normalizes to itself
    #[must_use]
    pub fn identity() -> Self {
        Self {
            aliases: FxHashMap::default(),
        }
    }

    /// Canonical name for `raw`, or `raw` unchanged if it is not a known alias
    ///
    /// Matching is case-insensitive; unknown names are returned without any
    /// case transformation.
    #[must_use]
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases
            .get(&raw.to_lowercase())
            .map_or(raw, String::as_str)
    }

    /// Lowercased canonical name, the key used by [`crate::models::FlagMap`]
    #[must_use]
    pub fn canonical_key(&self, raw: &str) -> String {
        self.normalize(raw).to_lowercase()
    }

    /// Number of aliases in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
