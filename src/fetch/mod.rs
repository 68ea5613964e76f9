//! Fetchers for the external population and flag providers
//!
//! Fetch failures never propagate to the caller as `Err`. Each fetch returns
//! a [`FetchOutcome`] that keeps "empty because the dataset is empty" apart
//! from "empty because the call failed".

pub mod fallback;
pub mod primary;
pub mod secondary;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PopulationError;

pub use fallback::{FallbackFlagLookup, FallbackReport};
pub use primary::PrimaryFetcher;
pub use secondary::SecondaryFetcher;

/// Result of one provider fetch
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Every entry was retrieved and decoded
    Complete(Vec<T>),
    /// The fetch failed (`data` is empty) or some entries were dropped
    Degraded {
        /// Entries that could be used
        data: Vec<T>,
        /// Why the outcome is incomplete
        error: PopulationError,
    },
}

impl<T> FetchOutcome<T> {
    /// Outcome for a call that produced nothing usable
    #[must_use]
    pub const fn unavailable(error: PopulationError) -> Self {
        Self::Degraded {
            data: Vec::new(),
            error,
        }
    }

    /// Entries retrieved, possibly empty
    #[must_use]
    pub fn data(&self) -> &[T] {
        match self {
            Self::Complete(data) | Self::Degraded { data, .. } => data,
        }
    }

    /// Take the entries, dropping any error
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.into_parts().0
    }

    /// Split into entries and the degradation reason
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<PopulationError>) {
        match self {
            Self::Complete(data) => (data, None),
            Self::Degraded { data, error } => (data, Some(error)),
        }
    }

    /// Whether the outcome is incomplete
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The degradation reason, if any
    #[must_use]
    pub const fn error(&self) -> Option<&PopulationError> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { error, .. } => Some(error),
        }
    }

    /// Transform each entry, keeping the degradation reason
    #[must_use]
    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Self::Complete(data) => FetchOutcome::Complete(data.into_iter().map(f).collect()),
            Self::Degraded { data, error } => FetchOutcome::Degraded {
                data: data.into_iter().map(f).collect(),
                error,
            },
        }
    }
}

/// Decode each array entry independently, skipping the ones that fail
pub(crate) fn decode_entries<E: DeserializeOwned>(
    endpoint: &str,
    entries: Vec<Value>,
) -> FetchOutcome<E> {
    let total = entries.len();
    let mut skipped = 0;
    let mut data = Vec::with_capacity(total);

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<E>(entry) {
            Ok(decoded) => data.push(decoded),
            Err(e) => {
                skipped += 1;
                debug!("{endpoint}: entry {index} skipped: {e}");
            }
        }
    }

    if skipped == 0 {
        FetchOutcome::Complete(data)
    } else {
        warn!("{endpoint}: skipped {skipped} of {total} malformed entries");
        FetchOutcome::Degraded {
            data,
            error: PopulationError::MalformedEntries {
                endpoint: endpoint.to_string(),
                skipped,
            },
        }
    }
}
