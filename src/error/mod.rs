//! Error handling for population data loading.

use std::io;

use crate::transport::TransportError;

/// Specialized error type for population and flag loading
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// A primary or secondary fetch failed (network or non-success status)
    #[error("Data unavailable from {endpoint}: {reason}")]
    DataUnavailable {
        /// Endpoint that failed
        endpoint: String,
        /// Underlying failure
        reason: String,
    },

    /// Some entries in an otherwise successful response could not be decoded
    #[error("Skipped {skipped} malformed entries from {endpoint}")]
    MalformedEntries {
        /// Endpoint that returned the entries
        endpoint: String,
        /// Number of entries dropped
        skipped: usize,
    },

    /// The fallback provider has no country under this name
    #[error("Flag not found for {0}")]
    FlagNotFound(String),

    /// The fallback lookup failed for a reason other than "not found"
    #[error("Flag lookup failed for {name}: {reason}")]
    FlagLookupFailed {
        /// Country name that was looked up
        name: String,
        /// Underlying failure
        reason: String,
    },

    /// A country name contains characters that may not reach a URL path
    #[error("Invalid country name input: {0:?}")]
    InvalidNameInput(String),

    /// HTTP transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The load was superseded or the view went away before it completed
    #[error("Load cancelled")]
    Cancelled,

    /// Export was requested with nothing selected
    #[error("No data selected for export")]
    EmptySelection,
}

impl PopulationError {
    /// Create a `DataUnavailable` error for an endpoint
    pub fn unavailable(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is one of the per-name fallback conditions
    #[must_use]
    pub const fn is_flag_condition(&self) -> bool {
        matches!(
            self,
            Self::FlagNotFound(_) | Self::FlagLookupFailed { .. } | Self::InvalidNameInput(_)
        )
    }
}

/// Result type for population loading operations
pub type Result<T> = std::result::Result<T, PopulationError>;
