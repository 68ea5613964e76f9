//! A Rust library for loading country and city population data from public
//! REST providers, reconciling flags across inconsistent country names, and
//! shaping the result for list, chart and export views.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod session;
pub mod transport;
pub mod view;

// Re-export the most common types for easier use
// Core types
pub use config::{Endpoints, PopulationClientConfig};
pub use error::{PopulationError, Result};
pub use loader::{CityDataset, CountryDataset, PopulationLoader};
pub use session::ViewSession;

// Domain models
pub use models::{CountryAggregate, FlagEntry, FlagMap, PopulationCount, PopulationRecord};
pub use normalize::{COUNTRY_ALIASES, NameNormalizer};

// Fetching and reconciliation
pub use fetch::{FallbackFlagLookup, FallbackReport, FetchOutcome, PrimaryFetcher, SecondaryFetcher};
pub use reconcile::{FlagReconciler, Reconciliation};
pub use transport::{HttpTransport, JsonTransport, MemoryTransport, TransportError};

// Views and export
pub use export::{ExportDocument, ExportFormat, Selection, export_selection};
pub use view::{CountrySort, Page, paginate};
