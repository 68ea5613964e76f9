//! Domain models for population and flag data
//!
//! These are the entities produced by the fetchers and consumed by the
//! reconciler and view builders. None of them are mutated once a load has
//! finished.

pub mod country;
pub mod flag;
pub mod population;
pub mod types;

pub use country::CountryAggregate;
pub use flag::{FlagEntry, FlagMap};
pub use population::{PopulationCount, PopulationRecord};
pub use types::PopulationBand;
