//! Configuration for the population loader.

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::{PopulationError, Result};

/// Default base URL of the city population and flag provider
pub const DEFAULT_PRIMARY_BASE: &str = "https://countriesnow.space/api/v0.1";
/// Default base URL of the country listing provider
pub const DEFAULT_SECONDARY_BASE: &str = "https://restcountries.com/v3.1";
/// Default base URL of the per-country flag lookup provider
pub const DEFAULT_FALLBACK_BASE: &str = "https://restcountries.com/v3.1/name";

/// Default number of rows shown per page
pub const DEFAULT_PAGE_SIZE: usize = 5;
/// Default bound on a single HTTP request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Base URLs of the external providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Provider of city population series and the flag image list
    pub primary_base: String,
    /// Provider of whole-country aggregates
    pub secondary_base: String,
    /// Provider queried by country name for missing flags
    pub fallback_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            primary_base: DEFAULT_PRIMARY_BASE.to_string(),
            secondary_base: DEFAULT_SECONDARY_BASE.to_string(),
            fallback_base: DEFAULT_FALLBACK_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Use one base URL for every provider (handy for local fixtures)
    #[must_use]
    pub fn uniform(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            primary_base: base.to_string(),
            secondary_base: base.to_string(),
            fallback_base: format!("{base}/name"),
        }
    }

    /// City population list endpoint
    pub fn city_population_url(&self) -> Result<Url> {
        join(&self.primary_base, "countries/population/cities")
    }

    /// Country flag image list endpoint
    pub fn flag_images_url(&self) -> Result<Url> {
        join(&self.primary_base, "countries/flag/images")
    }

    /// "All countries" endpoint of the secondary provider
    pub fn all_countries_url(&self) -> Result<Url> {
        join(&self.secondary_base, "all")
    }

    /// Fallback lookup URL with `name` as a single percent-encoded path segment
    pub fn country_by_name_url(&self, name: &str) -> Result<Url> {
        let mut url = parse(&self.fallback_base)?;
        url.path_segments_mut()
            .map_err(|()| {
                PopulationError::Config(format!(
                    "fallback base cannot carry a path: {}",
                    self.fallback_base
                ))
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| PopulationError::Config(format!("invalid URL {url}: {e}")))
}

fn join(base: &str, path: &str) -> Result<Url> {
    parse(&format!("{}/{path}", base.trim_end_matches('/')))
}

/// Configuration for the population loader
#[derive(Debug, Clone)]
pub struct PopulationClientConfig {
    /// Provider base URLs
    pub endpoints: Endpoints,
    /// Upper bound on each HTTP request
    pub request_timeout: Duration,
    /// Rows per page in list views
    pub page_size: usize,
    /// Query the fallback provider for countries without a flag
    pub fallback_enabled: bool,
}

impl Default for PopulationClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            fallback_enabled: true,
        }
    }
}

impl PopulationClientConfig {
    /// Build a configuration from `POPDASH_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("POPDASH_PRIMARY_URL") {
            parse(&url)?;
            config.endpoints.primary_base = url;
        }
        if let Some(url) = lookup("POPDASH_SECONDARY_URL") {
            parse(&url)?;
            config.endpoints.secondary_base = url;
        }
        if let Some(url) = lookup("POPDASH_FALLBACK_URL") {
            parse(&url)?;
            config.endpoints.fallback_base = url;
        }
        if let Some(secs) = lookup("POPDASH_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                PopulationError::Config(format!("POPDASH_TIMEOUT_SECS={secs:?}: {e}"))
            })?;
            if secs == 0 {
                return Err(PopulationError::Config(
                    "POPDASH_TIMEOUT_SECS must be positive".to_string(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(size) = lookup("POPDASH_PAGE_SIZE") {
            let size: usize = size.trim().parse().map_err(|e| {
                PopulationError::Config(format!("POPDASH_PAGE_SIZE={size:?}: {e}"))
            })?;
            config = config.with_page_size(size);
        }
        if let Some(flag) = lookup("POPDASH_FALLBACK") {
            config.fallback_enabled = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(PopulationError::Config(format!(
                        "POPDASH_FALLBACK={other:?} is not a boolean"
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Set the page size; zero is treated as one
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Disable fallback flag lookups
    #[must_use]
    pub const fn without_fallback(mut self) -> Self {
        self.fallback_enabled = false;
        self
    }
}
