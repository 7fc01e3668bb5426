//! Middleware options, loadable from YAML.
//!
//! ```
//! use std::time::Duration;
//! use assetbox::{AssetMiddlewareOptions, CacheKeyStrategy};
//!
//! let options = AssetMiddlewareOptions::from_yaml(r#"
//! enable_caching: false
//! cache_ttl: 10m
//! key_strategy: RouteAndQuery
//! "#).unwrap();
//!
//! assert!(!options.enable_caching);
//! assert!(options.enable_memory_cache);
//! assert_eq!(options.cache_ttl, Some(Duration::from_secs(600)));
//! assert_eq!(options.key_strategy, CacheKeyStrategy::RouteAndQuery);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::CacheKeyStrategy;

/// One year, the conventional lifetime for fingerprinted static assets.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(31_536_000);

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be parsed into options.
    #[error("invalid asset middleware configuration: {0}")]
    Parse(String),
}

/// Behavior switches for [`AssetMiddleware`](crate::AssetMiddleware).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssetMiddlewareOptions {
    /// Emit `ETag` and `Cache-Control` for assets that have a cache key.
    pub enable_caching: bool,
    /// Consult and populate the response cache.
    pub enable_memory_cache: bool,
    /// Lifetime of response cache entries (e.g. "30s", "10m"); unset keeps
    /// entries until the cache evicts them.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Option<Duration>,
    /// `max-age` advertised in `Cache-Control`.
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
    /// How response cache lookup keys are derived.
    pub key_strategy: CacheKeyStrategy,
    /// Gzip freshly produced bytes for clients that accept it.
    pub compress: bool,
}

impl Default for AssetMiddlewareOptions {
    fn default() -> Self {
        Self {
            enable_caching: true,
            enable_memory_cache: true,
            cache_ttl: None,
            max_age: DEFAULT_MAX_AGE,
            key_strategy: CacheKeyStrategy::default(),
            compress: true,
        }
    }
}

impl AssetMiddlewareOptions {
    /// Starts from the defaults.
    pub fn builder() -> AssetMiddlewareOptionsBuilder {
        AssetMiddlewareOptionsBuilder::default()
    }

    /// Parses options from YAML; missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|error| ConfigError::Parse(error.to_string()))
    }
}

/// Fluent builder for [`AssetMiddlewareOptions`].
#[derive(Debug, Clone, Default)]
pub struct AssetMiddlewareOptionsBuilder {
    options: AssetMiddlewareOptions,
}

impl AssetMiddlewareOptionsBuilder {
    /// Toggles `ETag` / `Cache-Control` emission.
    pub fn enable_caching(mut self, enabled: bool) -> Self {
        self.options.enable_caching = enabled;
        self
    }

    /// Toggles the response cache.
    pub fn enable_memory_cache(mut self, enabled: bool) -> Self {
        self.options.enable_memory_cache = enabled;
        self
    }

    /// Sets the response cache entry lifetime.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.options.cache_ttl = Some(ttl);
        self
    }

    /// Sets the advertised `max-age`.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.options.max_age = max_age;
        self
    }

    /// Sets the lookup key strategy.
    pub fn key_strategy(mut self, strategy: CacheKeyStrategy) -> Self {
        self.options.key_strategy = strategy;
        self
    }

    /// Toggles gzip negotiation.
    pub fn compress(mut self, enabled: bool) -> Self {
        self.options.compress = enabled;
        self
    }

    /// Finishes the options.
    pub fn build(self) -> AssetMiddlewareOptions {
        self.options
    }
}
