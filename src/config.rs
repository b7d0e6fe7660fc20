//! Configuration for the interning caches
//!
//! Capacities can be set in code with the builder methods or loaded from a
//! TOML document:
//!
//! ```toml
//! [cache]
//! key_capacity = 64
//! value_capacity = 32
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default number of entries kept by each interning cache
pub const DEFAULT_CAPACITY: usize = 20;

pub(crate) const DEFAULT_NONZERO_CAPACITY: NonZeroUsize =
    match NonZeroUsize::new(DEFAULT_CAPACITY) {
        Some(n) => n,
        None => panic!("DEFAULT_CAPACITY must be non-zero"),
    };

/// Errors that can occur when loading cache configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cache capacity for {cache} must be greater than zero")]
    ZeroCapacity { cache: &'static str },
}

/// Capacities of the key and value interning caches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of interned keys
    pub key_capacity: usize,

    /// Maximum number of interned raw values
    pub value_capacity: usize,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
struct TomlConfig {
    cache: Option<TomlCache>,
}

#[derive(Deserialize)]
struct TomlCache {
    key_capacity: Option<usize>,
    value_capacity: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_capacity: DEFAULT_CAPACITY,
            value_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key cache capacity
    pub fn with_key_capacity(mut self, capacity: usize) -> Self {
        self.key_capacity = capacity;
        self
    }

    /// Set the value cache capacity
    pub fn with_value_capacity(mut self, capacity: usize) -> Self {
        self.value_capacity = capacity;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    ///
    /// Missing fields keep their defaults.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(cache) = parsed.cache {
            if let Some(n) = cache.key_capacity {
                config.key_capacity = n;
            }
            if let Some(n) = cache.value_capacity {
                config.value_capacity = n;
            }
        }
        config.key_capacity()?;
        config.value_capacity()?;
        Ok(config)
    }

    pub(crate) fn key_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.key_capacity)
            .ok_or(ConfigError::ZeroCapacity { cache: "keys" })
    }

    pub(crate) fn value_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.value_capacity)
            .ok_or(ConfigError::ZeroCapacity { cache: "values" })
    }
}
