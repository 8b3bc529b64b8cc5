//! Registry configuration and the pool/settings tables read at setup

use crate::errors::{PoolError, PoolResult};
use crate::settings::PoolToggles;

use nalgebra::Point3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_POOL_SIZE: usize = 10;
const DEFAULT_MINIMUM: usize = 5;
const DEFAULT_MAXIMUM: usize = 20;

/// Registry-wide defaults
///
/// # Examples
///
/// ```
/// use esox_spawnpool::RegistryConfiguration;
/// use nalgebra::Point3;
///
/// let config = RegistryConfiguration::new()
///     .with_default_sizing(2, 8, 4)
///     .with_pooling_location(Point3::new(0.0, 0.0, -500.0));
///
/// assert_eq!(config.default_minimum, 2);
/// assert_eq!(config.default_maximum, 8);
/// assert_eq!(config.default_pool_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfiguration {
    /// Resources created when a pool is made on demand
    pub default_pool_size: usize,

    /// Minimum idle reserve for pools made on demand
    pub default_minimum: usize,

    /// Maximum idle reserve for pools made on demand
    pub default_maximum: usize,

    /// Where idle resources are parked
    pub pooling_location: Point3<f32>,
}

impl Default for RegistryConfiguration {
    fn default() -> Self {
        Self {
            default_pool_size: DEFAULT_POOL_SIZE,
            default_minimum: DEFAULT_MINIMUM,
            default_maximum: DEFAULT_MAXIMUM,
            pooling_location: Point3::new(0.0, 0.0, -10000.0),
        }
    }
}

impl RegistryConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sizing used for pools created on demand
    pub fn with_default_sizing(mut self, minimum: usize, maximum: usize, pool_size: usize) -> Self {
        self.default_minimum = minimum;
        self.default_maximum = maximum;
        self.default_pool_size = pool_size;
        self
    }

    /// Set the parking location for idle resources
    pub fn with_pooling_location(mut self, location: Point3<f32>) -> Self {
        self.pooling_location = location;
        self
    }
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_minimum() -> usize {
    DEFAULT_MINIMUM
}

fn default_maximum() -> usize {
    DEFAULT_MAXIMUM
}

/// One pool to create at setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRow<K> {
    pub kind: K,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    #[serde(default = "default_minimum")]
    pub minimum: usize,

    #[serde(default = "default_maximum")]
    pub maximum: usize,
}

/// Settings for one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow<K> {
    pub kind: K,

    #[serde(default)]
    pub toggles: PoolToggles,
}

/// Tables consumed by [`PoolRegistry::setup_defaults`](crate::PoolRegistry::setup_defaults).
///
/// Rows are applied in order. A later settings row for the same kind
/// replaces the earlier one.
///
/// # Examples
///
/// ```
/// use esox_spawnpool::{PoolTables, PoolToggles};
///
/// let tables: PoolTables<String> = PoolTables::from_toml_str(r#"
///     [[pools]]
///     kind = "projectile"
///     pool_size = 12
///     minimum = 4
///
///     [[settings]]
///     kind = "projectile"
///     toggles = "TICK | COLLISION_ENABLED"
/// "#).unwrap();
///
/// assert_eq!(tables.pools[0].pool_size, 12);
/// assert_eq!(tables.pools[0].maximum, 20);
/// assert_eq!(tables.settings[0].toggles, PoolToggles::TICK | PoolToggles::COLLISION_ENABLED);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct PoolTables<K> {
    #[serde(default)]
    pub registry: Option<RegistryConfiguration>,

    #[serde(default)]
    pub pools: Vec<PoolRow<K>>,

    #[serde(default)]
    pub settings: Vec<SettingsRow<K>>,
}

impl<K> Default for PoolTables<K> {
    fn default() -> Self {
        Self {
            registry: None,
            pools: Vec::new(),
            settings: Vec::new(),
        }
    }
}

impl<K> PoolTables<K> {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pool row
    pub fn with_pool(mut self, kind: K, minimum: usize, maximum: usize, pool_size: usize) -> Self {
        self.pools.push(PoolRow {
            kind,
            pool_size,
            minimum,
            maximum,
        });
        self
    }

    /// Append a settings row
    pub fn with_settings(mut self, kind: K, toggles: PoolToggles) -> Self {
        self.settings.push(SettingsRow { kind, toggles });
        self
    }
}

impl<K: DeserializeOwned> PoolTables<K> {
    /// Parse tables from TOML text
    pub fn from_toml_str(contents: &str) -> PoolResult<Self> {
        toml::from_str(contents).map_err(|e| PoolError::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> PoolResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
