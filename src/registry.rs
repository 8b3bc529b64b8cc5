//! Kind to pool mapping and the acquire/release orchestration

use crate::config::{PoolTables, RegistryConfiguration};
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::host::ResourceFactory;
use crate::lifecycle::Lifecycle;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};
use crate::placement::PlacementData;
use crate::pool::Pool;
use crate::settings::{PoolToggles, ResourceSettings};

use std::collections::HashMap;
use std::fmt::Debug;

fn describe<T: Debug>(value: &T) -> String {
    format!("{:?}", value)
}

// String-like kinds debug-print with quotes
fn label<T: Debug>(value: &T) -> String {
    describe(value).trim_matches('"').to_string()
}

struct PoolEntry<H> {
    pool: Pool<H>,
    metrics: MetricsTracker,
}

/// Owns one [`Pool`] per resource kind and the settings applied when
/// resources leave those pools.
///
/// The registry is single-threaded: every operation runs to completion
/// before returning. Wrap it in a
/// [`SharedPoolRegistry`](crate::SharedPoolRegistry) to drive it from
/// several threads.
///
/// Dropping the registry destroys every idle resource it still holds.
pub struct PoolRegistry<F: ResourceFactory> {
    factory: F,
    config: RegistryConfiguration,
    pools: HashMap<F::Kind, PoolEntry<F::Handle>>,
    settings: HashMap<F::Kind, ResourceSettings<F::Kind>>,
}

impl<F: ResourceFactory> PoolRegistry<F> {
    /// Create an empty registry with default configuration
    pub fn new(factory: F) -> Self {
        Self::with_configuration(factory, RegistryConfiguration::default())
    }

    pub fn with_configuration(factory: F, config: RegistryConfiguration) -> Self {
        Self {
            factory,
            config,
            pools: HashMap::new(),
            settings: HashMap::new(),
        }
    }

    pub fn configuration(&self) -> &RegistryConfiguration {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Create the pools and register the settings listed in `tables`.
    ///
    /// Calling this again re-applies every row: settings are overwritten,
    /// pools that already exist are skipped, nothing is cleared.
    pub fn setup_defaults(&mut self, tables: &PoolTables<F::Kind>) {
        if let Some(config) = &tables.registry {
            self.config = config.clone();
        }

        for row in &tables.pools {
            if let Err(e) = self.create_pool(row.kind.clone(), row.minimum, row.maximum, row.pool_size) {
                log::warn!("Skipping pool row for {:?}: {}", row.kind, e);
            }
        }

        for row in &tables.settings {
            self.register_settings(row.kind.clone(), row.toggles);
        }
    }

    /// Register the toggles for a kind, replacing any earlier entry
    pub fn register_settings(&mut self, kind: F::Kind, toggles: PoolToggles) {
        self.settings
            .insert(kind.clone(), ResourceSettings::new(kind, toggles));
    }

    /// Settings applied to `kind` on leaving its pool
    pub fn settings_for(&self, kind: &F::Kind) -> ResourceSettings<F::Kind> {
        self.settings
            .get(kind)
            .cloned()
            .unwrap_or_else(|| ResourceSettings::with_defaults(kind.clone()))
    }

    /// Create a pool and fill it with `amount` idle resources.
    ///
    /// Sizing is normalised to `1 <= minimum <= amount <= maximum`.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidType`] if the kind is not poolable,
    /// [`PoolError::AlreadyExists`] if a pool for it exists.
    pub fn create_pool(&mut self, kind: F::Kind, minimum: usize, maximum: usize, amount: usize) -> PoolResult<()> {
        if !self.factory.is_poolable(&kind) {
            log::warn!("Resource kind {:?} is not poolable, could not create pool", kind);
            return Err(PoolError::InvalidType(describe(&kind)));
        }

        if self.pools.contains_key(&kind) {
            log::warn!("Pool already exists for {:?}, could not create pool", kind);
            return Err(PoolError::AlreadyExists(describe(&kind)));
        }

        let minimum = minimum.max(1);
        let amount = amount.max(minimum);
        let maximum = maximum.max(amount);

        let mut pool = Pool::new(minimum, maximum);
        Lifecycle::new(&mut self.factory, &self.settings, &self.config.pooling_location)
            .fill(&kind, &mut pool, amount);

        log::info!(
            "Created pool for {:?} (minimum: {}, maximum: {}, filled: {})",
            kind,
            minimum,
            maximum,
            amount
        );

        self.pools.insert(
            kind,
            PoolEntry {
                pool,
                metrics: MetricsTracker::new(),
            },
        );
        Ok(())
    }

    /// Create a pool with the registry-wide default sizing
    pub fn create_default_pool(&mut self, kind: F::Kind) -> PoolResult<()> {
        let RegistryConfiguration {
            default_pool_size,
            default_minimum,
            default_maximum,
            ..
        } = self.config;
        self.create_pool(kind, default_minimum, default_maximum, default_pool_size)
    }

    /// Destroy every idle resource in the pool and forget the pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFound`] if no pool exists for `kind`.
    pub fn remove_pool(&mut self, kind: &F::Kind) -> PoolResult<()> {
        let Some(mut entry) = self.pools.remove(kind) else {
            log::warn!("No pool exists for {:?}, could not remove it", kind);
            return Err(PoolError::NotFound(describe(kind)));
        };

        let destroyed = Lifecycle::new(&mut self.factory, &self.settings, &self.config.pooling_location)
            .drain(&mut entry.pool);

        log::info!("Removed pool for {:?}, destroyed {} idle resources", kind, destroyed);
        Ok(())
    }

    /// Hand out an active resource of `kind` placed according to `data`.
    ///
    /// A pool with default sizing is created the first time a kind is
    /// requested. When an idle resource is taken and the pool drops below
    /// its minimum, it is restocked before returning. When the pool is
    /// empty a fresh resource is force-created and the pool is left as is.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidType`] if the kind has no pool and is not poolable.
    pub fn acquire(&mut self, kind: &F::Kind, data: &PlacementData<F::Handle>) -> PoolResult<F::Handle> {
        if !self.pools.contains_key(kind) {
            self.create_default_pool(kind.clone())?;
        }

        let Self {
            factory,
            config,
            pools,
            settings,
        } = self;
        let entry = pools
            .get_mut(kind)
            .ok_or_else(|| PoolError::NotFound(describe(kind)))?;
        let mut lifecycle = Lifecycle::new(factory, settings, &config.pooling_location);

        entry.metrics.total_acquired += 1;

        let Some(handle) = entry.pool.pop() else {
            let handle = lifecycle.spawn(kind);
            lifecycle.leave(handle, data);
            entry.metrics.force_created += 1;
            log::debug!("Pool for {:?} is empty, force-created {:?}", kind, handle);
            return Ok(handle);
        };

        lifecycle.leave(handle, data);

        if entry.pool.should_grow() {
            let shortfall = entry.pool.shortfall();
            lifecycle.fill(kind, &mut entry.pool, shortfall);
            entry.metrics.restocked += shortfall;
            log::debug!("Restocked pool for {:?} with {} resources", kind, shortfall);
        }

        Ok(handle)
    }

    /// Acquire `count` resources with the same placement.
    ///
    /// Each resource goes through [`acquire`](Self::acquire) in turn, so
    /// restocking and force-creation apply per resource. The kind is
    /// validated up front, even for a `count` of zero; after that no
    /// acquire can fail.
    pub fn acquire_many(
        &mut self,
        kind: &F::Kind,
        count: usize,
        data: &PlacementData<F::Handle>,
    ) -> PoolResult<Vec<F::Handle>> {
        if !self.has_pool(kind) {
            self.create_default_pool(kind.clone())?;
        }

        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            handles.push(self.acquire(kind, data)?);
        }
        Ok(handles)
    }

    /// Return an active resource to its pool.
    ///
    /// Also accepts resources that were never acquired through the
    /// registry; a pool with default sizing is created for unseen kinds.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidType`]: the kind is not poolable. The resource is untouched.
    /// - [`PoolError::DuplicateMembership`]: the resource is already idle in its pool.
    ///   It is taken out of the pool and destroyed.
    /// - [`PoolError::CapacityExceeded`]: the pool is full. The resource is destroyed.
    pub fn release(&mut self, handle: F::Handle) -> PoolResult<()> {
        let kind = self.factory.kind_of(handle);
        if !self.pools.contains_key(&kind) {
            self.create_default_pool(kind.clone())?;
        }

        let Self {
            factory,
            config,
            pools,
            settings,
        } = self;
        let entry = pools
            .get_mut(&kind)
            .ok_or_else(|| PoolError::NotFound(describe(&kind)))?;
        let mut lifecycle = Lifecycle::new(factory, settings, &config.pooling_location);

        if entry.pool.contains_resource(handle) {
            log::warn!("Resource {:?} is already inside the pool for {:?}, destroying it", handle, kind);
            entry.pool.remove_resource(handle);
            lifecycle.destroy(handle);
            entry.metrics.destroyed_on_release += 1;

            if entry.pool.should_grow() {
                let shortfall = entry.pool.shortfall();
                lifecycle.fill(&kind, &mut entry.pool, shortfall);
                entry.metrics.restocked += shortfall;
            }
            return Err(PoolError::DuplicateMembership(describe(&handle)));
        }

        if !entry.pool.can_grow() {
            log::debug!("Pool for {:?} is full, destroying {:?}", kind, handle);
            lifecycle.destroy(handle);
            entry.metrics.destroyed_on_release += 1;
            return Err(PoolError::CapacityExceeded(describe(&kind)));
        }

        lifecycle.enter(handle);
        entry.pool.push(handle);
        entry.metrics.total_released += 1;
        Ok(())
    }

    /// Change a pool's minimum idle reserve.
    ///
    /// The maximum is raised to the new minimum when needed and the pool is
    /// topped up immediately. Surplus idle resources are never destroyed
    /// here; they drain through later acquires.
    pub fn set_pool_minimum(&mut self, kind: &F::Kind, minimum: usize) -> PoolResult<()> {
        let Self {
            factory,
            config,
            pools,
            settings,
        } = self;
        let Some(entry) = pools.get_mut(kind) else {
            log::warn!("No pool exists for {:?}, could not change its minimum", kind);
            return Err(PoolError::NotFound(describe(kind)));
        };

        entry.pool.set_minimum(minimum);

        let shortfall = entry.pool.shortfall();
        if shortfall > 0 {
            Lifecycle::new(factory, settings, &config.pooling_location).fill(kind, &mut entry.pool, shortfall);
            entry.metrics.restocked += shortfall;
        }

        log::info!(
            "Pool for {:?} now has minimum {} and maximum {}",
            kind,
            entry.pool.minimum(),
            entry.pool.maximum()
        );
        Ok(())
    }

    pub fn has_pool(&self, kind: &F::Kind) -> bool {
        self.pools.contains_key(kind)
    }

    pub fn pool(&self, kind: &F::Kind) -> Option<&Pool<F::Handle>> {
        self.pools.get(kind).map(|entry| &entry.pool)
    }

    /// Kinds that currently have a pool
    pub fn kinds(&self) -> impl Iterator<Item = &F::Kind> {
        self.pools.keys()
    }

    pub fn metrics(&self, kind: &F::Kind) -> Option<PoolMetrics> {
        self.pools.get(kind).map(|entry| {
            entry
                .metrics
                .get_metrics(entry.pool.len(), entry.pool.minimum(), entry.pool.maximum())
        })
    }

    pub fn health(&self, kind: &F::Kind) -> Option<HealthStatus> {
        self.pools
            .get(kind)
            .map(|entry| HealthStatus::new(entry.pool.len(), entry.pool.minimum(), entry.pool.maximum()))
    }

    /// Export one pool's metrics as a HashMap
    pub fn export_metrics(&self, kind: &F::Kind) -> Option<HashMap<String, String>> {
        self.metrics(kind).map(|metrics| metrics.export())
    }

    /// Export every pool's metrics in Prometheus format
    pub fn export_metrics_prometheus(&self, tags: Option<&HashMap<String, String>>) -> String {
        let mut pools: Vec<(String, PoolMetrics)> = self
            .pools
            .iter()
            .map(|(kind, entry)| {
                let metrics = entry
                    .metrics
                    .get_metrics(entry.pool.len(), entry.pool.minimum(), entry.pool.maximum());
                (label(kind), metrics)
            })
            .collect();
        pools.sort_by(|a, b| a.0.cmp(&b.0));

        MetricsExporter::export_prometheus(&pools, tags)
    }

    /// Destroy every idle resource and forget all pools and settings.
    /// Returns the number of resources destroyed.
    pub fn shutdown(&mut self) -> usize {
        let mut destroyed = 0;
        let mut lifecycle = Lifecycle::new(&mut self.factory, &self.settings, &self.config.pooling_location);
        for (_, mut entry) in self.pools.drain() {
            destroyed += lifecycle.drain(&mut entry.pool);
        }
        self.settings.clear();

        if destroyed > 0 {
            log::info!("Pool registry shut down, destroyed {} idle resources", destroyed);
        }
        destroyed
    }
}

impl<F: ResourceFactory> Drop for PoolRegistry<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
