//! # EsoxSolutions.SpawnPool
//!
//! Per-kind recycling pools for expensive, spawnable simulation resources.
//! Instead of destroying a resource when a caller is done with it, the
//! registry parks it in the pool for its kind and hands it out again on
//! the next request.
//!
//! ## Features
//!
//! - One LIFO pool per resource kind with minimum/maximum sizing
//! - Restock-on-acquire keeps the idle reserve at its minimum
//! - Force-creation when a pool is momentarily empty, so acquire never fails
//!   for a poolable kind
//! - Ordered enter/leave transitions around user hooks, with collision
//!   enabled only after every hook has run
//! - Per-kind leave settings (tick, replication, visibility, collision)
//! - TOML pool/settings tables
//! - Metrics with Prometheus export and health status per pool
//! - A lock-guarded shared registry with RAII return and async pool creation
//!
//! ## Quick Start
//!
//! The host implements [`ResourceFactory`] for its world; the registry
//! does the rest.
//!
//! ```rust,ignore
//! use esox_spawnpool::{PlacementData, PoolRegistry};
//!
//! let mut registry = PoolRegistry::new(world);
//! registry.create_pool(Kind::Projectile, 5, 20, 10)?;
//!
//! let projectile = registry.acquire(&Kind::Projectile, &PlacementData::at(muzzle))?;
//! // ...
//! registry.release(projectile)?;
//! ```

mod pool;
mod config;
mod metrics;
mod health;
mod errors;
mod host;
mod lifecycle;
mod placement;
mod registry;
mod settings;
mod shared;

#[cfg(test)]
mod testing;

pub use pool::Pool;
pub use config::{PoolRow, PoolTables, RegistryConfiguration, SettingsRow};
pub use metrics::{PoolMetrics, MetricsExporter};
pub use health::HealthStatus;
pub use errors::{PoolError, PoolResult};
pub use host::{PoolHooks, ResourceFactory, ResourceHost};
pub use placement::PlacementData;
pub use registry::PoolRegistry;
pub use settings::{PoolToggles, ResourceSettings};
pub use shared::{PooledResource, SharedPoolRegistry};
