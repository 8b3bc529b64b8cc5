//! Per-kind settings applied when a resource leaves its pool

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Toggles a resource receives when it becomes active.
    ///
    /// In configuration files the toggles are written as bitflags text,
    /// e.g. `"TICK | COLLISION_ENABLED"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PoolToggles: u8 {
        const TICK = 1 << 0;
        const REPLICATES = 1 << 1;
        const HIDDEN_IN_GAME = 1 << 2;
        const COLLISION_ENABLED = 1 << 3;
    }
}

impl Default for PoolToggles {
    // Most pooled resources take part in interaction, everything else stays off
    fn default() -> Self {
        PoolToggles::COLLISION_ENABLED
    }
}

/// Settings registered for one resource kind
///
/// # Examples
///
/// ```
/// use esox_spawnpool::{PoolToggles, ResourceSettings};
///
/// let settings = ResourceSettings::new("projectile", PoolToggles::TICK | PoolToggles::COLLISION_ENABLED);
/// assert!(settings.should_tick());
/// assert!(settings.should_enable_collision());
/// assert!(!settings.should_replicate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSettings<K> {
    /// Kind these settings belong to
    pub kind: K,

    /// Toggles applied on leaving the pool
    pub toggles: PoolToggles,
}

impl<K> ResourceSettings<K> {
    /// Create settings for a kind
    pub fn new(kind: K, toggles: PoolToggles) -> Self {
        Self { kind, toggles }
    }

    /// Default settings for a kind with no registered entry
    pub fn with_defaults(kind: K) -> Self {
        Self::new(kind, PoolToggles::default())
    }

    pub fn should_tick(&self) -> bool {
        self.toggles.contains(PoolToggles::TICK)
    }

    pub fn should_replicate(&self) -> bool {
        self.toggles.contains(PoolToggles::REPLICATES)
    }

    pub fn should_hide_in_game(&self) -> bool {
        self.toggles.contains(PoolToggles::HIDDEN_IN_GAME)
    }

    pub fn should_enable_collision(&self) -> bool {
        self.toggles.contains(PoolToggles::COLLISION_ENABLED)
    }
}
