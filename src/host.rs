//! Contracts between the registry and the simulation that owns the resources

use crate::placement::PlacementData;
use nalgebra::{Point3, UnitQuaternion};
use std::fmt::Debug;
use std::hash::Hash;

/// Callbacks a poolable resource (or one of its sub-components) receives
/// when it crosses the pool boundary. Both are no-ops by default.
pub trait PoolHooks<H> {
    /// Called before the registry deactivates the resource
    fn on_pool_entered(&mut self) {}

    /// Called after placement is applied and before interaction is enabled
    fn on_pool_left(&mut self, _data: &PlacementData<H>) {}
}

/// Side effects the registry applies to a live resource.
pub trait ResourceHost {
    /// Identity of a resource inside the host
    type Handle: Copy + Eq + Debug;

    fn set_location(&mut self, handle: Self::Handle, location: &Point3<f32>);

    fn set_rotation(&mut self, handle: Self::Handle, rotation: &UnitQuaternion<f32>);

    fn set_owner(&mut self, handle: Self::Handle, owner: Option<Self::Handle>);

    fn set_instigator(&mut self, handle: Self::Handle, instigator: Option<Self::Handle>);

    fn set_tick_enabled(&mut self, handle: Self::Handle, enabled: bool);

    fn set_hidden_in_game(&mut self, handle: Self::Handle, hidden: bool);

    fn set_replicates(&mut self, handle: Self::Handle, replicates: bool);

    /// Interaction and collision share a single switch
    fn set_collision_enabled(&mut self, handle: Self::Handle, enabled: bool);
}

/// Constructs and destroys resources for the registry.
///
/// A kind is poolable when its resource type implements [`PoolHooks`];
/// the factory reports that through [`is_poolable`](Self::is_poolable),
/// which the registry consults only when a pool is created.
pub trait ResourceFactory: ResourceHost {
    /// Resource type key. One pool exists per kind.
    type Kind: Clone + Eq + Hash + Debug;

    fn is_poolable(&self, kind: &Self::Kind) -> bool;

    /// Spawn a fresh instance of `kind` at `location`
    fn create(&mut self, kind: &Self::Kind, location: &Point3<f32>) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);

    /// Whether the instance is already on its way out
    fn is_being_destroyed(&self, _handle: Self::Handle) -> bool {
        false
    }

    fn kind_of(&self, handle: Self::Handle) -> Self::Kind;

    /// Visit the resource's own hooks, then every sub-component that
    /// implements [`PoolHooks`], in that order.
    fn visit_pool_hooks(
        &mut self,
        handle: Self::Handle,
        visitor: &mut dyn FnMut(&mut dyn PoolHooks<Self::Handle>),
    );
}
