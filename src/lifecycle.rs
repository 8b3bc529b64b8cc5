//! Enter and leave transitions applied as a resource crosses the pool boundary

use crate::host::{PoolHooks, ResourceFactory};
use crate::placement::PlacementData;
use crate::pool::Pool;
use crate::settings::ResourceSettings;

use nalgebra::Point3;
use std::collections::HashMap;

/// Borrowed view over the parts of the registry a transition touches.
pub(crate) struct Lifecycle<'a, F: ResourceFactory> {
    factory: &'a mut F,
    settings: &'a HashMap<F::Kind, ResourceSettings<F::Kind>>,
    pooling_location: &'a Point3<f32>,
}

impl<'a, F: ResourceFactory> Lifecycle<'a, F> {
    pub fn new(
        factory: &'a mut F,
        settings: &'a HashMap<F::Kind, ResourceSettings<F::Kind>>,
        pooling_location: &'a Point3<f32>,
    ) -> Self {
        Self {
            factory,
            settings,
            pooling_location,
        }
    }

    /// Spawn a fresh instance at the pooling location. No transition is applied.
    pub fn spawn(&mut self, kind: &F::Kind) -> F::Handle {
        self.factory.create(kind, self.pooling_location)
    }

    /// Spawn `count` instances, send each through [`enter`](Self::enter) and push it.
    pub fn fill(&mut self, kind: &F::Kind, pool: &mut Pool<F::Handle>, count: usize) {
        for _ in 0..count {
            let handle = self.spawn(kind);
            self.enter(handle);
            pool.push(handle);
        }
    }

    /// Destroy every idle resource. Returns how many were destroyed.
    pub fn drain(&mut self, pool: &mut Pool<F::Handle>) -> usize {
        let mut destroyed = 0;
        while let Some(handle) = pool.pop() {
            if self.destroy(handle) {
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Destroy unless the host is already tearing the instance down
    pub fn destroy(&mut self, handle: F::Handle) -> bool {
        if self.factory.is_being_destroyed(handle) {
            return false;
        }
        self.factory.destroy(handle);
        true
    }

    /// The resource goes idle.
    ///
    /// Hooks run first so they still observe the last active state
    /// (location, owner). Deactivation follows.
    pub fn enter(&mut self, handle: F::Handle) {
        self.factory
            .visit_pool_hooks(handle, &mut |hooks: &mut dyn PoolHooks<F::Handle>| hooks.on_pool_entered());

        self.factory.set_collision_enabled(handle, false);

        self.factory.set_location(handle, self.pooling_location);
        self.factory.set_owner(handle, None);
        self.factory.set_instigator(handle, None);

        self.factory.set_tick_enabled(handle, false);
        self.factory.set_hidden_in_game(handle, true);
        self.factory.set_replicates(handle, false);
    }

    /// The resource becomes active.
    ///
    /// Collision is switched on last, after every hook has run, so no
    /// interaction fires against a half-configured resource.
    pub fn leave(&mut self, handle: F::Handle, data: &PlacementData<F::Handle>) {
        let kind = self.factory.kind_of(handle);
        let settings = self
            .settings
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ResourceSettings::with_defaults(kind.clone()));

        self.factory.set_replicates(handle, settings.should_replicate());

        self.factory.set_location(handle, &data.location);
        self.factory.set_owner(handle, data.owner);
        self.factory.set_instigator(handle, data.instigator);
        self.factory.set_rotation(handle, &data.rotation);

        self.factory.set_tick_enabled(handle, settings.should_tick());
        self.factory.set_hidden_in_game(handle, settings.should_hide_in_game());

        self.factory
            .visit_pool_hooks(handle, &mut |hooks: &mut dyn PoolHooks<F::Handle>| hooks.on_pool_left(data));

        self.factory.set_collision_enabled(handle, settings.should_enable_collision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PoolToggles;
    use crate::testing::{Event, MockWorld};

    #[test]
    fn test_enter_runs_hooks_before_deactivation() {
        let mut world = MockWorld::new().with_poolable("projectile", 2);
        let settings = HashMap::new();
        let parking = Point3::new(0.0, 0.0, -10000.0);
        let handle = world.spawn_active("projectile");

        Lifecycle::new(&mut world, &settings, &parking).enter(handle);

        let events = world.events_for(handle);
        assert_eq!(
            events,
            vec![
                Event::Entered(handle, None),
                Event::Entered(handle, Some(0)),
                Event::Entered(handle, Some(1)),
                Event::Collision(handle, false),
                Event::Location(handle, parking),
                Event::Owner(handle, None),
                Event::Instigator(handle, None),
                Event::Tick(handle, false),
                Event::Hidden(handle, true),
                Event::Replicates(handle, false),
            ]
        );
    }

    #[test]
    fn test_leave_applies_settings_and_enables_collision_last() {
        let mut world = MockWorld::new().with_poolable("projectile", 1);
        let mut settings = HashMap::new();
        settings.insert(
            "projectile",
            ResourceSettings::new("projectile", PoolToggles::TICK | PoolToggles::REPLICATES | PoolToggles::COLLISION_ENABLED),
        );
        let parking = Point3::origin();
        let handle = world.spawn_active("projectile");
        let data = PlacementData::at(Point3::new(4.0, 5.0, 6.0)).with_owner(99).with_instigator(98);

        Lifecycle::new(&mut world, &settings, &parking).leave(handle, &data);

        let events = world.events_for(handle);
        assert_eq!(
            events,
            vec![
                Event::Replicates(handle, true),
                Event::Location(handle, Point3::new(4.0, 5.0, 6.0)),
                Event::Owner(handle, Some(99)),
                Event::Instigator(handle, Some(98)),
                Event::Rotation(handle),
                Event::Tick(handle, true),
                Event::Hidden(handle, false),
                Event::Left(handle, None, data.location),
                Event::Left(handle, Some(0), data.location),
                Event::Collision(handle, true),
            ]
        );
    }

    #[test]
    fn test_leave_uses_default_settings() {
        let mut world = MockWorld::new().with_poolable("crate", 0);
        let settings = HashMap::new();
        let parking = Point3::origin();
        let handle = world.spawn_active("crate");

        Lifecycle::new(&mut world, &settings, &parking).leave(handle, &PlacementData::default());

        let events = world.events_for(handle);
        assert!(events.contains(&Event::Tick(handle, false)));
        assert!(events.contains(&Event::Replicates(handle, false)));
        assert_eq!(events.last(), Some(&Event::Collision(handle, true)));
    }

    #[test]
    fn test_drain_skips_resources_being_destroyed() {
        let mut world = MockWorld::new().with_poolable("crate", 0);
        let settings = HashMap::new();
        let parking = Point3::origin();
        let mut pool = Pool::new(1, 4);
        let first = world.spawn_active("crate");
        let second = world.spawn_active("crate");
        pool.push(first);
        pool.push(second);
        world.mark_dying(first);

        let destroyed = Lifecycle::new(&mut world, &settings, &parking).drain(&mut pool);

        assert_eq!(destroyed, 1);
        assert!(pool.is_empty());
        assert!(world.is_alive(first));
        assert!(!world.is_alive(second));
    }
}
