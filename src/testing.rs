//! Recording host used by the unit tests

use crate::host::{PoolHooks, ResourceFactory, ResourceHost};
use crate::placement::PlacementData;

use nalgebra::{Point3, UnitQuaternion};
use std::collections::{HashMap, HashSet};

pub(crate) type Handle = u64;
pub(crate) type Kind = &'static str;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Created(Handle, Kind),
    Destroyed(Handle),
    Location(Handle, Point3<f32>),
    Rotation(Handle),
    Owner(Handle, Option<Handle>),
    Instigator(Handle, Option<Handle>),
    Tick(Handle, bool),
    Hidden(Handle, bool),
    Replicates(Handle, bool),
    Collision(Handle, bool),
    /// Hook on the resource (`None`) or one of its sub-components
    Entered(Handle, Option<usize>),
    Left(Handle, Option<usize>, Point3<f32>),
}

impl Event {
    fn handle(&self) -> Handle {
        match self {
            Event::Created(handle, _)
            | Event::Destroyed(handle)
            | Event::Location(handle, _)
            | Event::Rotation(handle)
            | Event::Owner(handle, _)
            | Event::Instigator(handle, _)
            | Event::Tick(handle, _)
            | Event::Hidden(handle, _)
            | Event::Replicates(handle, _)
            | Event::Collision(handle, _)
            | Event::Entered(handle, _)
            | Event::Left(handle, _, _) => *handle,
        }
    }
}

struct HookRecorder<'a> {
    events: &'a mut Vec<Event>,
    handle: Handle,
    component: Option<usize>,
}

impl PoolHooks<Handle> for HookRecorder<'_> {
    fn on_pool_entered(&mut self) {
        self.events.push(Event::Entered(self.handle, self.component));
    }

    fn on_pool_left(&mut self, data: &PlacementData<Handle>) {
        self.events.push(Event::Left(self.handle, self.component, data.location));
    }
}

/// Every side effect is appended to `events`.
#[derive(Debug, Default)]
pub(crate) struct MockWorld {
    next_handle: Handle,
    hooked_components: HashMap<Kind, usize>,
    kinds: HashMap<Handle, Kind>,
    dying: HashSet<Handle>,
    pub events: Vec<Event>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Self::default()
        }
    }

    /// Register a poolable kind whose resources carry `components` hooked sub-components
    pub fn with_poolable(mut self, kind: Kind, components: usize) -> Self {
        self.hooked_components.insert(kind, components);
        self
    }

    /// Create a resource outside any pool
    pub fn spawn_active(&mut self, kind: Kind) -> Handle {
        self.create(&kind, &Point3::origin())
    }

    pub fn mark_dying(&mut self, handle: Handle) {
        self.dying.insert(handle);
    }

    pub fn is_alive(&self, handle: Handle) -> bool {
        self.kinds.contains_key(&handle)
    }

    pub fn alive_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn created_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Created(..))).count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Destroyed(_))).count()
    }

    /// Side effects on one resource, creation excluded
    pub fn events_for(&self, handle: Handle) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.handle() == handle && !matches!(e, Event::Created(..)))
            .cloned()
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ResourceHost for MockWorld {
    type Handle = Handle;

    fn set_location(&mut self, handle: Handle, location: &Point3<f32>) {
        self.events.push(Event::Location(handle, *location));
    }

    fn set_rotation(&mut self, handle: Handle, _rotation: &UnitQuaternion<f32>) {
        self.events.push(Event::Rotation(handle));
    }

    fn set_owner(&mut self, handle: Handle, owner: Option<Handle>) {
        self.events.push(Event::Owner(handle, owner));
    }

    fn set_instigator(&mut self, handle: Handle, instigator: Option<Handle>) {
        self.events.push(Event::Instigator(handle, instigator));
    }

    fn set_tick_enabled(&mut self, handle: Handle, enabled: bool) {
        self.events.push(Event::Tick(handle, enabled));
    }

    fn set_hidden_in_game(&mut self, handle: Handle, hidden: bool) {
        self.events.push(Event::Hidden(handle, hidden));
    }

    fn set_replicates(&mut self, handle: Handle, replicates: bool) {
        self.events.push(Event::Replicates(handle, replicates));
    }

    fn set_collision_enabled(&mut self, handle: Handle, enabled: bool) {
        self.events.push(Event::Collision(handle, enabled));
    }
}

impl ResourceFactory for MockWorld {
    type Kind = Kind;

    fn is_poolable(&self, kind: &Kind) -> bool {
        self.hooked_components.contains_key(kind)
    }

    fn create(&mut self, kind: &Kind, _location: &Point3<f32>) -> Handle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.kinds.insert(handle, *kind);
        self.events.push(Event::Created(handle, *kind));
        handle
    }

    fn destroy(&mut self, handle: Handle) {
        self.kinds.remove(&handle);
        self.events.push(Event::Destroyed(handle));
    }

    fn is_being_destroyed(&self, handle: Handle) -> bool {
        self.dying.contains(&handle)
    }

    fn kind_of(&self, handle: Handle) -> Kind {
        self.kinds.get(&handle).copied().unwrap_or("unknown")
    }

    fn visit_pool_hooks(&mut self, handle: Handle, visitor: &mut dyn FnMut(&mut dyn PoolHooks<Handle>)) {
        let components = self
            .hooked_components
            .get(self.kinds.get(&handle).unwrap_or(&"unknown"))
            .copied()
            .unwrap_or(0);

        visitor(&mut HookRecorder {
            events: &mut self.events,
            handle,
            component: None,
        });
        for index in 0..components {
            visitor(&mut HookRecorder {
                events: &mut self.events,
                handle,
                component: Some(index),
            });
        }
    }
}
