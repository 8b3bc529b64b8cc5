//! Placement data handed to a resource as it leaves its pool

use nalgebra::{Point3, UnitQuaternion, Vector3};
use std::collections::BTreeSet;

/// Where and for whom an acquired resource is being placed.
///
/// The registry applies owner, instigator, location and rotation itself.
/// Everything else is forwarded untouched to the resource's
/// [`PoolHooks::on_pool_left`](crate::PoolHooks::on_pool_left).
///
/// # Examples
///
/// ```
/// use esox_spawnpool::PlacementData;
/// use nalgebra::{Point3, Vector3};
///
/// let data = PlacementData::<u64>::at(Point3::new(1.0, 2.0, 3.0))
///     .with_velocity(Vector3::new(0.0, 0.0, 900.0))
///     .with_owner(42)
///     .with_tag("weapon.rifle")
///     .with_magnitude(25.0);
///
/// assert_eq!(data.owner, Some(42));
/// assert!(data.tags.contains("weapon.rifle"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementData<H> {
    pub owner: Option<H>,
    pub instigator: Option<H>,
    pub location: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub velocity: Vector3<f32>,
    pub optional_object: Option<H>,
    pub optional_object2: Option<H>,
    pub tags: BTreeSet<String>,
    pub magnitude: Option<f32>,
    pub optional_magnitude: Option<f32>,
}

impl<H> Default for PlacementData<H> {
    fn default() -> Self {
        Self {
            owner: None,
            instigator: None,
            location: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
            optional_object: None,
            optional_object2: None,
            tags: BTreeSet::new(),
            magnitude: None,
            optional_magnitude: None,
        }
    }
}

impl<H> PlacementData<H> {
    /// Placement at a location with everything else defaulted
    pub fn at(location: Point3<f32>) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn with_owner(mut self, owner: H) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_instigator(mut self, instigator: H) -> Self {
        self.instigator = Some(instigator);
        self
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_optional_objects(mut self, first: Option<H>, second: Option<H>) -> Self {
        self.optional_object = first;
        self.optional_object2 = second;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_optional_magnitude(mut self, magnitude: f32) -> Self {
        self.optional_magnitude = Some(magnitude);
        self
    }
}
