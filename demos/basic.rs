//! Basic usage of the spawn pool registry with a tiny arena world

use esox_spawnpool::{
    PlacementData, PoolHooks, PoolRegistry, PoolTables, ResourceFactory, ResourceHost, SharedPoolRegistry,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
enum Kind {
    Projectile,
    Explosion,
    Wall,
}

#[derive(Debug, Default)]
struct Projectile {
    velocity: Vector3<f32>,
    damage: f32,
}

impl PoolHooks<u32> for Projectile {
    fn on_pool_entered(&mut self) {
        self.velocity = Vector3::zeros();
        self.damage = 0.0;
    }

    fn on_pool_left(&mut self, data: &PlacementData<u32>) {
        self.velocity = data.velocity;
        self.damage = data.magnitude.unwrap_or(10.0);
    }
}

/// Sub-component that records where its body has been
#[derive(Debug, Default)]
struct Trail {
    points: Vec<Point3<f32>>,
}

impl PoolHooks<u32> for Trail {
    fn on_pool_entered(&mut self) {
        self.points.clear();
    }

    fn on_pool_left(&mut self, data: &PlacementData<u32>) {
        self.points.push(data.location);
    }
}

#[derive(Debug)]
struct Body {
    kind: Kind,
    location: Point3<f32>,
    owner: Option<u32>,
    ticking: bool,
    hidden: bool,
    collision: bool,
    projectile: Projectile,
    trail: Trail,
}

#[derive(Debug, Default)]
struct Arena {
    bodies: HashMap<u32, Body>,
    next_id: u32,
    spawned: usize,
}

impl Arena {
    fn body(&mut self, handle: u32) -> Option<&mut Body> {
        self.bodies.get_mut(&handle)
    }
}

impl ResourceHost for Arena {
    type Handle = u32;

    fn set_location(&mut self, handle: u32, location: &Point3<f32>) {
        if let Some(body) = self.body(handle) {
            body.location = *location;
        }
    }

    fn set_rotation(&mut self, _handle: u32, _rotation: &UnitQuaternion<f32>) {}

    fn set_owner(&mut self, handle: u32, owner: Option<u32>) {
        if let Some(body) = self.body(handle) {
            body.owner = owner;
        }
    }

    fn set_instigator(&mut self, _handle: u32, _instigator: Option<u32>) {}

    fn set_tick_enabled(&mut self, handle: u32, enabled: bool) {
        if let Some(body) = self.body(handle) {
            body.ticking = enabled;
        }
    }

    fn set_hidden_in_game(&mut self, handle: u32, hidden: bool) {
        if let Some(body) = self.body(handle) {
            body.hidden = hidden;
        }
    }

    fn set_replicates(&mut self, _handle: u32, _replicates: bool) {}

    fn set_collision_enabled(&mut self, handle: u32, enabled: bool) {
        if let Some(body) = self.body(handle) {
            body.collision = enabled;
        }
    }
}

impl ResourceFactory for Arena {
    type Kind = Kind;

    fn is_poolable(&self, kind: &Kind) -> bool {
        // Walls are static level geometry
        !matches!(kind, Kind::Wall)
    }

    fn create(&mut self, kind: &Kind, location: &Point3<f32>) -> u32 {
        self.next_id += 1;
        self.spawned += 1;
        self.bodies.insert(
            self.next_id,
            Body {
                kind: *kind,
                location: *location,
                owner: None,
                ticking: true,
                hidden: false,
                collision: true,
                projectile: Projectile::default(),
                trail: Trail::default(),
            },
        );
        self.next_id
    }

    fn destroy(&mut self, handle: u32) {
        self.bodies.remove(&handle);
    }

    fn kind_of(&self, handle: u32) -> Kind {
        self.bodies.get(&handle).map(|body| body.kind).unwrap_or(Kind::Wall)
    }

    fn visit_pool_hooks(&mut self, handle: u32, visitor: &mut dyn FnMut(&mut dyn PoolHooks<u32>)) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            if body.kind == Kind::Projectile {
                visitor(&mut body.projectile);
            }
            visitor(&mut body.trail);
        }
    }
}

const TABLES: &str = r#"
[registry]
default_minimum = 2
default_maximum = 8
default_pool_size = 4
pooling_location = [0.0, 0.0, -10000.0]

[[pools]]
kind = "Projectile"
pool_size = 6
minimum = 3
maximum = 12

[[settings]]
kind = "Projectile"
toggles = "TICK | COLLISION_ENABLED"

[[settings]]
kind = "Explosion"
toggles = "TICK"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== EsoxSolutions.SpawnPool - Basic Example ===\n");

    let tables: PoolTables<Kind> = PoolTables::from_toml_str(TABLES)?;
    let mut registry = PoolRegistry::new(Arena::default());
    registry.setup_defaults(&tables);

    // 1. Acquire and release
    println!("1. Acquire and release:");
    let placement = PlacementData::at(Point3::new(10.0, 0.0, 2.0))
        .with_owner(1)
        .with_velocity(Vector3::new(0.0, 900.0, 0.0))
        .with_magnitude(35.0);

    let shot = registry.acquire(&Kind::Projectile, &placement)?;
    if let Some(body) = registry.factory_mut().body(shot) {
        println!(
            "   Projectile {} at {:?}, damage {}, collision {}",
            shot, body.location, body.projectile.damage, body.collision
        );
    }
    registry.release(shot)?;
    println!("   Idle after release: {}\n", registry.pool(&Kind::Projectile).map(|p| p.len()).unwrap_or(0));

    // 2. Burst: restocking and force-creation
    println!("2. Burst of 10 shots:");
    let burst = registry.acquire_many(&Kind::Projectile, 10, &placement)?;
    println!("   Handed out {}, total spawned so far {}", burst.len(), registry.factory().spawned);
    for handle in burst {
        if let Err(e) = registry.release(handle) {
            println!("   {}", e);
        }
    }
    if let Some(metrics) = registry.metrics(&Kind::Projectile) {
        println!("   Metrics: {:?}\n", metrics.export());
    }

    // 3. Unknown kinds get a default pool, invalid kinds are rejected
    println!("3. Default and invalid kinds:");
    let boom = registry.acquire(&Kind::Explosion, &PlacementData::default())?;
    println!("   Explosion {} acquired, pool created: {}", boom, registry.has_pool(&Kind::Explosion));
    match registry.acquire(&Kind::Wall, &PlacementData::default()) {
        Ok(_) => println!("   Unexpected wall"),
        Err(e) => println!("   {}", e),
    }
    println!();

    // 4. Shared registry with scoped resources
    println!("4. Shared registry:");
    let shared = SharedPoolRegistry::new(registry);
    {
        let scoped = shared.acquire_scoped(&Kind::Projectile, &placement)?;
        println!("   Scoped projectile {}", *scoped);
    }
    println!("   Idle after scope: {}", shared.idle_count(&Kind::Projectile));
    println!("{}", shared.lock().export_metrics_prometheus(None));

    Ok(())
}
