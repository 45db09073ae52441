//! Spawner: creates matched mesh + body pairs
//!
//! A spawn either completes fully (body in the world, subscribed to
//! collisions, mesh in the scene, entry in the registry) or leaves nothing
//! behind.

use rand::Rng;
use thiserror::Error;

use super::registry::{ManagedObject, ObjectRegistry, ShapeKind};
use crate::core::config::{PhysicsConfig, SpawnConfig};
use crate::foundation::collections::MaterialId;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BodyDesc, ColliderShape, CollisionEvents, ContactMaterial, PhysicsError, PhysicsWorld};
use crate::scene::{Geometry, MeshNode, RenderScene, StandardMaterial};

/// Spawn errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    /// Radius or edge length is not a positive finite number
    #[error("Invalid object size {0}: must be positive and finite")]
    InvalidSize(f32),

    /// The physics world rejected the body or its launch force
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// Everything needed to spawn one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Primitive and its size
    pub shape: ShapeKind,
    /// Initial position
    pub position: Vec3,
    /// Force applied in the body's local frame during the first step
    pub force: Option<Vec3>,
    /// Local point the force acts at
    pub force_point: Vec3,
}

impl SpawnRequest {
    /// Sphere at `position`, no launch force
    pub fn sphere(radius: f32, position: Vec3) -> Self {
        Self {
            shape: ShapeKind::Sphere { radius },
            position,
            force: None,
            force_point: Vec3::zeros(),
        }
    }

    /// Box at `position`, no launch force
    pub fn cube(size: f32, position: Vec3) -> Self {
        Self {
            shape: ShapeKind::Box { size },
            position,
            force: None,
            force_point: Vec3::zeros(),
        }
    }

    /// Launch with `force` applied at the body origin
    pub fn with_force(mut self, force: Vec3) -> Self {
        self.force = Some(force);
        self
    }
}

/// Random launch force of the basic playground
///
/// Spheres fly towards -X/-Z, boxes towards +X/+Z; both get the same upward push.
pub fn random_launch_force<R: Rng + ?Sized>(rng: &mut R, shape: ShapeKind, config: &SpawnConfig) -> Vec3 {
    let horizontal = config.launch_force_horizontal;
    let sign = match shape {
        ShapeKind::Sphere { .. } => -1.0,
        ShapeKind::Box { .. } => 1.0,
    };
    let x = sign * rng.gen::<f32>() * horizontal;
    let z = sign * rng.gen::<f32>() * horizontal;
    Vec3::new(x, config.launch_force_vertical, z)
}

fn random_panel_position<R: Rng + ?Sized>(rng: &mut R, config: &SpawnConfig) -> Vec3 {
    let spread = config.spawn_spread;
    let x = (rng.gen::<f32>() - 0.5) * spread;
    let z = (rng.gen::<f32>() - 0.5) * spread;
    Vec3::new(x, config.spawn_height, z)
}

/// "Generate Sphere": radius in `[0.25, 1.25)` somewhere above the pool centre
pub fn random_sphere_request<R: Rng + ?Sized>(rng: &mut R, config: &SpawnConfig) -> SpawnRequest {
    let radius = rng.gen::<f32>() + 0.25;
    let position = random_panel_position(rng, config);
    SpawnRequest::sphere(radius, position)
}

/// "Generate Box": edge in `[0.5, 1.5)` somewhere above the pool centre
pub fn random_box_request<R: Rng + ?Sized>(rng: &mut R, config: &SpawnConfig) -> SpawnRequest {
    let size = rng.gen::<f32>() + 0.5;
    let position = random_panel_position(rng, config);
    SpawnRequest::cube(size, position)
}

/// Creates objects sharing one geometry per primitive and one material
#[derive(Debug, Clone)]
pub struct Spawner {
    material: MaterialId,
    sphere_geometry: Geometry,
    box_geometry: Geometry,
    mass: f32,
    contact: ContactMaterial,
}

impl Spawner {
    /// Register the shared object material with `scene`
    pub fn new(scene: &mut RenderScene, physics: &PhysicsConfig) -> Self {
        let material = scene.add_material(StandardMaterial {
            metalness: 0.3,
            roughness: 0.4,
            ..StandardMaterial::default()
        });

        Self {
            material,
            sphere_geometry: Geometry::UnitSphere { segments: 32 },
            box_geometry: Geometry::UnitBox,
            mass: physics.body_mass,
            contact: ContactMaterial {
                friction: physics.friction,
                restitution: physics.restitution,
            },
        }
    }

    /// Material shared by every spawned mesh
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Spawn a sphere without launch force
    pub fn spawn_sphere<W: PhysicsWorld + ?Sized>(
        &self,
        radius: f32,
        position: Vec3,
        world: &mut W,
        scene: &mut RenderScene,
        collisions: &mut CollisionEvents,
        registry: &mut ObjectRegistry,
    ) -> Result<ManagedObject, SpawnError> {
        self.spawn(SpawnRequest::sphere(radius, position), world, scene, collisions, registry)
    }

    /// Spawn a box without launch force
    pub fn spawn_box<W: PhysicsWorld + ?Sized>(
        &self,
        size: f32,
        position: Vec3,
        world: &mut W,
        scene: &mut RenderScene,
        collisions: &mut CollisionEvents,
        registry: &mut ObjectRegistry,
    ) -> Result<ManagedObject, SpawnError> {
        self.spawn(SpawnRequest::cube(size, position), world, scene, collisions, registry)
    }

    /// Spawn one object
    pub fn spawn<W: PhysicsWorld + ?Sized>(
        &self,
        request: SpawnRequest,
        world: &mut W,
        scene: &mut RenderScene,
        collisions: &mut CollisionEvents,
        registry: &mut ObjectRegistry,
    ) -> Result<ManagedObject, SpawnError> {
        let size = request.shape.size();
        if !(size.is_finite() && size > 0.0) {
            return Err(SpawnError::InvalidSize(size));
        }

        let (collider, geometry) = match request.shape {
            ShapeKind::Sphere { radius } => (ColliderShape::Ball { radius }, self.sphere_geometry),
            ShapeKind::Box { size } => (
                ColliderShape::Cuboid { half_extents: Vec3::repeat(size * 0.5) },
                self.box_geometry,
            ),
        };

        let desc = BodyDesc::dynamic(self.mass, request.position, collider).with_material(self.contact);
        let body = world.add_body(&desc)?;

        if let Some(force) = request.force {
            if let Err(e) = world.apply_local_force(body, force, request.force_point) {
                if let Err(cleanup) = world.remove_body(body) {
                    log::warn!("Failed to roll back body {:?}: {}", body, cleanup);
                }
                return Err(e.into());
            }
        }

        collisions.subscribe(body);

        let mesh = scene.add_mesh(
            MeshNode::new(geometry, self.material, Transform::from_position_scale(request.position, size))
                .casting_shadow(),
        );

        let object = ManagedObject { mesh, body, kind: request.shape };
        registry.add(object);
        log::debug!("Spawned {:?} at {:?}", request.shape, request.position);
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierWorld;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        world: RapierWorld,
        scene: RenderScene,
        collisions: CollisionEvents,
        registry: ObjectRegistry,
        spawner: Spawner,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = RenderScene::new();
            let spawner = Spawner::new(&mut scene, &PhysicsConfig::default());
            Self {
                world: RapierWorld::default(),
                scene,
                collisions: CollisionEvents::new(64),
                registry: ObjectRegistry::new(),
                spawner,
            }
        }

        fn spawn(&mut self, request: SpawnRequest) -> Result<ManagedObject, SpawnError> {
            self.spawner.spawn(request, &mut self.world, &mut self.scene, &mut self.collisions, &mut self.registry)
        }
    }

    #[test]
    fn test_spawn_sphere_adds_matching_pair() {
        let mut fx = Fixture::new();
        let object = fx
            .spawner
            .spawn_sphere(0.5, Vec3::new(0.0, 3.0, 0.0), &mut fx.world, &mut fx.scene, &mut fx.collisions, &mut fx.registry)
            .unwrap();

        assert_eq!(fx.registry.len(), 1);
        assert_eq!(fx.world.body_count(), 1);
        assert_eq!(fx.scene.mesh_count(), 1);
        assert!(fx.collisions.is_subscribed(object.body));

        let mesh = fx.scene.mesh(object.mesh).unwrap();
        assert_eq!(mesh.transform.scale, Vec3::repeat(0.5));
        assert!(mesh.cast_shadow);
        assert_eq!(mesh.material, fx.spawner.material());
    }

    #[test]
    fn test_spawn_box_uses_half_extents() {
        let mut fx = Fixture::new();
        let object = fx
            .spawner
            .spawn_box(1.0, Vec3::new(0.0, 0.5, 0.0), &mut fx.world, &mut fx.scene, &mut fx.collisions, &mut fx.registry)
            .unwrap();

        assert_eq!(object.kind, ShapeKind::Box { size: 1.0 });
        let pose = fx.world.body_pose(object.body).unwrap();
        assert_relative_eq!(pose.position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_invalid_size_leaves_nothing_behind() {
        let mut fx = Fixture::new();
        for size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                fx.spawn(SpawnRequest::sphere(size, Vec3::zeros())),
                Err(SpawnError::InvalidSize(_))
            ));
        }

        assert!(fx.registry.is_empty());
        assert_eq!(fx.world.body_count(), 0);
        assert_eq!(fx.scene.mesh_count(), 0);
    }

    #[test]
    fn test_launch_force_moves_body() {
        let mut fx = Fixture::new();
        let object = fx
            .spawn(SpawnRequest::cube(1.0, Vec3::new(0.0, 3.0, 0.0)).with_force(Vec3::new(120.0, 0.0, 0.0)))
            .unwrap();

        fx.world.step(1.0 / 60.0);
        let velocity = fx.world.body_velocity(object.body).unwrap();
        assert_relative_eq!(velocity.x, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_random_requests_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = SpawnConfig::default();

        for _ in 0..100 {
            let sphere = random_sphere_request(&mut rng, &config);
            assert!((0.25..1.25).contains(&sphere.shape.size()));
            assert!(sphere.position.x.abs() <= 2.5 && sphere.position.z.abs() <= 2.5);
            assert_eq!(sphere.position.y, 3.0);

            let cube = random_box_request(&mut rng, &config);
            assert!((0.5..1.5).contains(&cube.shape.size()));
        }
    }

    #[test]
    fn test_random_launch_force_direction() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = SpawnConfig::default();

        for _ in 0..50 {
            let sphere = random_launch_force(&mut rng, ShapeKind::Sphere { radius: 1.0 }, &config);
            assert!(sphere.x <= 0.0 && sphere.z <= 0.0 && sphere.x > -400.0);
            assert_eq!(sphere.y, 300.0);

            let cube = random_launch_force(&mut rng, ShapeKind::Box { size: 1.0 }, &config);
            assert!(cube.x >= 0.0 && cube.z >= 0.0 && cube.z < 400.0);
        }
    }
}
