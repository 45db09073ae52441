//! Object registry: every spawned mesh paired with the body that drives it

use crate::foundation::collections::{BodyHandle, NodeHandle};
use crate::physics::{CollisionEvents, PhysicsWorld};
use crate::scene::RenderScene;

/// Which primitive an object was spawned as
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Sphere of the given radius
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Cube with the given edge length
    Box {
        /// Edge length
        size: f32,
    },
}

impl ShapeKind {
    /// Radius or edge length
    pub fn size(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Box { size } => size,
        }
    }
}

/// A render mesh and the physics body that drives it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagedObject {
    /// Mesh in the render scene
    pub mesh: NodeHandle,
    /// Body in the physics world
    pub body: BodyHandle,
    /// What was spawned
    pub kind: ShapeKind,
}

/// Ordered collection of spawned objects
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: Vec<ManagedObject>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spawned pair
    pub fn add(&mut self, object: ManagedObject) {
        self.objects.push(object);
    }

    /// Destroy every registered object and empty the registry
    ///
    /// Each body loses its collision subscription and is removed from the
    /// world, and each mesh is removed from the scene. Teardown is best-effort:
    /// a body the world refuses to remove is logged and skipped. Returns the
    /// number of such failures.
    pub fn remove_all<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        scene: &mut RenderScene,
        collisions: &mut CollisionEvents,
    ) -> usize {
        let mut failures = 0;

        for object in self.objects.drain(..) {
            collisions.unsubscribe(object.body);

            if let Err(e) = world.remove_body(object.body) {
                failures += 1;
                log::warn!("Failed to remove body {:?} during teardown: {}", object.body, e);
            }

            if scene.remove(object.mesh).is_none() {
                log::warn!("Mesh {:?} was already gone from the scene", object.mesh);
            }
        }

        failures
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &ManagedObject> {
        self.objects.iter()
    }

    /// Object at `index` in spawn order
    pub fn get(&self, index: usize) -> Option<&ManagedObject> {
        self.objects.get(index)
    }

    /// Find the object owning `body`
    pub fn find_by_body(&self, body: BodyHandle) -> Option<&ManagedObject> {
        self.objects.iter().find(|object| object.body == body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::physics::{BodyDesc, ColliderShape, ContactImpact, PhysicsError, Pose, RapierWorld};
    use crate::scene::{Geometry, MeshNode, StandardMaterial};

    /// World that refuses to remove one particular body
    struct StubbornWorld {
        inner: RapierWorld,
        refuse: Option<BodyHandle>,
    }

    impl PhysicsWorld for StubbornWorld {
        fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PhysicsError> {
            self.inner.add_body(desc)
        }

        fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
            if self.refuse == Some(body) {
                return Err(PhysicsError::UnknownBody(body));
            }
            self.inner.remove_body(body)
        }

        fn contains_body(&self, body: BodyHandle) -> bool {
            self.inner.contains_body(body)
        }

        fn body_count(&self) -> usize {
            self.inner.body_count()
        }

        fn body_pose(&self, body: BodyHandle) -> Option<Pose> {
            self.inner.body_pose(body)
        }

        fn body_velocity(&self, body: BodyHandle) -> Option<Vec3> {
            self.inner.body_velocity(body)
        }

        fn apply_local_force(&mut self, body: BodyHandle, force: Vec3, local_point: Vec3) -> Result<(), PhysicsError> {
            self.inner.apply_local_force(body, force, local_point)
        }

        fn step(&mut self, dt: f32) -> Vec<ContactImpact> {
            self.inner.step(dt)
        }
    }

    fn populate<W: PhysicsWorld>(
        count: usize,
        world: &mut W,
        scene: &mut RenderScene,
        collisions: &mut CollisionEvents,
        registry: &mut ObjectRegistry,
    ) {
        let material = scene.add_material(StandardMaterial::default());
        for i in 0..count {
            let position = Vec3::new(i as f32, 3.0, 0.0);
            let body = world
                .add_body(&BodyDesc::dynamic(1.0, position, ColliderShape::Ball { radius: 0.5 }))
                .unwrap();
            collisions.subscribe(body);
            let mesh = scene.add_mesh(MeshNode::new(
                Geometry::UnitSphere { segments: 32 },
                material,
                Transform::from_position_scale(position, 0.5),
            ));
            registry.add(ManagedObject { mesh, body, kind: ShapeKind::Sphere { radius: 0.5 } });
        }
    }

    #[test]
    fn test_remove_all_clears_everything() {
        let mut world = RapierWorld::default();
        let mut scene = RenderScene::new();
        let mut collisions = CollisionEvents::new(16);
        let mut registry = ObjectRegistry::new();
        populate(3, &mut world, &mut scene, &mut collisions, &mut registry);

        let tracked: Vec<_> = registry.iter().copied().collect();
        assert_eq!(registry.remove_all(&mut world, &mut scene, &mut collisions), 0);

        assert!(registry.is_empty());
        assert_eq!(collisions.subscription_count(), 0);
        for object in tracked {
            assert!(!world.contains_body(object.body));
            assert!(!scene.contains(object.mesh));
        }
    }

    #[test]
    fn test_remove_all_on_empty_registry_is_noop() {
        let mut world = RapierWorld::default();
        let mut scene = RenderScene::new();
        let mut collisions = CollisionEvents::new(16);
        let mut registry = ObjectRegistry::new();

        assert_eq!(registry.remove_all(&mut world, &mut scene, &mut collisions), 0);
        assert_eq!(registry.remove_all(&mut world, &mut scene, &mut collisions), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_all_continues_past_failures() {
        let mut world = StubbornWorld { inner: RapierWorld::default(), refuse: None };
        let mut scene = RenderScene::new();
        let mut collisions = CollisionEvents::new(16);
        let mut registry = ObjectRegistry::new();
        populate(3, &mut world, &mut scene, &mut collisions, &mut registry);
        world.refuse = registry.get(0).map(|object| object.body);

        assert_eq!(registry.remove_all(&mut world, &mut scene, &mut collisions), 1);

        assert!(registry.is_empty());
        assert_eq!(world.body_count(), 1);
        assert_eq!(scene.mesh_count(), 0);
        assert_eq!(collisions.subscription_count(), 0);
    }

    #[test]
    fn test_lookup_preserves_spawn_order() {
        let mut world = RapierWorld::default();
        let mut scene = RenderScene::new();
        let mut collisions = CollisionEvents::new(16);
        let mut registry = ObjectRegistry::new();
        populate(2, &mut world, &mut scene, &mut collisions, &mut registry);

        let second = *registry.get(1).unwrap();
        assert_eq!(registry.find_by_body(second.body), Some(&second));
        assert!(registry.get(2).is_none());
        assert_eq!(registry.len(), 2);
    }
}
