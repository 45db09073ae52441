//! rapier3d-backed implementation of [`PhysicsWorld`]

use std::collections::HashMap;
use std::sync::Mutex;

use rapier3d::prelude::*;

use super::conversions::{
    from_rapier_rotation, from_rapier_vector, to_rapier_isometry, to_rapier_point, to_rapier_vector,
};
use super::{BodyDesc, BodyKind, ColliderShape, ContactImpact, PhysicsError, PhysicsWorld, Pose};
use crate::core::PhysicsConfig;
use crate::foundation::collections::{BodyHandle, SlotMap};
use crate::foundation::math::Vec3;

/// Contact start reported by the narrow phase, before the solver runs
#[derive(Debug, Clone, Copy)]
struct RawImpact {
    body_a: RigidBodyHandle,
    body_b: RigidBodyHandle,
    impact_velocity: f32,
}

/// Records contact starts together with the approach speed along the normal.
///
/// rapier emits collision events from the narrow phase, while body velocities
/// still hold their pre-solve values, so the relative velocity read here is
/// the impact velocity rather than the post-bounce one.
#[derive(Default)]
struct ImpactCollector {
    impacts: Mutex<Vec<RawImpact>>,
}

impl ImpactCollector {
    fn drain(&self) -> Vec<RawImpact> {
        self.impacts
            .lock()
            .map(|mut impacts| std::mem::take(&mut *impacts))
            .unwrap_or_default()
    }
}

/// Velocity of `body` at the contact, spin included; linear velocity when no contact point is known
fn contact_velocity(body: &RigidBody, point: Option<&Point<Real>>) -> Vector<Real> {
    point.map_or_else(|| *body.linvel(), |point| body.velocity_at_point(point))
}

impl EventHandler for ImpactCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: rapier3d::geometry::CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() || event.sensor() {
            return;
        }
        let Some(pair) = contact_pair else {
            return;
        };
        let parent = |handle: ColliderHandle| colliders.get(handle).and_then(Collider::parent);
        let (Some(body_a), Some(body_b)) = (parent(event.collider1()), parent(event.collider2())) else {
            return;
        };

        let manifold = pair.manifolds.iter().find(|manifold| !manifold.points.is_empty());
        let contact_point = manifold.and_then(|manifold| manifold.data.solver_contacts.first()).map(|contact| contact.point);

        let velocity = |handle: RigidBodyHandle| {
            bodies.get(handle).map_or_else(Vector::zeros, |body| contact_velocity(body, contact_point.as_ref()))
        };
        let relative = velocity(body_a) - velocity(body_b);

        let impact_velocity =
            manifold.map_or_else(|| relative.norm(), |manifold| relative.dot(&manifold.data.normal).abs());

        if let Ok(mut impacts) = self.impacts.lock() {
            impacts.push(RawImpact { body_a, body_b, impact_velocity });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Physics world backed by rapier3d
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collector: ImpactCollector,

    /// Playground handles → rapier handles
    handles: SlotMap<BodyHandle, RigidBodyHandle>,
    /// rapier handles → playground handles
    owners: HashMap<RigidBodyHandle, BodyHandle>,
    /// Bodies carrying a one-step force
    forced: Vec<RigidBodyHandle>,
    allow_sleep: bool,
}

impl RapierWorld {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_rapier_vector(&gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collector: ImpactCollector::default(),
            handles: SlotMap::with_key(),
            owners: HashMap::new(),
            forced: Vec::new(),
            allow_sleep: true,
        }
    }

    /// Create a world from the physics section of the configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        let mut world = Self::new(config.gravity());
        world.allow_sleep = config.allow_sleep;
        world
    }

    /// Whether a dynamic body is currently asleep
    pub fn is_sleeping(&self, body: BodyHandle) -> bool {
        self.rigid_body(body).is_some_and(RigidBody::is_sleeping)
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.handles.get(body).and_then(|handle| self.rigid_body_set.get(*handle))
    }

    fn build_collider(shape: &ColliderShape) -> ColliderBuilder {
        match *shape {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::HalfSpace { normal } => {
                ColliderBuilder::halfspace(UnitVector::new_normalize(to_rapier_vector(&normal)))
            }
        }
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PhysicsError> {
        desc.validate()?;

        let builder = match desc.kind {
            BodyKind::Dynamic { .. } => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let rigid_body = builder
            .position(to_rapier_isometry(&desc.position, &desc.rotation))
            .can_sleep(self.allow_sleep && desc.can_sleep)
            .build();
        let rigid_handle = self.rigid_body_set.insert(rigid_body);

        #[allow(clippy::cast_precision_loss)]
        let part_mass = match desc.kind {
            BodyKind::Dynamic { mass } => Some(mass / desc.parts.len() as f32),
            BodyKind::Static => None,
        };

        for part in &desc.parts {
            let mut collider = Self::build_collider(&part.shape)
                .translation(to_rapier_vector(&part.offset))
                .friction(desc.material.friction)
                .restitution(desc.material.restitution)
                .active_events(ActiveEvents::COLLISION_EVENTS);
            if let Some(mass) = part_mass {
                collider = collider.mass(mass);
            }
            self.collider_set
                .insert_with_parent(collider.build(), rigid_handle, &mut self.rigid_body_set);
        }

        let handle = self.handles.insert(rigid_handle);
        self.owners.insert(rigid_handle, handle);
        log::trace!("Added {:?} body {:?} at {:?}", desc.kind, handle, desc.position);
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let rigid_handle = self.handles.remove(body).ok_or(PhysicsError::UnknownBody(body))?;
        self.owners.remove(&rigid_handle);
        self.forced.retain(|handle| *handle != rigid_handle);
        self.rigid_body_set.remove(
            rigid_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        Ok(())
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        self.handles.contains_key(body)
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }

    fn body_pose(&self, body: BodyHandle) -> Option<Pose> {
        self.rigid_body(body).map(|rigid_body| Pose {
            position: from_rapier_vector(rigid_body.translation()),
            rotation: from_rapier_rotation(rigid_body.rotation()),
        })
    }

    fn body_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.rigid_body(body).map(|rigid_body| from_rapier_vector(rigid_body.linvel()))
    }

    fn apply_local_force(&mut self, body: BodyHandle, force: Vec3, local_point: Vec3) -> Result<(), PhysicsError> {
        let rigid_handle = *self.handles.get(body).ok_or(PhysicsError::UnknownBody(body))?;
        let rigid_body = self
            .rigid_body_set
            .get_mut(rigid_handle)
            .ok_or(PhysicsError::UnknownBody(body))?;

        let world_force = rigid_body.rotation() * to_rapier_vector(&force);
        let world_point = rigid_body.position() * to_rapier_point(&local_point);
        rigid_body.add_force_at_point(world_force, world_point, true);

        if !self.forced.contains(&rigid_handle) {
            self.forced.push(rigid_handle);
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Vec<ContactImpact> {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collector,
        );

        // Forces only last for the step they were applied before
        for rigid_handle in self.forced.drain(..) {
            if let Some(rigid_body) = self.rigid_body_set.get_mut(rigid_handle) {
                rigid_body.reset_forces(false);
            }
        }

        self.collector
            .drain()
            .into_iter()
            .filter_map(|raw| {
                let body_a = *self.owners.get(&raw.body_a)?;
                let body_b = *self.owners.get(&raw.body_b)?;
                Some(ContactImpact { body_a, body_b, impact_velocity: raw.impact_velocity })
            })
            .collect()
    }
}
