//! Static scenery: the ground, the walled pool and the lights

use crate::core::config::PoolConfig;
use crate::foundation::collections::{BodyHandle, NodeHandle};
use crate::foundation::math::{constants, Quat, Transform, Vec3};
use crate::physics::{BodyDesc, ColliderShape, PhysicsError, PhysicsWorld};
use crate::scene::{color_from_hex, Geometry, LightNode, MeshNode, RenderScene, ShadowSettings, StandardMaterial};

const POOL_FLOOR_HALF_HEIGHT: f32 = 0.1;
const POOL_BEVEL: f32 = 0.1;

/// Handles of everything the scenery put into the world and the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    /// Infinite ground plane body
    pub ground: BodyHandle,
    /// Compound pool body (floor slab and four walls)
    pub pool: BodyHandle,
    /// Green pool floor mesh
    pub pool_floor_mesh: NodeHandle,
    /// Wooden frame mesh
    pub pool_frame_mesh: NodeHandle,
    /// Ambient and directional lights
    pub lights: Vec<NodeHandle>,
}

/// Collider layout of the pool: floor slab first, then front, back, left and right walls
pub fn pool_body(config: &PoolConfig) -> BodyDesc {
    let w = config.width;
    let t = config.wall_thickness;
    let h = config.wall_height;

    let front_back = ColliderShape::Cuboid { half_extents: Vec3::new(w, h * 0.5, t * 0.5) };
    let left_right = ColliderShape::Cuboid { half_extents: Vec3::new(t * 0.5, h * 0.5, w - t) };

    BodyDesc::fixed(Vec3::zeros())
        .with_part(
            ColliderShape::Cuboid { half_extents: Vec3::new(w - t, POOL_FLOOR_HALF_HEIGHT, w - t) },
            Vec3::new(0.0, POOL_FLOOR_HALF_HEIGHT, 0.0),
        )
        .with_part(front_back, Vec3::new(0.0, h * 0.5, w - t * 0.5))
        .with_part(front_back, Vec3::new(0.0, h * 0.5, -(w - t * 0.5)))
        .with_part(left_right, Vec3::new(-(w - t * 0.5), h * 0.5, 0.0))
        .with_part(left_right, Vec3::new(w - t * 0.5, h * 0.5, 0.0))
}

/// Ground: static half-space below y = 0
pub fn ground_body() -> BodyDesc {
    BodyDesc::fixed(Vec3::zeros()).with_part(ColliderShape::HalfSpace { normal: Vec3::y() }, Vec3::zeros())
}

fn pool_material(hex: u32) -> StandardMaterial {
    StandardMaterial {
        color: color_from_hex(hex),
        metalness: 0.3,
        roughness: 0.4,
        env_map_intensity: 0.5,
        double_sided: true,
        opacity: 1.0,
    }
}

impl Scenery {
    /// Build the ground, the pool and the lights
    pub fn build<W: PhysicsWorld + ?Sized>(
        world: &mut W,
        scene: &mut RenderScene,
        config: &PoolConfig,
    ) -> Result<Self, PhysicsError> {
        let ground = world.add_body(&ground_body())?;
        let pool = world.add_body(&pool_body(config))?;

        let green = scene.add_material(pool_material(0x42_8F_41));
        let wood = scene.add_material(pool_material(0x91_54_2B));

        let mut floor = MeshNode::new(
            Geometry::Plane { width: config.width * 2.0, height: config.width * 2.0 },
            green,
            Transform {
                position: Vec3::zeros(),
                rotation: Quat::from_euler_angles(-constants::HALF_PI, 0.0, 0.0),
                scale: Vec3::repeat(1.0),
            },
        );
        floor.receive_shadow = true;
        let pool_floor_mesh = scene.add_mesh(floor);

        let pool_frame_mesh = scene.add_mesh(MeshNode::new(
            Geometry::ExtrudedFrame {
                half_width: config.width,
                thickness: config.wall_thickness,
                height: config.wall_height,
                bevel: POOL_BEVEL,
            },
            wood,
            Transform::identity(),
        ));

        let white = Vec3::repeat(1.0);
        let lights = vec![
            scene.add_light(LightNode::Ambient { color: white, intensity: 2.1 }),
            scene.add_light(LightNode::Directional {
                color: white,
                intensity: 0.6,
                position: Vec3::new(5.0, 5.0, 5.0),
                shadow: Some(ShadowSettings { map_size: 1024, far: 15.0, half_extent: 7.0 }),
            }),
        ];

        log::info!(
            "Scenery built: pool {}x{} (walls {} thick, {} high)",
            config.width * 2.0,
            config.width * 2.0,
            config.wall_thickness,
            config.wall_height
        );

        Ok(Self { ground, pool, pool_floor_mesh, pool_frame_mesh, lights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{RapierWorld, ShapePart};
    use approx::assert_relative_eq;

    #[test]
    fn test_pool_layout() {
        let desc = pool_body(&PoolConfig::default());
        assert_eq!(desc.parts.len(), 5);
        assert!(desc.validate().is_ok());

        let ShapePart { shape, offset } = desc.parts[0];
        assert_eq!(shape, ColliderShape::Cuboid { half_extents: Vec3::new(7.5, 0.1, 7.5) });
        assert_relative_eq!(offset.y, 0.1);

        let ShapePart { shape, offset } = desc.parts[1];
        assert_eq!(shape, ColliderShape::Cuboid { half_extents: Vec3::new(8.0, 0.75, 0.25) });
        assert_relative_eq!(offset, Vec3::new(0.0, 0.75, 7.75));

        let ShapePart { shape, offset } = desc.parts[3];
        assert_eq!(shape, ColliderShape::Cuboid { half_extents: Vec3::new(0.25, 0.75, 7.5) });
        assert_relative_eq!(offset, Vec3::new(-7.75, 0.75, 0.0));
    }

    #[test]
    fn test_build_populates_world_and_scene() {
        let mut world = RapierWorld::default();
        let mut scene = RenderScene::new();
        let scenery = Scenery::build(&mut world, &mut scene, &PoolConfig::default()).unwrap();

        assert_eq!(world.body_count(), 2);
        assert!(world.contains_body(scenery.ground) && world.contains_body(scenery.pool));
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.lights().count(), 2);
        assert!(scene.mesh(scenery.pool_floor_mesh).unwrap().receive_shadow);
    }

    #[test]
    fn test_ball_comes_to_rest_on_pool_floor() {
        let mut world = RapierWorld::default();
        let mut scene = RenderScene::new();
        Scenery::build(&mut world, &mut scene, &PoolConfig::default()).unwrap();
        let ball = world
            .add_body(&BodyDesc::dynamic(1.0, Vec3::new(0.0, 3.0, 0.0), ColliderShape::Ball { radius: 0.5 }))
            .unwrap();

        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }

        let resting = world.body_pose(ball).unwrap().position;
        assert_relative_eq!(resting.y, 0.7, epsilon = 0.05);
    }
}
