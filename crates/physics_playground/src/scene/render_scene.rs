//! Render scene: the node store the renderer draws from
//!
//! Nodes are flat (no parenting); every mesh carries its own world transform,
//! which the frame loop overwrites from physics for spawned objects.

use crate::foundation::collections::{MaterialId, NodeHandle, SlotMap};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::bounds::AABB;

/// Convert a `0xRRGGBB` colour into linear-ish RGB components in `[0, 1]`
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Physically based surface description
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Base colour
    pub color: Vec3,
    /// Metalness in `[0, 1]`
    pub metalness: f32,
    /// Roughness in `[0, 1]`
    pub roughness: f32,
    /// Environment map contribution
    pub env_map_intensity: f32,
    /// Render both faces
    pub double_sided: bool,
    /// Opacity; below 1 the material is drawn in the transparent pass
    pub opacity: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::repeat(1.0),
            metalness: 0.0,
            roughness: 1.0,
            env_map_intensity: 1.0,
            double_sided: false,
            opacity: 1.0,
        }
    }
}

impl StandardMaterial {
    /// Whether objects using this material need blending
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Mesh geometry, in local space before the node transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Sphere of radius 1, scaled per node
    UnitSphere {
        /// Horizontal and vertical tessellation
        segments: u32,
    },
    /// Cube of side 1, scaled per node
    UnitBox,
    /// Rectangle in the local XY plane
    Plane {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
    },
    /// Square frame extruded upwards from y = 0 (the pool walls)
    ExtrudedFrame {
        /// Half of the outer side
        half_width: f32,
        /// Wall thickness
        thickness: f32,
        /// Extrusion depth
        height: f32,
        /// Bevel added on every side
        bevel: f32,
    },
    /// Cylinder along local Y, centred on the origin
    Cylinder {
        /// Radius
        radius: f32,
        /// Length along Y
        length: f32,
    },
}

impl Geometry {
    /// Local-space bounds
    pub fn local_bounds(&self) -> AABB {
        match *self {
            Self::UnitSphere { .. } => AABB::centered(Vec3::repeat(1.0)),
            Self::UnitBox => AABB::centered(Vec3::repeat(0.5)),
            Self::Plane { width, height } => {
                AABB::centered(Vec3::new(width * 0.5, height * 0.5, 0.0))
            }
            Self::ExtrudedFrame { half_width, height, bevel, .. } => AABB::new(
                Vec3::new(-(half_width + bevel), -bevel, -(half_width + bevel)),
                Vec3::new(half_width + bevel, height + bevel, half_width + bevel),
            ),
            Self::Cylinder { radius, length } => {
                AABB::centered(Vec3::new(radius, length * 0.5, radius))
            }
        }
    }
}

/// A drawable object
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    /// Shape
    pub geometry: Geometry,
    /// Surface
    pub material: MaterialId,
    /// World transform
    pub transform: Transform,
    /// Rendered into shadow maps
    pub cast_shadow: bool,
    /// Shadows are drawn onto it
    pub receive_shadow: bool,
    /// Drawn at all
    pub visible: bool,
}

impl MeshNode {
    /// Visible mesh with the given geometry, material and transform
    pub fn new(geometry: Geometry, material: MaterialId, transform: Transform) -> Self {
        Self {
            geometry,
            material,
            transform,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
        }
    }

    /// Enable shadow casting
    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    /// World-space bounds
    pub fn world_bounds(&self) -> AABB {
        self.geometry.local_bounds().transformed(&self.transform)
    }
}

/// Shadow map settings of a directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Far plane of the shadow camera
    pub far: f32,
    /// Half size of the orthographic shadow camera
    pub half_extent: f32,
}

/// Light sources
#[derive(Debug, Clone, PartialEq)]
pub enum LightNode {
    /// Uniform light from everywhere
    Ambient {
        /// Colour
        color: Vec3,
        /// Intensity
        intensity: f32,
    },
    /// Parallel light shining from `position` towards the origin
    Directional {
        /// Colour
        color: Vec3,
        /// Intensity
        intensity: f32,
        /// Where the light sits
        position: Vec3,
        /// Shadow casting, when enabled
        shadow: Option<ShadowSettings>,
    },
}

/// Anything stored in the scene
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Drawable mesh
    Mesh(MeshNode),
    /// Light source
    Light(LightNode),
}

/// The render scene
#[derive(Debug, Default)]
pub struct RenderScene {
    nodes: SlotMap<NodeHandle, SceneNode>,
    materials: SlotMap<MaterialId, StandardMaterial>,
}

impl RenderScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material
    pub fn add_material(&mut self, material: StandardMaterial) -> MaterialId {
        self.materials.insert(material)
    }

    /// Look up a material
    pub fn material(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(id)
    }

    /// Add a mesh
    pub fn add_mesh(&mut self, mesh: MeshNode) -> NodeHandle {
        self.nodes.insert(SceneNode::Mesh(mesh))
    }

    /// Add a light
    pub fn add_light(&mut self, light: LightNode) -> NodeHandle {
        self.nodes.insert(SceneNode::Light(light))
    }

    /// Remove a node, returning it
    pub fn remove(&mut self, handle: NodeHandle) -> Option<SceneNode> {
        self.nodes.remove(handle)
    }

    /// Whether the handle names a node
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Look up any node
    pub fn get(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle)
    }

    /// Look up any node mutably
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        self.nodes.get_mut(handle)
    }

    /// Look up a mesh
    pub fn mesh(&self, handle: NodeHandle) -> Option<&MeshNode> {
        match self.nodes.get(handle) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    /// Look up a mesh mutably
    pub fn mesh_mut(&mut self, handle: NodeHandle) -> Option<&mut MeshNode> {
        match self.nodes.get_mut(handle) {
            Some(SceneNode::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    /// Iterate meshes
    pub fn meshes(&self) -> impl Iterator<Item = (NodeHandle, &MeshNode)> {
        self.nodes.iter().filter_map(|(handle, node)| match node {
            SceneNode::Mesh(mesh) => Some((handle, mesh)),
            SceneNode::Light(_) => None,
        })
    }

    /// Iterate lights
    pub fn lights(&self) -> impl Iterator<Item = (NodeHandle, &LightNode)> {
        self.nodes.iter().filter_map(|(handle, node)| match node {
            SceneNode::Light(light) => Some((handle, light)),
            SceneNode::Mesh(_) => None,
        })
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_from_hex() {
        let green = color_from_hex(0x42_8F_41);
        assert_relative_eq!(green.x, 66.0 / 255.0);
        assert_relative_eq!(green.y, 143.0 / 255.0);
        assert_relative_eq!(green.z, 65.0 / 255.0);
    }

    #[test]
    fn test_add_remove_nodes() {
        let mut scene = RenderScene::new();
        let material = scene.add_material(StandardMaterial::default());
        let mesh = scene.add_mesh(MeshNode::new(Geometry::UnitBox, material, Transform::identity()));
        let light = scene.add_light(LightNode::Ambient { color: Vec3::repeat(1.0), intensity: 2.1 });

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.mesh(mesh).is_some());
        assert!(scene.mesh(light).is_none());

        if let Some(SceneNode::Light(LightNode::Ambient { intensity, .. })) = scene.get_mut(light) {
            *intensity = 1.0;
        }
        assert!(matches!(scene.get(light), Some(SceneNode::Light(LightNode::Ambient { intensity, .. })) if *intensity == 1.0));

        assert!(matches!(scene.remove(mesh), Some(SceneNode::Mesh(_))));
        assert!(!scene.contains(mesh));
        assert!(scene.remove(mesh).is_none());
        assert_eq!(scene.lights().count(), 1);
    }

    #[test]
    fn test_sphere_bounds_follow_scale() {
        let mut scene = RenderScene::new();
        let material = scene.add_material(StandardMaterial::default());
        let node = MeshNode::new(
            Geometry::UnitSphere { segments: 32 },
            material,
            Transform::from_position_scale(Vec3::new(1.0, 2.0, 3.0), 0.5),
        );

        let bounds = node.world_bounds();
        assert_relative_eq!(bounds.center(), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
        assert_relative_eq!(bounds.extents(), Vec3::repeat(0.5), epsilon = 1e-6);
    }
}
