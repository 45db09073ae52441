//! Scene module
//!
//! The render-side half of the playground: the node store meshes and lights
//! live in, the camera with its orbit controls, and the renderer seam the
//! frame loop draws through.

pub mod bounds;
pub mod camera;
pub mod render_queue;
pub mod render_scene;
pub mod renderer;

pub use bounds::{Frustum, Plane, AABB};
pub use camera::{Camera, OrbitControls};
pub use render_queue::{RenderBatch, RenderItem, RenderQueue};
pub use render_scene::{
    color_from_hex, Geometry, LightNode, MeshNode, RenderScene, SceneNode, ShadowSettings, StandardMaterial,
};
pub use renderer::{FrameStats, HeadlessRenderer, RenderError, Renderer};
