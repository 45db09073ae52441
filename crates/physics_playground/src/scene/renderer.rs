//! # Renderer abstraction
//!
//! The frame loop issues exactly one [`Renderer::render`] call per tick. The
//! rasterizer itself lives outside this crate; [`HeadlessRenderer`] performs
//! everything up to the draw calls (culling, sorting, batching) and keeps the
//! last queue around so callers can inspect what would have been drawn.

use thiserror::Error;

use crate::foundation::collections::MaterialId;
use crate::scene::bounds::Frustum;
use crate::scene::camera::Camera;
use crate::scene::render_queue::{RenderItem, RenderQueue};
use crate::scene::render_scene::RenderScene;

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Width or height is zero
    #[error("Viewport has zero size ({width}x{height})")]
    ZeroSizedViewport {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A mesh references a material the scene does not know
    #[error("Mesh references unknown material {0:?}")]
    MissingMaterial(MaterialId),
}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered so far, this one included
    pub frame: u64,
    /// Meshes submitted
    pub drawn: usize,
    /// Visible meshes rejected by frustum culling
    pub culled: usize,
    /// Material batches
    pub batches: usize,
    /// Meshes rendered into the shadow map
    pub shadow_casters: usize,
    /// Lights in the scene
    pub lights: usize,
}

/// Something that turns a scene and a camera into a frame
pub trait Renderer {
    /// Draw one frame
    fn render(&mut self, scene: &RenderScene, camera: &Camera) -> Result<FrameStats, RenderError>;

    /// Resize the drawing surface; `pixel_ratio` is already clamped by the caller
    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<(), RenderError>;

    /// Current size in physical pixels
    fn drawing_buffer_size(&self) -> (u32, u32);
}

/// Renderer without a graphics backend
#[derive(Debug)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    pixel_ratio: f32,
    frames: u64,
    last_queue: RenderQueue,
    last_stats: FrameStats,
}

impl HeadlessRenderer {
    /// Create a renderer for a `width` x `height` CSS-pixel viewport
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Result<Self, RenderError> {
        let mut renderer = Self {
            width: 0,
            height: 0,
            pixel_ratio: 1.0,
            frames: 0,
            last_queue: RenderQueue::new(),
            last_stats: FrameStats::default(),
        };
        renderer.set_size(width, height, pixel_ratio)?;
        Ok(renderer)
    }

    /// Queue built by the most recent frame
    pub fn last_queue(&self) -> &RenderQueue {
        &self.last_queue
    }

    /// Stats of the most recent frame
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Logical viewport size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Device pixel ratio in use
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &RenderScene, camera: &Camera) -> Result<FrameStats, RenderError> {
        let frustum = Frustum::from_matrix(&camera.view_projection_matrix());
        let mut items = Vec::new();
        let mut culled = 0;

        for (node, mesh) in scene.meshes().filter(|(_, mesh)| mesh.visible) {
            let material = scene
                .material(mesh.material)
                .ok_or(RenderError::MissingMaterial(mesh.material))?;

            if !frustum.intersects_aabb(&mesh.world_bounds()) {
                culled += 1;
                continue;
            }

            items.push(RenderItem {
                node,
                geometry: mesh.geometry,
                material: mesh.material,
                transform: mesh.transform.clone(),
                cast_shadow: mesh.cast_shadow,
                depth: (mesh.transform.position - camera.position).norm_squared(),
                is_transparent: material.is_transparent(),
            });
        }

        let shadow_casters = items.iter().filter(|item| item.cast_shadow).count();
        self.last_queue = RenderQueue::from_items(items);
        self.frames += 1;
        self.last_stats = FrameStats {
            frame: self.frames,
            drawn: self.last_queue.total_item_count(),
            culled,
            batches: self.last_queue.batch_count(),
            shadow_casters,
            lights: scene.lights().count(),
        };

        log::trace!(
            "Frame {}: {} drawn, {} culled, {} batches",
            self.frames,
            self.last_stats.drawn,
            culled,
            self.last_stats.batches
        );
        Ok(self.last_stats)
    }

    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroSizedViewport { width, height });
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        log::debug!("Renderer resized to {}x{} @ {}x", width, height, pixel_ratio);
        Ok(())
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}
