//! Per-frame draw list
//!
//! Visible meshes are grouped by material. Opaque groups draw front to back,
//! transparent ones back to front.

use crate::foundation::collections::{MaterialId, NodeHandle};
use crate::foundation::math::Transform;
use crate::scene::render_scene::Geometry;

/// One mesh as it will be drawn this frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// Scene node the item came from
    pub node: NodeHandle,
    /// Geometry to draw
    pub geometry: Geometry,
    /// Material to draw it with
    pub material: MaterialId,
    /// World transform at render time
    pub transform: Transform,
    /// Whether the mesh goes into the shadow pass
    pub cast_shadow: bool,
    /// Squared distance from the camera, used for sorting
    pub depth: f32,
    /// Drawn with blending
    pub is_transparent: bool,
}

/// A batch of items sharing the same material
#[derive(Debug, Clone)]
pub struct RenderBatch {
    /// Material used by all items in this batch
    pub material_id: MaterialId,

    /// Items in this batch
    pub items: Vec<RenderItem>,
}

impl RenderBatch {
    /// Create a new empty batch for a material
    pub fn new(material_id: MaterialId) -> Self {
        Self {
            material_id,
            items: Vec::new(),
        }
    }

    /// Add an item to this batch
    pub fn add_item(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Get the number of items in this batch
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Render queue for a frame
///
/// Organizes items into batches by material to minimize state changes.
/// Separates opaque and transparent items.
#[derive(Debug, Default)]
pub struct RenderQueue {
    /// Opaque batches (items front-to-back for early-z)
    opaque_batches: Vec<RenderBatch>,

    /// Transparent batches (items back-to-front for alpha blending)
    transparent_batches: Vec<RenderBatch>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a render queue from the frame's items
    pub fn from_items(items: Vec<RenderItem>) -> Self {
        let (mut opaque, mut transparent): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|item| !item.is_transparent);

        opaque.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        Self {
            opaque_batches: Self::batch_by_material(opaque),
            transparent_batches: Self::batch_by_material(transparent),
        }
    }

    /// Batch items by material, batches in order of first appearance
    fn batch_by_material(items: Vec<RenderItem>) -> Vec<RenderBatch> {
        let mut batches: Vec<RenderBatch> = Vec::new();

        for item in items {
            match batches.iter_mut().find(|batch| batch.material_id == item.material) {
                Some(batch) => batch.add_item(item),
                None => {
                    let mut batch = RenderBatch::new(item.material);
                    batch.add_item(item);
                    batches.push(batch);
                }
            }
        }

        batches
    }

    /// Get opaque batches
    pub fn opaque_batches(&self) -> &[RenderBatch] {
        &self.opaque_batches
    }

    /// Get transparent batches
    pub fn transparent_batches(&self) -> &[RenderBatch] {
        &self.transparent_batches
    }

    /// Iterate every item, opaque first
    pub fn items(&self) -> impl Iterator<Item = &RenderItem> {
        self.opaque_batches
            .iter()
            .chain(self.transparent_batches.iter())
            .flat_map(|batch| batch.items.iter())
    }

    /// Find the item drawn for `node`
    pub fn item_for(&self, node: NodeHandle) -> Option<&RenderItem> {
        self.items().find(|item| item.node == node)
    }

    /// Get total number of opaque items
    pub fn opaque_item_count(&self) -> usize {
        self.opaque_batches.iter().map(RenderBatch::item_count).sum()
    }

    /// Get total number of transparent items
    pub fn transparent_item_count(&self) -> usize {
        self.transparent_batches.iter().map(RenderBatch::item_count).sum()
    }

    /// Get total number of items in the queue
    pub fn total_item_count(&self) -> usize {
        self.opaque_item_count() + self.transparent_item_count()
    }

    /// Opaque plus transparent batches
    pub fn batch_count(&self) -> usize {
        self.opaque_batches.len() + self.transparent_batches.len()
    }
}
