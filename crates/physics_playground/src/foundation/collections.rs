//! Specialized collection types
//!
//! Every long-lived object in the playground (scene nodes, physics bodies,
//! materials, timers) is addressed through a generational slot map key so a
//! stale handle can never alias a newer object.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a node (mesh or light) in the render scene
    pub struct NodeHandle;

    /// Handle to a rigid body owned by a physics world
    pub struct BodyHandle;

    /// Handle to a material registered with the render scene
    pub struct MaterialId;

    /// Handle to a pending timer in the scheduler
    pub struct TimerHandle;
}
