//! UI Module
//!
//! The debug control panel. It holds no rendering; a host front end shows the
//! controls and forwards interactions by name.

pub mod control_panel;

pub use control_panel::{
    Control, ControlChange, ControlError, ControlKind, ControlPanel, ControlValue, ParamId,
};
