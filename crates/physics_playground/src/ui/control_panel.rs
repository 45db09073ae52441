//! Headless debug control panel
//!
//! Controls are looked up by name, bound to a [`ParamId`], and every
//! interaction produces a [`ControlChange`] that is both returned and queued
//! for [`ControlPanel::drain_changes`]. Numeric controls clamp to their range
//! and snap to their step before the change is emitted.

use std::collections::VecDeque;

use thiserror::Error;

use crate::turret::TurretParams;

/// Parameters and actions a control can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Spawn a random sphere
    GenerateSphere,
    /// Spawn a random box
    GenerateBox,
    /// Remove every spawned object
    Reset,
    /// Launch a single projectile
    Fire,
    /// Turret height
    Altitude,
    /// Turret yaw offset
    HorizontalOrientation,
    /// Barrel elevation
    VerticalOrientation,
    /// Orbit distance
    OrbitRadius,
    /// Orbit angular speed
    OrbitSpeed,
    /// Launch force
    ShootingPower,
    /// Fire period in milliseconds
    ShootingInterval,
    /// Repeating fire on/off
    ShootingEnabled,
    /// Orbit on/off
    RotationEnabled,
}

/// Value carried by a change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    /// A button was pressed
    Trigger,
    /// New numeric value (already clamped and snapped)
    Number(f32),
    /// New toggle state
    Toggle(bool),
}

/// Emitted on every interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlChange {
    /// What changed
    pub param: ParamId,
    /// New value
    pub value: ControlValue,
}

/// Control panel errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// No control with that name
    #[error("Unknown control '{0}'")]
    UnknownControl(String),

    /// A control with that name already exists
    #[error("Control '{0}' is already registered")]
    DuplicateControl(String),

    /// The interaction does not match the control's kind
    #[error("Control '{name}' is not a {expected}")]
    KindMismatch {
        /// Control name
        name: String,
        /// Kind the interaction needs
        expected: &'static str,
    },

    /// Numeric range or step is unusable
    #[error("Control '{name}' has an invalid range [{min}, {max}] step {step}")]
    InvalidRange {
        /// Control name
        name: String,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Step
        step: f32,
    },

    /// The submitted number is NaN
    #[error("Control '{0}' received a non-numeric value")]
    NotANumber(String),
}

/// What kind of widget a control is, with its state
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Push button
    Button,
    /// Slider / number box
    Number {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Increment values snap to
        step: f32,
        /// Current value
        value: f32,
    },
    /// Checkbox
    Toggle {
        /// Current state
        value: bool,
    },
}

/// One registered control
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    /// Lookup name
    pub name: String,
    /// Label shown to the user
    pub label: String,
    /// Bound parameter
    pub param: ParamId,
    /// Kind and state
    pub kind: ControlKind,
}

/// The panel
#[derive(Debug, Default)]
pub struct ControlPanel {
    controls: Vec<Control>,
    changes: VecDeque<ControlChange>,
}

impl ControlPanel {
    /// Create an empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons of the basic playground
    pub fn basic() -> Result<Self, ControlError> {
        let mut panel = Self::new();
        panel.button("generate_sphere", "Generate Sphere", ParamId::GenerateSphere)?;
        panel.button("generate_box", "Generate Box", ParamId::GenerateBox)?;
        panel.button("reset", "Reset scene", ParamId::Reset)?;
        Ok(panel)
    }

    /// Basic buttons plus the turret controls, initialised from `params`
    pub fn turret(params: &TurretParams) -> Result<Self, ControlError> {
        use std::f32::consts::{FRAC_PI_2, PI};

        let mut panel = Self::basic()?;
        panel.number("altitude", "Altitude", ParamId::Altitude, 0.5, 10.0, 0.1, params.altitude)?;
        panel.number(
            "horizontal_orientation",
            "Horizontal orientation",
            ParamId::HorizontalOrientation,
            -PI,
            PI,
            0.01,
            params.horizontal_orientation,
        )?;
        panel.number(
            "vertical_orientation",
            "Vertical orientation",
            ParamId::VerticalOrientation,
            -FRAC_PI_2,
            FRAC_PI_2,
            0.01,
            params.vertical_orientation,
        )?;
        panel.number("orbit_radius", "Orbit radius", ParamId::OrbitRadius, 1.0, 15.0, 0.1, params.orbit_radius)?;
        panel.number("orbit_speed", "Orbit speed", ParamId::OrbitSpeed, -3.0, 3.0, 0.01, params.orbit_speed)?;
        panel.number(
            "shooting_power",
            "Shooting power",
            ParamId::ShootingPower,
            0.0,
            2000.0,
            10.0,
            params.shooting_power,
        )?;
        panel.number(
            "shooting_interval",
            "Shooting interval (ms)",
            ParamId::ShootingInterval,
            10.0,
            2000.0,
            10.0,
            params.shooting_interval.as_millis() as f32,
        )?;
        panel.toggle("shooting_enabled", "Shooting enabled", ParamId::ShootingEnabled, params.shooting_enabled)?;
        panel.toggle("rotation_enabled", "Rotation enabled", ParamId::RotationEnabled, params.rotation_enabled)?;
        panel.button("fire", "Fire", ParamId::Fire)?;
        Ok(panel)
    }

    /// Register a push button
    pub fn button(&mut self, name: &str, label: &str, param: ParamId) -> Result<(), ControlError> {
        self.register(name, label, param, ControlKind::Button)
    }

    /// Register a numeric control; `initial` is clamped and snapped
    #[allow(clippy::too_many_arguments)]
    pub fn number(
        &mut self,
        name: &str,
        label: &str,
        param: ParamId,
        min: f32,
        max: f32,
        step: f32,
        initial: f32,
    ) -> Result<(), ControlError> {
        let valid = min.is_finite() && max.is_finite() && min <= max && step.is_finite() && step > 0.0;
        if !valid {
            return Err(ControlError::InvalidRange { name: name.to_string(), min, max, step });
        }
        let value = if initial.is_nan() { min } else { snap(initial, min, max, step) };
        self.register(name, label, param, ControlKind::Number { min, max, step, value })
    }

    /// Register a checkbox
    pub fn toggle(&mut self, name: &str, label: &str, param: ParamId, initial: bool) -> Result<(), ControlError> {
        self.register(name, label, param, ControlKind::Toggle { value: initial })
    }

    fn register(&mut self, name: &str, label: &str, param: ParamId, kind: ControlKind) -> Result<(), ControlError> {
        if self.control(name).is_some() {
            return Err(ControlError::DuplicateControl(name.to_string()));
        }
        self.controls.push(Control {
            name: name.to_string(),
            label: label.to_string(),
            param,
            kind,
        });
        Ok(())
    }

    /// Press a button
    pub fn press(&mut self, name: &str) -> Result<ControlChange, ControlError> {
        let control = self.control_mut(name)?;
        if control.kind != ControlKind::Button {
            return Err(mismatch(name, "button"));
        }
        let change = ControlChange { param: control.param, value: ControlValue::Trigger };
        Ok(self.emit(change))
    }

    /// Set a numeric control
    pub fn set_number(&mut self, name: &str, value: f32) -> Result<ControlChange, ControlError> {
        if value.is_nan() {
            return Err(ControlError::NotANumber(name.to_string()));
        }
        let control = self.control_mut(name)?;
        let param = control.param;
        let ControlKind::Number { min, max, step, value: current } = &mut control.kind else {
            return Err(mismatch(name, "number"));
        };
        *current = snap(value, *min, *max, *step);
        let change = ControlChange { param, value: ControlValue::Number(*current) };
        Ok(self.emit(change))
    }

    /// Set a checkbox
    pub fn set_toggle(&mut self, name: &str, value: bool) -> Result<ControlChange, ControlError> {
        let control = self.control_mut(name)?;
        let param = control.param;
        let ControlKind::Toggle { value: current } = &mut control.kind else {
            return Err(mismatch(name, "toggle"));
        };
        *current = value;
        let change = ControlChange { param, value: ControlValue::Toggle(value) };
        Ok(self.emit(change))
    }

    /// Take every change since the last drain
    pub fn drain_changes(&mut self) -> Vec<ControlChange> {
        self.changes.drain(..).collect()
    }

    /// Look up a control
    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }

    /// Current value of a numeric control
    pub fn number_value(&self, name: &str) -> Option<f32> {
        match self.control(name)?.kind {
            ControlKind::Number { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Current state of a checkbox
    pub fn toggle_value(&self, name: &str) -> Option<bool> {
        match self.control(name)?.kind {
            ControlKind::Toggle { value } => Some(value),
            _ => None,
        }
    }

    /// All controls in registration order
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn control_mut(&mut self, name: &str) -> Result<&mut Control, ControlError> {
        self.controls
            .iter_mut()
            .find(|control| control.name == name)
            .ok_or_else(|| ControlError::UnknownControl(name.to_string()))
    }

    fn emit(&mut self, change: ControlChange) -> ControlChange {
        log::trace!("Control change: {:?}", change);
        self.changes.push_back(change);
        change
    }
}

fn mismatch(name: &str, expected: &'static str) -> ControlError {
    ControlError::KindMismatch { name: name.to_string(), expected }
}

/// Clamp to `[min, max]` and snap to the nearest step counted from `min`
fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let clamped = value.clamp(min, max);
    let snapped = min + ((clamped - min) / step).round() * step;
    snapped.clamp(min, max)
}
