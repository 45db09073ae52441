//! # Playground application
//!
//! [`PlaygroundApp`] owns every piece of playground state and is driven from
//! outside by timestamps: [`PlaygroundApp::pump`] runs the timer tasks that
//! came due and then the frame tick if one was requested.
//!
//! ## Frame tick order
//!
//! 1. frame timer
//! 2. turret orbit (when rotating)
//! 3. fixed-step physics, then the collision events of those steps
//! 4. body poses copied onto their meshes
//! 5. orbit-control damping
//! 6. one render call
//! 7. next frame requested

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::audio::{create_cue, AudioCue, AudioError, ImpactSound};
use crate::config::{Config, ConfigError};
use crate::core::config::{PlaygroundConfig, Variant};
use crate::foundation::math::Vec3;
use crate::foundation::time::{FixedTimestep, Timer};
use crate::objects::{
    random_box_request, random_launch_force, random_sphere_request, ManagedObject, ObjectRegistry, SpawnError,
    SpawnRequest, Spawner,
};
use crate::physics::{CollisionEvents, PhysicsError, PhysicsWorld, RapierWorld};
use crate::scene::{Camera, FrameStats, HeadlessRenderer, OrbitControls, RenderError, RenderScene, Renderer};
use crate::scenery::Scenery;
use crate::scheduler::{Scheduler, TaskScheduler};
use crate::turret::{FireControl, Turret, TurretParams};
use crate::ui::{ControlChange, ControlError, ControlPanel, ControlValue, ParamId};

/// Playground errors
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Physics world error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Spawning failed
    #[error("Spawn error: {0}")]
    Spawn(#[from] SpawnError),

    /// Audio could not be set up
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A control interaction was rejected
    #[error("Control error: {0}")]
    Control(#[from] ControlError),
}

/// Work the scheduler hands back to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Drop a sphere at the configured sphere drop point
    SpawnSphere,
    /// Drop a box at the configured box drop point
    SpawnBox,
    /// One shot of the repeating turret fire
    TurretFire,
}

/// The playground
pub struct PlaygroundApp<W: PhysicsWorld = RapierWorld, R: Renderer = HeadlessRenderer> {
    config: PlaygroundConfig,
    world: W,
    renderer: R,
    scene: RenderScene,
    camera: Camera,
    orbit_controls: OrbitControls,
    collisions: CollisionEvents,
    registry: ObjectRegistry,
    spawner: Spawner,
    scenery: Scenery,
    impact_sound: ImpactSound,
    audio: Box<dyn AudioCue>,
    scheduler: Scheduler<Task>,
    timer: Timer,
    fixed_step: FixedTimestep,
    rng: StdRng,
    turret: Option<Turret>,
    fire: FireControl<Task>,
    panel: ControlPanel,
    last_frame: Option<FrameStats>,
}

/// Pixel ratios above this are rendered at this ratio
pub const MAX_PIXEL_RATIO: f32 = 2.0;

impl PlaygroundApp {
    /// Playground on rapier with the headless renderer and the configured audio cue
    pub fn new(config: PlaygroundConfig) -> Result<Self, PlaygroundError> {
        config.validate()?;
        let world = RapierWorld::from_config(&config.physics);
        let display = &config.display;
        let renderer = HeadlessRenderer::new(
            display.width,
            display.height,
            display.device_pixel_ratio.min(MAX_PIXEL_RATIO),
        )?;
        let audio = create_cue(&config.audio)?;
        Self::with_parts(config, world, renderer, audio)
    }
}

impl<W: PhysicsWorld, R: Renderer> PlaygroundApp<W, R> {
    /// Playground on caller-provided collaborators
    pub fn with_parts(
        config: PlaygroundConfig,
        mut world: W,
        renderer: R,
        audio: Box<dyn AudioCue>,
    ) -> Result<Self, PlaygroundError> {
        config.validate()?;

        let mut scene = RenderScene::new();
        let scenery = Scenery::build(&mut world, &mut scene, &config.pool)?;
        let spawner = Spawner::new(&mut scene, &config.physics);

        let display = &config.display;
        let camera_config = &config.camera;
        #[allow(clippy::cast_precision_loss)]
        let aspect = display.width as f32 / display.height as f32;
        let camera = Camera::perspective(
            Vec3::from(camera_config.position),
            camera_config.fov_degrees,
            aspect,
            camera_config.near,
            camera_config.far,
        );
        let orbit_controls = OrbitControls::new(Vec3::zeros(), camera_config.damping_factor);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let params = TurretParams::from_config(&config.turret);
        let fire = FireControl::new(params.shooting_interval, Task::TurretFire);
        let (turret, panel) = match config.variant {
            Variant::Basic => (None, ControlPanel::basic()?),
            Variant::Turret => {
                let panel = ControlPanel::turret(&params)?;
                (Some(Turret::new(params, &mut scene)), panel)
            }
        };

        let mut app = Self {
            collisions: CollisionEvents::new(config.physics.collision_queue_capacity),
            impact_sound: ImpactSound::from_config(&config.audio),
            fixed_step: FixedTimestep::new(config.physics.fixed_step, config.physics.max_sub_steps),
            config,
            world,
            renderer,
            scene,
            camera,
            orbit_controls,
            registry: ObjectRegistry::new(),
            spawner,
            scenery,
            audio,
            scheduler: Scheduler::new(),
            timer: Timer::new(),
            rng,
            turret,
            fire,
            panel,
            last_frame: None,
        };

        match app.config.variant {
            Variant::Basic => app.schedule_spawn_on_load(),
            Variant::Turret => {
                if app.turret.as_ref().is_some_and(|turret| turret.params.shooting_enabled) {
                    app.fire.enable(&mut app.scheduler);
                }
            }
        }
        app.scheduler.request_next_frame();

        log::info!("Physics playground started ({:?} variant)", app.config.variant);
        Ok(app)
    }

    fn schedule_spawn_on_load(&mut self) {
        let interval = Duration::from_millis(self.config.spawn.on_load_interval_ms);
        for i in 0..self.config.spawn.on_load_count {
            let delay = interval * i;
            self.scheduler.schedule_once(delay, Task::SpawnSphere);
            self.scheduler.schedule_once(delay, Task::SpawnBox);
        }
    }

    /// Run due timer tasks, then the frame tick if one is pending
    pub fn pump(&mut self, now: Duration) -> Result<Option<FrameStats>, PlaygroundError> {
        for task in self.scheduler.advance_to(now) {
            self.run_task(task)?;
        }

        if self.scheduler.take_frame_request() {
            self.tick(now).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Execute one scheduled task
    pub fn run_task(&mut self, task: Task) -> Result<(), PlaygroundError> {
        match task {
            Task::SpawnSphere => {
                let radius = self.rng.gen::<f32>() + 0.25;
                let position = Vec3::from(self.config.spawn.sphere_drop_point);
                self.spawn_launched(SpawnRequest::sphere(radius, position))?;
            }
            Task::SpawnBox => {
                let size = self.rng.gen::<f32>() + 0.5;
                let position = Vec3::from(self.config.spawn.box_drop_point);
                self.spawn_launched(SpawnRequest::cube(size, position))?;
            }
            Task::TurretFire => {
                if self.turret.as_ref().is_some_and(|turret| turret.params.shooting_enabled) {
                    self.fire_projectile()?;
                }
            }
        }
        Ok(())
    }

    /// One frame
    pub fn tick(&mut self, now: Duration) -> Result<FrameStats, PlaygroundError> {
        self.timer.update(now);
        let delta = self.timer.delta_time();

        if let Some(turret) = self.turret.as_mut() {
            turret.update(delta, &mut self.scene);
        }

        let sub_steps = self.fixed_step.advance(delta);
        for _ in 0..sub_steps {
            let impacts = self.world.step(self.fixed_step.step());
            self.collisions.post(impacts);
        }
        self.play_impact_sounds();

        self.sync_poses();

        self.orbit_controls.update(&mut self.camera);

        let stats = self.renderer.render(&self.scene, &self.camera)?;
        self.last_frame = Some(stats);
        log::trace!(
            "Tick {}: dt {:.4}s, {} sub-steps, {} objects",
            self.timer.frame_count(),
            delta,
            sub_steps,
            self.registry.len()
        );

        self.scheduler.request_next_frame();
        Ok(stats)
    }

    fn play_impact_sounds(&mut self) {
        for event in self.collisions.drain() {
            let Some(volume) = self.impact_sound.volume_for(event.impact_velocity) else {
                continue;
            };
            if let Err(e) = self.audio.play(volume) {
                log::warn!("Impact sound failed: {}", e);
            }
        }
    }

    fn sync_poses(&mut self) {
        for object in self.registry.iter() {
            let (Some(pose), Some(mesh)) = (self.world.body_pose(object.body), self.scene.mesh_mut(object.mesh)) else {
                continue;
            };
            mesh.transform.position = pose.position;
            mesh.transform.rotation = pose.rotation;
        }
    }

    /// React to a control panel change
    pub fn apply_control(&mut self, change: ControlChange) -> Result<(), PlaygroundError> {
        match (change.param, change.value) {
            (ParamId::GenerateSphere, ControlValue::Trigger) => {
                let request = random_sphere_request(&mut self.rng, &self.config.spawn);
                self.spawn_launched(request)?;
            }
            (ParamId::GenerateBox, ControlValue::Trigger) => {
                let request = random_box_request(&mut self.rng, &self.config.spawn);
                self.spawn_launched(request)?;
            }
            (ParamId::Reset, ControlValue::Trigger) => self.reset(),
            (ParamId::Fire, ControlValue::Trigger) => {
                if self.turret.is_some() {
                    self.fire_projectile()?;
                }
            }
            (ParamId::ShootingEnabled, ControlValue::Toggle(enabled)) => {
                if let Some(turret) = self.turret.as_mut() {
                    turret.params.shooting_enabled = enabled;
                    if enabled {
                        self.fire.enable(&mut self.scheduler);
                    } else {
                        self.fire.disable(&mut self.scheduler);
                    }
                }
            }
            (ParamId::RotationEnabled, ControlValue::Toggle(enabled)) => {
                if let Some(turret) = self.turret.as_mut() {
                    turret.params.rotation_enabled = enabled;
                }
            }
            (ParamId::ShootingInterval, ControlValue::Number(millis)) => {
                let interval = Duration::try_from_secs_f32(millis.max(0.0) / 1000.0)
                    .ok()
                    .filter(|_| millis.is_finite())
                    .ok_or_else(|| ControlError::NotANumber(format!("{:?}", ParamId::ShootingInterval)))?;
                if let Some(turret) = self.turret.as_mut() {
                    turret.params.shooting_interval = interval;
                    self.fire.set_interval(&mut self.scheduler, interval);
                }
            }
            (param, ControlValue::Number(value)) => {
                let set: fn(&mut TurretParams, f32) = match param {
                    ParamId::Altitude => |params, value| params.altitude = value,
                    ParamId::HorizontalOrientation => |params, value| params.horizontal_orientation = value,
                    ParamId::VerticalOrientation => |params, value| params.vertical_orientation = value,
                    ParamId::OrbitRadius => |params, value| params.orbit_radius = value,
                    ParamId::OrbitSpeed => |params, value| params.orbit_speed = value,
                    ParamId::ShootingPower => |params, value| params.shooting_power = value,
                    _ => return Err(mismatch(param, "trigger or toggle")),
                };
                if let Some(turret) = self.turret.as_mut() {
                    set(&mut turret.params, value);
                    turret.sync_mesh(&mut self.scene);
                }
            }
            (param, ControlValue::Trigger) => return Err(mismatch(param, "number or toggle")),
            (param, ControlValue::Toggle(_)) => return Err(mismatch(param, "trigger or number")),
        }
        Ok(())
    }

    /// Apply every change the panel queued since the last call
    pub fn apply_panel_changes(&mut self) -> Result<(), PlaygroundError> {
        for change in self.panel.drain_changes() {
            self.apply_control(change)?;
        }
        Ok(())
    }

    /// Press a panel button and apply the result
    pub fn press(&mut self, name: &str) -> Result<(), PlaygroundError> {
        self.panel.press(name)?;
        self.apply_panel_changes()
    }

    /// Set a numeric panel control and apply the result
    pub fn set_number(&mut self, name: &str, value: f32) -> Result<(), PlaygroundError> {
        self.panel.set_number(name, value)?;
        self.apply_panel_changes()
    }

    /// Set a panel checkbox and apply the result
    pub fn set_toggle(&mut self, name: &str, value: bool) -> Result<(), PlaygroundError> {
        self.panel.set_toggle(name, value)?;
        self.apply_panel_changes()
    }

    /// Spawn with the basic playground's random launch force
    fn spawn_launched(&mut self, request: SpawnRequest) -> Result<ManagedObject, SpawnError> {
        let force = random_launch_force(&mut self.rng, request.shape, &self.config.spawn);
        self.spawn(request.with_force(force))
    }

    /// Spawn an object exactly as requested
    pub fn spawn(&mut self, request: SpawnRequest) -> Result<ManagedObject, SpawnError> {
        self.spawner.spawn(
            request,
            &mut self.world,
            &mut self.scene,
            &mut self.collisions,
            &mut self.registry,
        )
    }

    /// Launch one projectile from the turret; `None` without a turret
    pub fn fire_projectile(&mut self) -> Result<Option<ManagedObject>, SpawnError> {
        let Some(request) = self.turret.as_ref().map(|turret| turret.params.projectile_request()) else {
            return Ok(None);
        };
        self.spawn(request).map(Some)
    }

    /// Remove every spawned object
    pub fn reset(&mut self) {
        let count = self.registry.len();
        let failures = self.registry.remove_all(&mut self.world, &mut self.scene, &mut self.collisions);
        if failures > 0 {
            log::warn!("Reset removed {} objects, {} bodies could not be removed", count, failures);
        } else {
            log::info!("Reset removed {} objects", count);
        }
    }

    /// Viewport change: camera aspect and renderer size, pixel ratio capped at 2
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> Result<(), PlaygroundError> {
        self.renderer.set_size(width, height, device_pixel_ratio.min(MAX_PIXEL_RATIO))?;
        #[allow(clippy::cast_precision_loss)]
        self.camera.set_aspect(width as f32 / height as f32);
        Ok(())
    }

    /// Configuration the app was built from
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// Physics world
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Physics world, mutably
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render scene
    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Orbit controls, for feeding pointer input
    pub fn orbit_controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit_controls
    }

    /// Spawned objects
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Collision subscriptions and pending events
    pub fn collisions(&self) -> &CollisionEvents {
        &self.collisions
    }

    /// Static scenery handles
    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    /// Task scheduler
    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.scheduler
    }

    /// Turret, in the turret variant
    pub fn turret(&self) -> Option<&Turret> {
        self.turret.as_ref()
    }

    /// Repeating-fire control
    pub fn fire_control(&self) -> &FireControl<Task> {
        &self.fire
    }

    /// Control panel
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Stats of the last rendered frame
    pub fn last_frame(&self) -> Option<FrameStats> {
        self.last_frame
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

fn mismatch(param: ParamId, expected: &'static str) -> PlaygroundError {
    ControlError::KindMismatch { name: format!("{param:?}"), expected }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingCue;
    use crate::foundation::math::Quat;
    use crate::physics::{BodyDesc, ColliderShape};
    use approx::assert_relative_eq;

    fn config(variant: Variant) -> PlaygroundConfig {
        PlaygroundConfig {
            seed: Some(42),
            ..PlaygroundConfig::for_variant(variant)
        }
    }

    fn app(variant: Variant) -> (PlaygroundApp, RecordingCue) {
        let recorder = RecordingCue::new();
        let app = PlaygroundApp::with_parts(
            config(variant),
            RapierWorld::default(),
            HeadlessRenderer::new(1280, 720, 1.0).unwrap(),
            Box::new(recorder.clone()),
        )
        .unwrap();
        (app, recorder)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_startup_schedules_spawn_on_load() {
        let (mut app, _) = app(Variant::Basic);
        assert_eq!(app.scheduler().pending(), 24);

        let stats = app.pump(ms(0)).unwrap();
        assert!(stats.is_some());
        assert_eq!(app.registry().len(), 2);

        app.pump(ms(5500)).unwrap();
        assert_eq!(app.registry().len(), 24);
        assert_eq!(app.scheduler().pending(), 0);
    }

    #[test]
    fn test_pump_without_frame_request_only_runs_tasks() {
        let (mut app, _) = app(Variant::Basic);
        assert!(app.pump(ms(0)).unwrap().is_some());
        assert!(app.pump(ms(16)).unwrap().is_some());
        assert_eq!(app.frame_count(), 2);
    }

    #[test]
    fn test_pose_sync_before_render() {
        let (mut app, _) = app(Variant::Basic);
        let object = app.spawn(SpawnRequest::cube(1.0, Vec3::new(1.0, 2.0, 3.0))).unwrap();

        // Zero delta on the first tick: no physics step, the pose is the spawn pose
        app.tick(ms(0)).unwrap();

        let mesh = app.scene().mesh(object.mesh).unwrap();
        assert_relative_eq!(mesh.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(mesh.transform.rotation.angle_to(&Quat::identity()), 0.0);
        let drawn = app.renderer().last_queue().item_for(object.mesh).unwrap();
        assert_relative_eq!(drawn.transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_tick_caps_sub_steps() {
        let (mut app, _) = app(Variant::Basic);
        let object = app.spawn(SpawnRequest::sphere(0.5, Vec3::new(0.0, 5.0, 0.0))).unwrap();
        app.tick(ms(0)).unwrap();
        app.tick(ms(1000)).unwrap();

        // Three 1/60 s steps of free fall, not a full second
        let velocity = app.world().body_velocity(object.body).unwrap();
        assert_relative_eq!(velocity.y, -9.81 * 3.0 / 60.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset_removes_spawned_objects_only() {
        let (mut app, _) = app(Variant::Basic);
        app.press("generate_sphere").unwrap();
        app.press("generate_box").unwrap();
        assert_eq!(app.registry().len(), 2);
        assert_eq!(app.world().body_count(), 4);

        app.press("reset").unwrap();

        assert!(app.registry().is_empty());
        assert_eq!(app.world().body_count(), 2);
        assert_eq!(app.collisions().subscription_count(), 0);
        assert_eq!(app.scene().mesh_count(), 2);
    }

    #[test]
    fn test_hard_landing_plays_impact_sound() {
        let (mut app, recorder) = app(Variant::Basic);
        app.spawn(SpawnRequest::sphere(0.5, Vec3::new(0.0, 6.0, 0.0))).unwrap();

        let mut now = ms(0);
        for _ in 0..120 {
            app.tick(now).unwrap();
            now += ms(16);
        }

        let played = recorder.played();
        assert!(!played.is_empty());
        assert!(played.iter().all(|volume| *volume > 0.15 && *volume <= 1.0));
    }

    #[test]
    fn test_soft_contact_is_silent() {
        let (mut app, recorder) = app(Variant::Basic);
        app.spawn(SpawnRequest::cube(1.0, Vec3::new(0.0, 0.71, 0.0))).unwrap();

        let mut now = ms(0);
        for _ in 0..30 {
            app.tick(now).unwrap();
            now += ms(16);
        }

        assert!(recorder.played().is_empty());
    }

    #[test]
    fn test_turret_fire_toggle() {
        let (mut app, _) = app(Variant::Turret);
        assert_eq!(app.scheduler().pending(), 0);

        app.set_toggle("shooting_enabled", true).unwrap();
        app.set_toggle("shooting_enabled", true).unwrap();
        assert_eq!(app.scheduler().pending(), 1);

        app.pump(ms(0)).unwrap();
        app.pump(ms(300)).unwrap();
        app.pump(ms(600)).unwrap();
        assert_eq!(app.registry().len(), 2);

        app.set_toggle("shooting_enabled", false).unwrap();
        app.pump(ms(2000)).unwrap();
        assert_eq!(app.registry().len(), 2);
        assert!(!app.fire_control().is_firing());
    }

    #[test]
    fn test_turret_interval_change_reinstalls_schedule() {
        let (mut app, _) = app(Variant::Turret);
        app.set_toggle("shooting_enabled", true).unwrap();
        app.set_number("shooting_interval", 10.0).unwrap();

        assert_eq!(app.fire_control().interval(), ms(50));
        assert_eq!(app.scheduler().pending(), 1);
        app.pump(ms(50)).unwrap();
        assert_eq!(app.registry().len(), 1);
    }

    #[test]
    fn test_turret_orbits_during_tick() {
        let (mut app, _) = app(Variant::Turret);
        app.tick(ms(0)).unwrap();
        app.tick(ms(1000)).unwrap();

        let turret = app.turret().unwrap();
        assert_relative_eq!(turret.params.orbit_angle, 0.5, epsilon = 1e-5);
        let mesh = app.scene().mesh(turret.mesh()).unwrap();
        assert_relative_eq!(mesh.transform.position, turret.params.position(), epsilon = 1e-5);
    }

    #[test]
    fn test_single_fire_and_aim_controls() {
        let (mut app, _) = app(Variant::Turret);
        app.set_number("shooting_power", 250.0).unwrap();
        app.press("fire").unwrap();

        assert_eq!(app.turret().unwrap().params.shooting_power, 250.0);
        assert_eq!(app.registry().len(), 1);
    }

    #[test]
    fn test_resize_clamps_pixel_ratio() {
        let (mut app, _) = app(Variant::Basic);
        app.resize(800, 400, 3.0).unwrap();

        assert_relative_eq!(app.camera().aspect, 2.0);
        assert_eq!(app.renderer().drawing_buffer_size(), (1600, 800));
        assert!(matches!(app.resize(0, 400, 1.0), Err(PlaygroundError::Render(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut bad = config(Variant::Basic);
        bad.physics.max_sub_steps = 0;
        assert!(matches!(PlaygroundApp::new(bad), Err(PlaygroundError::Config(_))));
    }

    #[test]
    fn test_mismatched_change_is_rejected() {
        let (mut app, _) = app(Variant::Turret);
        let change = ControlChange { param: ParamId::Reset, value: ControlValue::Number(1.0) };
        assert!(matches!(app.apply_control(change), Err(PlaygroundError::Control(_))));
    }

    #[test]
    fn test_mismatched_toggle_and_trigger_are_rejected() {
        let (mut app, _) = app(Variant::Turret);
        let toggle = ControlChange { param: ParamId::Altitude, value: ControlValue::Toggle(true) };
        let trigger = ControlChange { param: ParamId::OrbitSpeed, value: ControlValue::Trigger };
        assert!(matches!(
            app.apply_control(toggle),
            Err(PlaygroundError::Control(ControlError::KindMismatch { .. }))
        ));
        assert!(matches!(app.apply_control(trigger), Err(PlaygroundError::Control(_))));
    }

    #[test]
    fn test_unrepresentable_shooting_interval_is_rejected() {
        let (mut app, _) = app(Variant::Turret);
        let before = app.fire_control().interval();

        for millis in [f32::INFINITY, f32::NAN, f32::MAX] {
            let change = ControlChange { param: ParamId::ShootingInterval, value: ControlValue::Number(millis) };
            assert!(matches!(
                app.apply_control(change),
                Err(PlaygroundError::Control(ControlError::NotANumber(_)))
            ));
        }
        assert_eq!(app.fire_control().interval(), before);

        let change = ControlChange { param: ParamId::ShootingInterval, value: ControlValue::Number(-5.0) };
        app.apply_control(change).unwrap();
        assert_eq!(app.fire_control().interval(), ms(50));
    }

    #[test]
    fn test_works_with_any_physics_world() {
        let (mut app, _) = app(Variant::Basic);
        let extra = app
            .world_mut()
            .add_body(&BodyDesc::dynamic(1.0, Vec3::new(0.0, 4.0, 0.0), ColliderShape::Ball { radius: 0.2 }))
            .unwrap();
        app.tick(ms(0)).unwrap();
        assert!(app.world().contains_body(extra));
        assert!(app.registry().find_by_body(extra).is_none());
    }
}
