//! Turret playground demo
//!
//! An orbiting turret fires spheres into the pool. Shooting starts switched
//! off unless the configuration enables it, so this demo turns it on.
//!
//! Usage: `turret_demo [config.toml|config.ron]`

use physics_playground::prelude::*;

fn load_config() -> Result<PlaygroundConfig, ConfigError> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            PlaygroundConfig::load_from_file(path)?
        }
        None => {
            let mut config = PlaygroundConfig::for_variant(Variant::Turret);
            config.turret.shooting_enabled = true;
            config
        }
    };
    config.variant = Variant::Turret;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    physics_playground::foundation::logging::init();

    log::info!("Starting Physics Playground (turret)");

    let config = load_config()?;
    let host = HostLoop::from_config(&config.display);
    let mut app = PlaygroundApp::new(config)?;

    match host.run(&mut app) {
        Ok(frames) => {
            log::info!("Turret demo finished after {} frames, {} projectiles in play", frames, app.registry().len());
            Ok(())
        }
        Err(e) => {
            log::error!("Turret demo failed: {}", e);
            Err(e.into())
        }
    }
}
