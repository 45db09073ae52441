//! Basic playground demo
//!
//! Spheres and boxes rain into the pool for the first few seconds; the pool
//! then stays open for spawning through the control panel.
//!
//! Usage: `basic_demo [config.toml|config.ron]`

use physics_playground::prelude::*;

fn load_config() -> Result<PlaygroundConfig, ConfigError> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            PlaygroundConfig::load_from_file(path)?
        }
        None => PlaygroundConfig::default(),
    };
    config.variant = Variant::Basic;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    physics_playground::foundation::logging::init();

    log::info!("Starting Physics Playground (basic)");

    let config = load_config()?;
    let host = HostLoop::from_config(&config.display);
    let mut app = PlaygroundApp::new(config)?;

    match host.run(&mut app) {
        Ok(frames) => {
            log::info!("Basic demo finished after {} frames with {} objects", frames, app.registry().len());
            Ok(())
        }
        Err(e) => {
            log::error!("Basic demo failed: {}", e);
            Err(e.into())
        }
    }
}
