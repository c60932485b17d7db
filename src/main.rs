use bevy::log::LogPlugin;
use bevy::prelude::*;
use ecosystem_sim::{ConfigError, Ecosystem, EcosystemConfig, EcosystemPlugin};
use tracing_subscriber::EnvFilter;

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "ECOSYSTEM_CONFIG";

fn main() -> Result<(), ConfigError> {
    // RUST_LOG controls verbosity
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!("Loading config from {path}");
            EcosystemConfig::from_json_file(path)?
        }
        Err(_) => EcosystemConfig::default(),
    };
    let (width, height) = (config.world_width, config.world_height);
    let ecosystem = Ecosystem::new(config)?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Ecosystem Simulator".into(),
                        resolution: (width, height).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(ecosystem)
        .add_plugins(EcosystemPlugin)
        .add_systems(Startup, setup)
        .run();

    Ok(())
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());

    info!("Ecosystem simulator initialized");
    info!("Controls: Space pause/resume, R reset, Escape quit");
}
