use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use roomview::{
    config::{AppConfig, CameraMode},
    RoomApp,
};

const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Render the bedroom scene in a window.
#[derive(Parser, Debug)]
#[command(name = "roomview", version, about)]
struct Cli {
    /// TOML configuration file; missing keys keep the default bedroom
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera mode, overriding the configuration file
    #[arg(long, value_enum)]
    camera: Option<CameraMode>,

    /// Disable shadow mapping
    #[arg(long)]
    no_shadows: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(mode) = cli.camera {
        config.camera.mode = mode;
    }
    if cli.no_shadows {
        config.render.shadows = false;
    }

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    info!("starting roomview ({:?} camera)", config.camera.mode);
    let app = RoomApp::new(config).context("failed to create the application")?;
    app.run().context("viewer terminated with an error")?;
    Ok(())
}
