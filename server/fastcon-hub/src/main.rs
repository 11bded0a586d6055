use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fastcon_controller::LogAdvertiser;
use fastcon_platform::{validate_config, Engine, EngineConfig};

/// Fastcon hub: validates a configuration document, wires controllers and
/// lights, and drives the broadcast duty cycle.
#[derive(Parser, Debug)]
#[command(name = "fastcon-hub")]
#[command(about = "Fastcon BLE light hub")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "fastcon-hub.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("starting Fastcon hub");
    info!(version = env!("CARGO_PKG_VERSION"), config = %args.config, "build info");

    let source = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read configuration file {}", args.config))?;
    let config = EngineConfig::from_yaml(&source).context("configuration is not valid YAML")?;
    let validated = validate_config(&config).context("configuration rejected")?;

    // No radio transport is wired up yet; broadcast frames are logged.
    let engine = Engine::wire(&validated, Arc::new(LogAdvertiser))
        .await
        .context("failed to wire engine")?;

    for light in engine.lights().await {
        info!(id = light.id(), name = light.name(), light_id = light.light_id(), "light ready");
    }

    // Apply each light's boot state so the mesh reflects the configuration
    // as soon as the duty cycle starts draining the queue.
    for light in &validated.lights {
        let entity = engine.registry().get_light(&light.id).await?;
        entity.write_state(&light.initial_state()).await?;
    }

    for controller in engine.controllers().await {
        tokio::spawn(async move { controller.run().await });
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutting down");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
