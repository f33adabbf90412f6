use clap::Parser;
use uhi_explorer::utils::{logger, validation::Validate};
use uhi_explorer::{CliConfig, HttpSurface, MapConfig, MapController};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting uhi-explorer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match MapConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Could not load '{}': {}", cli.config, e);
            eprintln!("❌ Could not load '{}': {}", cli.config, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let surface = HttpSurface::new(&cli.bridge_url)?;
    let events = surface.clone();
    let mut controller = MapController::new(surface, config);

    controller.initialize().await?;
    tracing::info!("📡 Listening for bridge events at {}", cli.bridge_url);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            polled = events.poll_events() => {
                match polled {
                    Ok(batch) => {
                        for envelope in batch {
                            if let Err(e) = controller.handle(envelope.event).await {
                                // nothing in this loop is fatal; the worst
                                // outcome is a visually stale map
                                tracing::error!("❌ Event handling failed: {}", e);
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("❌ Bridge poll failed: {}", e);
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
            }
        }
    }

    Ok(())
}
