use anyhow::Context;
use clap::{Parser, Subcommand};
use showmap::{logging, server, Config, Pipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "showmap")]
#[command(about = "Songkick concerts with Spotify embeds, as GeoJSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config (defaults to SHOWMAP_CONFIG or ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once and print the FeatureCollection
    Fetch {
        /// Metro area to query instead of the configured one
        #[arg(long)]
        metro_area: Option<u64>,
        /// Write the collection to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the FeatureCollection over HTTP
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    let _log_guard = logging::init_logging();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let pipeline = Pipeline::from_config(&config)?;

    match cli.command {
        Commands::Fetch { metro_area, output } => {
            let metro_area_id = metro_area.unwrap_or(config.songkick.metro_area_id);
            let collection = pipeline.run_for_metro_area(metro_area_id).await?;
            let json = serde_json::to_string_pretty(&collection)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Wrote {} features to {}", collection.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            server::start_server(Arc::new(pipeline), port).await?;
        }
    }

    Ok(())
}
