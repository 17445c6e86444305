use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use modloader_install::{init_logging, prepare, AppState};

/// Finish a Forge or Fabric install and print its launch descriptor
#[derive(Parser)]
#[command(name = "modloader-install")]
#[command(version)]
struct Cli {
    /// Loader identifier, e.g. `forge-1.16.5-36.2.0` or `fabric-loader-0.16.10-1.21.1`
    loader_id: String,

    /// Settings file (defaults to `installer_settings.json` in the data dir)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Launcher data directory holding `libraries/`, `versions/` and `installers/`
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let state = AppState::load(cli.data_dir, cli.settings.as_deref());

    let descriptor = match prepare(&state, &cli.loader_id).await {
        Ok(descriptor) => descriptor,
        Err(e) => {
            error!("Installation of {} failed: {}", cli.loader_id, e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&descriptor) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize descriptor: {}", e);
            std::process::exit(1);
        }
    }
}
