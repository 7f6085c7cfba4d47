use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use spark_folio::config::FolioConfig;
use spark_folio::tiles::TileSize;
use spark_folio::{logging, pipeline};

#[derive(Parser)]
#[command(name = "spark-folio", about = "Animated portfolio page for the terminal")]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, default_value = "spark-folio.toml")]
    config: PathBuf,

    /// Tile size override: sm, md or lg
    #[arg(long)]
    tile_size: Option<TileSize>,

    /// Directory for spark-folio.log (defaults to the system temp dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Disable the light rays background
    #[arg(long)]
    no_rays: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The terminal is restored before any error reaches here
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("spark-folio: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> spark_folio::Result<()> {
    let log_dir = cli.log_dir.unwrap_or_else(logging::default_log_dir);
    let _guard = logging::init(&log_dir)?;

    let mut config = FolioConfig::load(&cli.config)?;
    if let Some(size) = cli.tile_size {
        config.tiles.size = size;
    }
    if cli.no_rays {
        config.rays.enabled = false;
    }

    info!(
        config = %cli.config.display(),
        log = %logging::log_file(&log_dir).display(),
        "starting spark-folio"
    );

    let result = pipeline::run(config);
    match &result {
        Ok(()) => info!("spark-folio exited"),
        Err(err) => error!(%err, "spark-folio failed"),
    }
    result
}
