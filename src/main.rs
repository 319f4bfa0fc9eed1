use std::{path::PathBuf, time::Duration};

use clap::{Parser, builder::TypedValueParser};
use mazegen::{
    Generator,
    app::{App, logging},
};

/// Animate perfect-maze generation in the terminal.
///
/// Options left out are asked for interactively.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Generation algorithm: dfs, kruskal, random-traversal, prim,
    /// recursive-division or wilson
    #[arg(short, long)]
    generator: Option<Generator>,

    /// Maze width in cells
    #[arg(short = 'W', long, requires = "height", value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    width: Option<usize>,

    /// Maze height in cells
    #[arg(short = 'H', long, requires = "width", value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    height: Option<usize>,

    /// Seed for reproducible mazes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds between two animation frames
    #[arg(short, long, default_value_t = 20)]
    refresh_ms: u64,

    /// Maximum log level written to the log file
    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,

    /// Directory holding the log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_dir, cli.log_level);
    tracing::info!("Starting with {:?}", cli);

    let app = App {
        refresh_time: Duration::from_millis(cli.refresh_ms),
        seed: cli.seed,
    };
    let dims = cli.width.zip(cli.height);

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout, cli.generator, dims);
    App::restore_terminal(&mut stdout)?;

    if let Err(err) = &result {
        tracing::error!("Exited with error: {}", err);
    }
    Ok(result?)
}
