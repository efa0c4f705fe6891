//! Loadbrake - Entry Point

use clap::Parser;

/// Command line interface for loadbrake
#[derive(Parser, Debug)]
#[command(name = "loadbrake")]
#[command(about = "Adaptive load-aware circuit breaker for a detection engine")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Run a single cycle, print the report and exit
    #[arg(long)]
    pub once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    loadbrake::run(cli.config.as_deref(), cli.once).await
}
