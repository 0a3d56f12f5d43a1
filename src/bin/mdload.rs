use anyhow::Result;
use clap::Parser;
use mdload::cli::{self, Cli};
use mdload::config::Config;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let summary = cli::run(&cli, &config).await?;

    println!("Done. {}", summary);
    Ok(())
}

// Warnings and errors go to stderr, everything else to stdout.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mdload=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .without_time()
        .init();
}
