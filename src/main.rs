// Entrypoint for the importer.
// - Keeps `main` small: set up logging, parse flags and hand them to the UI.
// - Returns `anyhow::Result` so input errors abort with their context chain.

use clap::Parser;
use ise_guest_import::{config::Cli, ui::run};

fn init_tracing() {
    // Logs go to stderr; stdout carries the operator-facing report.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Blocks until every payload has been sent (or printed on --dry-run).
    run(cli)?;
    Ok(())
}
