use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use investsim::cli::{Cli, run};

#[tokio::main]
async fn main() {
    // Respects RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
