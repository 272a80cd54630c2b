//! xtask - developer tasks for walk_the_dog.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;
mod env_file;
mod error;
mod version;

fn main() -> Result<()> {
    // The env file may set RUST_LOG and flag defaults, so merge it first.
    let env_file = env_file::path_from_args(std::env::args_os().skip(1));
    let loaded = env_file::apply(&env_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(path = %env_file.display(), loaded, "environment ready");

    let cli = cli::Cli::parse();
    let code = cli.run()?;
    std::process::exit(code);
}
