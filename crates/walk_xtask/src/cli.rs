//! CLI definition.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::build::{self, BuildCoreArgs};
use crate::env_file::DEFAULT_ENV_FILE;
use crate::version;

/// Developer tasks for walk_the_dog.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(version, about, long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    /// Env file merged into the environment before anything else (missing is fine)
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the available commands
    Help,

    /// Print the version derived from git tags
    Version(VersionArgs),

    /// Package the web crate with wasm-pack
    BuildCore(BuildCoreArgs),
}

/// Arguments for the version command.
#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Runs the CLI command and returns the process exit code.
    pub fn run(self) -> Result<i32> {
        match self.command.unwrap_or(Commands::Help) {
            Commands::Help => {
                Cli::command().print_help()?;
                Ok(0)
            }
            Commands::Version(args) => {
                let version = version::describe(&std::env::current_dir()?)?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&version)?);
                } else {
                    println!("dirty: {}", version.dirty);
                    println!("abbreviated: {}", version.abbreviated);
                }
                Ok(0)
            }
            Commands::BuildCore(args) => build::run(&args)
                .with_context(|| format!("build-core with {}", args.tool)),
        }
    }
}
