//! `build-core`: package the web crate with wasm-pack.

use std::path::PathBuf;
use std::process::Command;

use clap::Args;
use tracing::{info, warn};

use crate::error::{XtaskError, XtaskResult};
use crate::version;

/// Env var carrying the derived version into the build.
pub const BUILD_VERSION_ENV: &str = "WALK_BUILD_VERSION";

/// Arguments for the build-core command.
#[derive(Debug, Clone, Args)]
pub struct BuildCoreArgs {
    /// Crate to package
    #[arg(long, env = "WALK_CORE_DIR", default_value = "crates/walk_web")]
    pub crate_dir: PathBuf,

    /// wasm-pack target (web, bundler, nodejs, no-modules)
    #[arg(long, env = "WALK_BUILD_TARGET", default_value = "web")]
    pub target: String,

    /// Output directory, relative to the crate
    #[arg(long, env = "WALK_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Build without optimizations
    #[arg(long)]
    pub dev: bool,

    /// Packaging tool to invoke
    #[arg(long, env = "WASM_PACK", default_value = "wasm-pack")]
    pub tool: String,
}

impl BuildCoreArgs {
    /// Build the packaging command without running it.
    pub fn command(&self, version: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.arg("build")
            .arg(&self.crate_dir)
            .arg("--target")
            .arg(&self.target);

        if self.dev {
            cmd.arg("--dev");
        }
        if let Some(out_dir) = &self.out_dir {
            cmd.arg("--out-dir").arg(out_dir);
        }

        // Everything after `--` goes to cargo.
        cmd.args(["--", "--features", "web"]);

        if let Some(version) = version {
            cmd.env(BUILD_VERSION_ENV, version);
        }
        cmd
    }
}

/// Run the packaging tool and return its exit code.
pub fn run(args: &BuildCoreArgs) -> XtaskResult<i32> {
    let version = match version::describe(&args.crate_dir) {
        Ok(v) => Some(v.dirty),
        Err(err) => {
            warn!(%err, "building without a version");
            None
        }
    };

    let mut cmd = args.command(version.as_deref());
    info!(
        tool = %args.tool,
        crate_dir = %args.crate_dir.display(),
        target = %args.target,
        version = version.as_deref().unwrap_or("unknown"),
        "packaging"
    );

    let status = cmd.status().map_err(|source| XtaskError::Spawn {
        tool: args.tool.clone(),
        source,
    })?;

    // Killed by a signal: report a generic failure.
    Ok(status.code().unwrap_or(1))
}
