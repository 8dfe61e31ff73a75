//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod doc;
mod release;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::build::BuildContext;
use crate::config::loader::{
    default_config, find_config, load_config, merge_cli_overrides, project_root, CliOverrides,
};
use crate::error::{Result, ShipError};

/// Exit code for a successful command. Failures exit with
/// [`ErrorKind::exit_code`](crate::error::ErrorKind::exit_code).
pub(crate) const EXIT_SUCCESS: u8 = 0;

/// Shipwright - build and release a script library's distributable artifacts
#[derive(Parser)]
#[command(name = "ship")]
#[command(about = "Shipwright - assemble, finish and release a script library")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the distributable artifacts
    Build {
        /// Override output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Override source directory
        #[arg(long)]
        src: Option<PathBuf>,

        /// Version to stamp into banners instead of the recorded one
        #[arg(long)]
        tag: Option<String>,

        /// Only build matching targets (e.g. "script-min", "style:*")
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Watch for changes and rebuild automatically
        #[arg(short, long)]
        watch: bool,

        /// Dry run (show what would be built without building)
        #[arg(long)]
        dry_run: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Merge, bump the version, rebuild, amend and tag a release
    Release {
        /// Release tag, also written as the new version
        #[arg(long)]
        tag: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Clean the doc site and copy the customization script into it
    Doc {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI and return the exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { out, src, tag, targets, watch, dry_run, verbose } => {
            crate::logging::init(verbose);
            build::run_build(out.as_deref(), src.as_deref(), tag, targets, watch, dry_run, verbose)
        }
        Commands::Release { tag, verbose } => {
            crate::logging::init(verbose);
            release::run_release(tag, verbose)
        }
        Commands::Doc { verbose } => {
            crate::logging::init(verbose);
            doc::run_doc(verbose)
        }
    }
}

/// Load `ship.toml` (or the defaults) and build a context rooted at it.
pub(crate) fn load_context(
    out: Option<&Path>,
    src: Option<&Path>,
    verbose: bool,
) -> Result<BuildContext> {
    let cwd = std::env::current_dir().map_err(|e| ShipError::io(".", e))?;

    let (mut config, root) = match find_config() {
        Some(config_path) => {
            if verbose {
                println!("Using config: {}", config_path.display());
            }
            let config = load_config(Some(&config_path))?;
            let root = project_root(&config_path).map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
            (config, root)
        }
        None => {
            if verbose {
                println!("No ship.toml found, using defaults");
            }
            (default_config(), cwd)
        }
    };

    let overrides = CliOverrides { out: out.map(Path::to_path_buf), src: src.map(Path::to_path_buf) };
    merge_cli_overrides(&mut config, &overrides);

    Ok(BuildContext::new(config, root))
}

/// Report an error and map it to its exit code.
pub(crate) fn fail(context: &str, error: &ShipError) -> ExitCode {
    eprintln!("{}: {}", context, error);
    ExitCode::from(error.kind().exit_code())
}
