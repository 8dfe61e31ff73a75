//! Build command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{fail, load_context, EXIT_SUCCESS};
use crate::build::BuildPipeline;
use crate::error::ShipError;
use crate::watch::{watch_and_rebuild, WatchError};

/// Run the build command
pub fn run_build(
    out: Option<&Path>,
    src: Option<&Path>,
    tag: Option<String>,
    targets: Vec<String>,
    watch: bool,
    dry_run: bool,
    verbose: bool,
) -> ExitCode {
    let mut context = match load_context(out, src, verbose) {
        Ok(ctx) => ctx.with_tag(tag),
        Err(e) => return fail("Error loading config", &e),
    };
    if !targets.is_empty() {
        context = context.with_filter(targets);
    }

    if watch {
        println!("Starting watch mode...");
        println!("Press Ctrl+C to stop");
        println!();

        return match watch_and_rebuild(context) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e @ WatchError::SourceNotFound(_)) => {
                fail("Watch error", &ShipError::config(e.to_string()))
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                ExitCode::from(crate::error::ErrorKind::Io.exit_code())
            }
        };
    }

    if dry_run {
        println!("Dry run - would build:");
        println!("  Source: {}", context.src_dir().display());
        println!("  Output: {}", context.out_dir().display());
    } else {
        println!("Building...");
    }

    match BuildPipeline::new(context).with_dry_run(dry_run).build() {
        Ok(result) => {
            println!("{}", result.summary());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail("Build failed", &e),
    }
}
