//! Release command implementation

use std::process::ExitCode;

use super::{fail, load_context, EXIT_SUCCESS};
use crate::build::BuildPipeline;
use crate::release::{GitCli, Release, ReleasePlan};

/// Run the release command
pub fn run_release(tag: Option<String>, verbose: bool) -> ExitCode {
    let context = match load_context(None, None, verbose) {
        Ok(ctx) => ctx.with_tag(tag),
        Err(e) => return fail("Error loading config", &e),
    };

    let plan = ReleasePlan::from_context(&context);
    let git = GitCli::new(context.project_root());
    println!(
        "Releasing {} from '{}' onto '{}'...",
        plan.tag.as_deref().unwrap_or("<no tag>"),
        plan.source_branch,
        plan.target_branch
    );

    let build_context = context.clone();
    let mut release = Release::new(git, plan, |tag: &str| {
        let result = BuildPipeline::new(build_context.clone().with_tag(Some(tag.to_string()))).build()?;
        println!("{}", result.summary());
        Ok(())
    });

    match release.run() {
        Ok(state) => {
            println!("Release {}: {}", release.plan().tag.as_deref().unwrap_or_default(), state);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            let state = release.state();
            fail(&format!("Release halted ({})", state), &e)
        }
    }
}
