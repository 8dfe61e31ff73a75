//! Build pipeline orchestration.
//!
//! The pipeline discovers sources, plans the artifact targets, produces every
//! artifact in memory in dependency order, and only then writes the final
//! file set. A failure at any stage leaves the output directory untouched.

use crate::build::{
    assemble_module, write_artifacts, Artifact, BuildContext, BuildPlan, BuildResult,
    BuildStatus, BuildTarget, SourceSet, TargetKind, TargetResult,
};
use crate::error::{Result, ShipError};
use crate::finish::{compile_scss, minify_css, minify_script, prefix_css, prepend_banner, Banner};
use crate::version::VersionRecord;
use std::collections::HashMap;
use std::time::Instant;

/// Create the build plan for a context.
///
/// The script targets are always planned; stylesheet targets only when the
/// context has a stylesheet (configured, or the conventional entry on disk).
pub fn create_build_plan(ctx: &BuildContext, sources: &SourceSet) -> BuildPlan {
    let mut plan = BuildPlan::new();
    let name = &ctx.config().project.name;
    let out_dir = ctx.out_dir();
    let output = |kind: TargetKind| out_dir.join(kind.file_name(name));

    let mut script_sources = vec![ctx.wrapper_path()];
    script_sources.extend(sources.all_paths());
    plan.add_target(BuildTarget::script(name.clone(), script_sources, output(TargetKind::Script)));
    plan.add_target(BuildTarget::minified_script(name.clone(), output(TargetKind::MinifiedScript)));

    if let Some(styles) = ctx.styles() {
        let entry = ctx.src_dir().join(&styles.entry);
        plan.add_target(BuildTarget::stylesheet(name.clone(), entry, output(TargetKind::Stylesheet)));
        plan.add_target(BuildTarget::minified_stylesheet(
            name.clone(),
            output(TargetKind::MinifiedStylesheet),
        ));
    }

    plan
}

/// Version stamped into banners.
///
/// The release tag wins, then the version record, then `project.version`.
pub fn resolve_version(ctx: &BuildContext) -> Result<String> {
    if let Some(tag) = ctx.tag() {
        return Ok(tag.to_string());
    }

    let path = ctx.version_file();
    if path.is_file() {
        if let Some(version) = VersionRecord::load(&path)?.version() {
            return Ok(version.to_string());
        }
    }

    Ok(ctx.config().project.version.clone())
}

/// Everything a build produced, before it is written.
#[derive(Debug)]
pub struct Production {
    /// Banner-stamped artifacts of the requested targets, in build order
    pub artifacts: Vec<Artifact>,
    /// Per-target results, outputs not yet filled in
    pub result: BuildResult,
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    context: BuildContext,
    /// Whether to do a dry run (plan only, nothing is read or written)
    dry_run: bool,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    pub fn new(context: BuildContext) -> Self {
        Self { context, dry_run: false }
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Plan the build: discover sources and apply the target filter.
    pub fn plan(&self) -> Result<(SourceSet, BuildPlan)> {
        let sources = SourceSet::discover(&self.context)?;
        let plan = create_build_plan(&self.context, &sources);
        let plan = match self.context.target_filter() {
            Some(filter) => plan.filter(filter),
            None => plan,
        };

        if plan.is_empty() {
            return Err(ShipError::config("no build target matches the requested filter"));
        }
        Ok((sources, plan))
    }

    /// Run the build pipeline and write the artifacts.
    pub fn build(&self) -> Result<BuildResult> {
        let start = Instant::now();

        if self.dry_run {
            let (_, plan) = self.plan()?;
            let mut result = BuildResult::new();
            result.version = resolve_version(&self.context)?;
            for target in plan.build_order()? {
                if !target.intermediate {
                    result.add_result(TargetResult::planned(target.id.clone(), target.output.clone()));
                }
            }
            return Ok(result.with_duration(start.elapsed()));
        }

        let Production { artifacts, mut result } = self.produce()?;

        let written = write_artifacts(&self.context.out_dir(), &artifacts)?;
        let mut written = written.into_iter();
        for target in result.targets.iter_mut() {
            if target.status == BuildStatus::Built {
                target.outputs.extend(written.next());
            }
        }

        Ok(result.with_duration(start.elapsed()))
    }

    /// Produce every planned artifact in memory.
    pub fn produce(&self) -> Result<Production> {
        let (sources, plan) = self.plan()?;
        let ordered = plan.build_order()?;

        tracing::debug!(
            targets = ?ordered.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            "build plan"
        );

        let config = self.context.config();
        let version = resolve_version(&self.context)?;
        let banner = Banner::render(&config.banner.template, config.project.display_title(), &version);

        let mut contents: HashMap<&str, String> = HashMap::new();
        let mut artifacts = Vec::new();
        let mut result = BuildResult::new();
        result.version = version;

        for target in ordered {
            let start = Instant::now();
            tracing::debug!(target = %target.id, "building");

            let (content, warnings) = self.produce_target(target, &sources, &contents)?;
            let duration = start.elapsed();

            if target.intermediate {
                result.add_result(TargetResult::intermediate(target.id.clone(), duration));
            } else {
                artifacts.push(Artifact::new(
                    target.kind.file_name(&target.name),
                    prepend_banner(&banner, &content),
                    target.kind.content_type(),
                ));
                result.add_result(
                    TargetResult::built(target.id.clone(), vec![], duration).with_warnings(warnings),
                );
            }

            tracing::debug!(target = %target.id, ?duration, bytes = content.len(), "built");
            contents.insert(target.id.as_str(), content);
        }

        Ok(Production { artifacts, result })
    }

    /// Produce the unbannered content of one target.
    fn produce_target(
        &self,
        target: &BuildTarget,
        sources: &SourceSet,
        contents: &HashMap<&str, String>,
    ) -> Result<(String, Vec<String>)> {
        match target.kind {
            TargetKind::Script => {
                let module = assemble_module(&self.context, sources)?;
                let warnings = module
                    .embedding
                    .registry
                    .duplicates()
                    .iter()
                    .map(|key| format!("icon '{}' is registered more than once", key))
                    .collect();
                Ok((module.wrapped, warnings))
            }
            TargetKind::MinifiedScript => {
                Ok((minify_script(dependency_content(target, contents)?)?, vec![]))
            }
            TargetKind::Stylesheet => {
                let entry = target.sources.first().ok_or_else(|| {
                    ShipError::config(format!("target '{}' has no stylesheet entry", target.id))
                })?;
                let browsers = self.context.styles().map(|s| s.browsers).unwrap_or_default();
                let compiled = compile_scss(entry)?;
                Ok((prefix_css(&compiled, &browsers)?, vec![]))
            }
            TargetKind::MinifiedStylesheet => {
                Ok((minify_css(dependency_content(target, contents)?)?, vec![]))
            }
        }
    }
}

fn dependency_content<'a>(target: &BuildTarget, contents: &'a HashMap<&str, String>) -> Result<&'a str> {
    target
        .dependencies
        .first()
        .and_then(|id| contents.get(id.as_str()))
        .map(String::as_str)
        .ok_or_else(|| ShipError::config(format!("target '{}' was built before its source", target.id)))
}
