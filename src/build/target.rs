//! Build target definitions.
//!
//! A build target is one distributable artifact. Derived artifacts (the
//! minified script, the minified stylesheet) depend on the target whose
//! unbannered content they transform.

use crate::build::ContentType;
use std::collections::HashSet;
use std::path::PathBuf;

/// Type of build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Wrapped, unminified module
    Script,
    /// Minified module
    MinifiedScript,
    /// Compiled and prefixed stylesheet
    Stylesheet,
    /// Minified stylesheet
    MinifiedStylesheet,
}

impl TargetKind {
    /// Content type of the artifact this kind produces.
    pub fn content_type(self) -> ContentType {
        match self {
            TargetKind::Script | TargetKind::MinifiedScript => ContentType::Script,
            TargetKind::Stylesheet | TargetKind::MinifiedStylesheet => ContentType::Stylesheet,
        }
    }

    /// Artifact file name for a project name, e.g. `viewer.min.js`.
    pub fn file_name(self, name: &str) -> String {
        match self {
            TargetKind::Script => format!("{}.js", name),
            TargetKind::MinifiedScript => format!("{}.min.js", name),
            TargetKind::Stylesheet => format!("{}.css", name),
            TargetKind::MinifiedStylesheet => format!("{}.min.css", name),
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Script => write!(f, "script"),
            TargetKind::MinifiedScript => write!(f, "script-min"),
            TargetKind::Stylesheet => write!(f, "style"),
            TargetKind::MinifiedStylesheet => write!(f, "style-min"),
        }
    }
}

/// A build target representing work to be done.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    /// Unique identifier for this target (e.g., "script-min:viewer")
    pub id: String,
    /// What kind of target this is
    pub kind: TargetKind,
    /// Project name the artifact is named after
    pub name: String,
    /// Source files that contribute to this target
    pub sources: Vec<PathBuf>,
    /// Output path for this target
    pub output: PathBuf,
    /// Dependencies (other target IDs that must be built first)
    pub dependencies: Vec<String>,
    /// Built in memory only, because a requested target depends on it
    pub intermediate: bool,
}

impl BuildTarget {
    fn new(kind: TargetKind, name: String, sources: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            id: target_id(kind, &name),
            kind,
            name,
            sources,
            output,
            dependencies: vec![],
            intermediate: false,
        }
    }

    /// Create the wrapped module target.
    pub fn script(name: String, sources: Vec<PathBuf>, output: PathBuf) -> Self {
        Self::new(TargetKind::Script, name, sources, output)
    }

    /// Create the minified module target, derived from the script target.
    pub fn minified_script(name: String, output: PathBuf) -> Self {
        let dep = target_id(TargetKind::Script, &name);
        Self::new(TargetKind::MinifiedScript, name, vec![], output).with_dependency(dep)
    }

    /// Create the stylesheet target compiled from an SCSS entry.
    pub fn stylesheet(name: String, entry: PathBuf, output: PathBuf) -> Self {
        Self::new(TargetKind::Stylesheet, name, vec![entry], output)
    }

    /// Create the minified stylesheet target, derived from the stylesheet target.
    pub fn minified_stylesheet(name: String, output: PathBuf) -> Self {
        let dep = target_id(TargetKind::Stylesheet, &name);
        Self::new(TargetKind::MinifiedStylesheet, name, vec![], output).with_dependency(dep)
    }

    /// Add a dependency to this target.
    pub fn with_dependency(mut self, dep: String) -> Self {
        self.dependencies.push(dep);
        self
    }

    /// Check if this target matches a filter string.
    ///
    /// Supports patterns like:
    /// - Exact match: "script:viewer"
    /// - Kind match: "script:*" or just "script"
    /// - Name match: "*:viewer"
    pub fn matches_filter(&self, filter: &str) -> bool {
        if self.id == filter {
            return true;
        }

        if self.kind.to_string() == filter {
            return true;
        }

        if let Some((kind_pat, name_pat)) = filter.split_once(':') {
            let kind_matches = kind_pat == "*" || kind_pat == self.kind.to_string();
            let name_matches = name_pat == "*" || name_pat == self.name;
            return kind_matches && name_matches;
        }

        false
    }
}

/// Target id for a kind and project name.
pub fn target_id(kind: TargetKind, name: &str) -> String {
    format!("{}:{}", kind, name)
}

/// A collection of build targets with dependency information.
#[derive(Debug, Default)]
pub struct BuildPlan {
    targets: Vec<BuildTarget>,
}

impl BuildPlan {
    /// Create a new empty build plan.
    pub fn new() -> Self {
        Self { targets: vec![] }
    }

    /// Add a target to the plan.
    pub fn add_target(&mut self, target: BuildTarget) {
        self.targets.push(target);
    }

    /// Get all targets in the plan.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Look up a target by id.
    pub fn get(&self, id: &str) -> Option<&BuildTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Get the number of targets in the plan.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Filter targets to only those matching the given patterns.
    ///
    /// Targets a match depends on stay in the plan, marked intermediate.
    pub fn filter(mut self, patterns: &[String]) -> Self {
        if patterns.is_empty() {
            return self;
        }

        let mut required: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = self
            .targets
            .iter()
            .filter(|t| patterns.iter().any(|p| t.matches_filter(p)))
            .map(|t| t.id.clone())
            .collect();
        let requested: HashSet<String> = pending.iter().cloned().collect();

        while let Some(id) = pending.pop() {
            if !required.insert(id.clone()) {
                continue;
            }
            if let Some(target) = self.get(&id) {
                pending.extend(target.dependencies.iter().cloned());
            }
        }

        self.targets.retain(|t| required.contains(&t.id));
        for target in &mut self.targets {
            target.intermediate = !requested.contains(&target.id);
        }
        self
    }

    /// Get targets in build order (respecting dependencies).
    ///
    /// Returns targets sorted so that dependencies come before dependents.
    /// Returns an error if there are circular dependencies.
    pub fn build_order(&self) -> Result<Vec<&BuildTarget>, BuildOrderError> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut visiting = HashSet::new();

        for target in &self.targets {
            self.visit_target(target, &mut visited, &mut visiting, &mut result)?;
        }

        Ok(result)
    }

    fn visit_target<'a>(
        &'a self,
        target: &'a BuildTarget,
        visited: &mut HashSet<String>,
        visiting: &mut HashSet<String>,
        result: &mut Vec<&'a BuildTarget>,
    ) -> Result<(), BuildOrderError> {
        if visited.contains(&target.id) {
            return Ok(());
        }

        if visiting.contains(&target.id) {
            return Err(BuildOrderError::CyclicDependency(target.id.clone()));
        }

        visiting.insert(target.id.clone());

        for dep_id in &target.dependencies {
            match self.get(dep_id) {
                Some(dep) => self.visit_target(dep, visited, visiting, result)?,
                None => {
                    return Err(BuildOrderError::MissingDependency {
                        target: target.id.clone(),
                        dependency: dep_id.clone(),
                    })
                }
            }
        }

        visiting.remove(&target.id);
        visited.insert(target.id.clone());
        result.push(target);

        Ok(())
    }
}

/// Error during build order calculation.
#[derive(Debug, thiserror::Error)]
pub enum BuildOrderError {
    /// Circular dependency detected
    #[error("Circular dependency detected involving target '{0}'")]
    CyclicDependency(String),
    /// A target depends on one that is not in the plan
    #[error("Target '{target}' depends on '{dependency}', which is not planned")]
    MissingDependency { target: String, dependency: String },
}

impl From<BuildOrderError> for crate::error::ShipError {
    fn from(e: BuildOrderError) -> Self {
        crate::error::ShipError::config(e.to_string())
    }
}
