//! Build result types.
//!
//! Contains types for representing the outcome of build operations. A build
//! either produces every requested artifact or fails with an error before
//! anything is written, so there is no per-target failure status.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Artifact produced and written
    Built,
    /// Produced in memory for a dependent target, not written
    Intermediate,
    /// Planned only (dry run)
    Planned,
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Built => write!(f, "built"),
            BuildStatus::Intermediate => write!(f, "intermediate"),
            BuildStatus::Planned => write!(f, "planned"),
        }
    }
}

/// Result of building a single target.
#[derive(Debug, Clone)]
pub struct TargetResult {
    /// Target ID that was built
    pub target_id: String,
    /// Build status
    pub status: BuildStatus,
    /// Output files produced
    pub outputs: Vec<PathBuf>,
    /// Time spent producing the content
    pub duration: Duration,
    /// Warning messages (if any)
    pub warnings: Vec<String>,
}

impl TargetResult {
    /// Create a result for a written artifact.
    pub fn built(target_id: String, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { target_id, status: BuildStatus::Built, outputs, duration, warnings: vec![] }
    }

    /// Create a result for an in-memory dependency.
    pub fn intermediate(target_id: String, duration: Duration) -> Self {
        Self {
            target_id,
            status: BuildStatus::Intermediate,
            outputs: vec![],
            duration,
            warnings: vec![],
        }
    }

    /// Create a dry-run result.
    pub fn planned(target_id: String, output: PathBuf) -> Self {
        Self {
            target_id,
            status: BuildStatus::Planned,
            outputs: vec![output],
            duration: Duration::ZERO,
            warnings: vec![],
        }
    }

    /// Add warnings to the result.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each target, in build order
    pub targets: Vec<TargetResult>,
    /// Version stamped into the banners
    pub version: String,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target result.
    pub fn add_result(&mut self, result: TargetResult) {
        self.targets.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    fn count(&self, status: BuildStatus) -> usize {
        self.targets.iter().filter(|r| r.status == status).count()
    }

    /// Number of artifacts written.
    pub fn built_count(&self) -> usize {
        self.count(BuildStatus::Built)
    }

    /// Number of targets only planned (dry run).
    pub fn planned_count(&self) -> usize {
        self.count(BuildStatus::Planned)
    }

    /// Get all outputs produced (or planned).
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.targets.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get all warnings.
    pub fn all_warnings(&self) -> Vec<&String> {
        self.targets.iter().flat_map(|r| r.warnings.iter()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let planned = self.planned_count();
        if planned > 0 {
            lines.push(format!("Dry run: {} target(s) planned", planned));
            for target in &self.targets {
                for output in &target.outputs {
                    lines.push(format!("  - {} -> {}", target.target_id, output.display()));
                }
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} artifact(s), version {} in {:?}",
                self.built_count(),
                self.version,
                self.total_duration
            ));
            for output in self.all_outputs() {
                lines.push(format!("  - {}", output.display()));
            }
        }

        let warnings = self.all_warnings();
        if !warnings.is_empty() {
            lines.push(format!("Warnings ({}):", warnings.len()));
            for warning in warnings.iter().take(5) {
                lines.push(format!("  - {}", warning));
            }
            if warnings.len() > 5 {
                lines.push(format!("  ... and {} more", warnings.len() - 5));
            }
        }

        lines.join("\n")
    }
}
