//! Watch mode for automatic rebuilds on file changes
//!
//! Provides file system watching with debouncing for the `ship build --watch`
//! command. A failed build does not stop the watcher; the next change triggers
//! another attempt.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::build::{BuildContext, BuildPipeline, BuildResult};
use crate::error::ShipError;

/// Error during watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(#[source] notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(#[source] notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Source directory not found
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// Outcome of one build attempt in watch mode.
#[derive(Debug)]
pub struct Attempt {
    pub outcome: Result<BuildResult, ShipError>,
    pub duration: Duration,
}

impl Attempt {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Remembers whether the previous attempt failed, to report recoveries.
#[derive(Debug, Default)]
pub struct RecoveryTracker {
    failing: bool,
}

impl RecoveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt. Returns `true` if it fixed a previously failing build.
    pub fn update(&mut self, attempt: &Attempt) -> bool {
        let recovered = self.failing && attempt.is_success();
        self.failing = !attempt.is_success();
        recovered
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }
}

/// Run one build for a context.
pub fn attempt_build(ctx: &BuildContext) -> Attempt {
    let start = Instant::now();
    let outcome = BuildPipeline::new(ctx.clone()).build();
    Attempt { outcome, duration: start.elapsed() }
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Format duration for display
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Watch the source tree and rebuild on every relevant change.
///
/// Blocks until the watcher channel closes (normally never; Ctrl+C ends it).
pub fn watch_and_rebuild(ctx: BuildContext) -> Result<(), WatchError> {
    let src_dir = ctx.src_dir();
    let out_dir = ctx.out_dir();
    let config = ctx.config().watch.clone();

    if !src_dir.is_dir() {
        return Err(WatchError::SourceNotFound(src_dir));
    }

    let (tx, rx) = channel();
    let debounce = Duration::from_millis(u64::from(config.debounce_ms));
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;
    debouncer.watcher().watch(&src_dir, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    let mut tracker = RecoveryTracker::new();
    let rebuild = |tracker: &mut RecoveryTracker| {
        if config.clear_screen {
            clear_screen();
        }
        println!("[{}] Building...", timestamp());
        let attempt = attempt_build(&ctx);
        let recovered = tracker.update(&attempt);
        print_attempt(&attempt, recovered);
        println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());
    };

    rebuild(&mut tracker);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<&Path> = events
                    .iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .map(|e| e.path.as_path())
                    .filter(|p| is_relevant_file(p, &out_dir))
                    .collect();

                if changed.is_empty() {
                    continue;
                }
                for path in &changed {
                    if let Some(name) = path.file_name() {
                        println!("[{}] Changed: {}", timestamp(), name.to_string_lossy());
                    }
                }
                rebuild(&mut tracker);
            }
            Ok(Err(error)) => {
                tracing::warn!(?error, "watch error, continuing");
            }
            Err(e) => return Err(WatchError::ChannelError(e.to_string())),
        }
    }
}

/// Check if a changed file should trigger a rebuild.
///
/// Files under the output directory never do.
pub fn is_relevant_file(path: &Path, out_dir: &Path) -> bool {
    if path.starts_with(out_dir) {
        return false;
    }
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "js" | "svg" | "scss" | "sass" | "css")
        }
        None => false,
    }
}

fn print_attempt(attempt: &Attempt, recovered: bool) {
    if recovered {
        println!("[{}] Fixed: build is passing again", timestamp());
    }

    match &attempt.outcome {
        Ok(result) => {
            println!(
                "[{}] Build complete ({}) - {} artifact(s), version {}",
                timestamp(),
                format_duration(attempt.duration),
                result.built_count(),
                result.version
            );
            for warning in result.all_warnings() {
                eprintln!("[{}] Warning: {}", timestamp(), warning);
            }
        }
        Err(e) => {
            println!("[{}] Build failed ({})", timestamp(), format_duration(attempt.duration));
            eprintln!("[{}] Error: {}", timestamp(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> Attempt {
        Attempt { outcome: Ok(BuildResult::new()), duration: Duration::ZERO }
    }

    fn failed() -> Attempt {
        Attempt { outcome: Err(ShipError::config("broken")), duration: Duration::ZERO }
    }

    #[test]
    fn test_recovery_tracker() {
        let mut tracker = RecoveryTracker::new();
        assert!(!tracker.update(&ok()));
        assert!(!tracker.update(&failed()));
        assert!(tracker.is_failing());
        assert!(!tracker.update(&failed()));
        assert!(tracker.update(&ok()));
        assert!(!tracker.is_failing());
        assert!(!tracker.update(&ok()));
    }

    #[test]
    fn test_is_relevant_file() {
        let out = Path::new("/p/dist");
        assert!(is_relevant_file(Path::new("/p/src/js/Viewer.js"), out));
        assert!(is_relevant_file(Path::new("/p/src/icons/zoom.SVG"), out));
        assert!(is_relevant_file(Path::new("/p/src/scss/viewer.scss"), out));
        assert!(!is_relevant_file(Path::new("/p/src/readme.md"), out));
        assert!(!is_relevant_file(Path::new("/p/src/Makefile"), out));
        assert!(!is_relevant_file(Path::new("/p/dist/viewer.js"), out));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_watch_missing_source_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = BuildContext::new(crate::config::default_config(), temp.path().to_path_buf());
        assert!(matches!(watch_and_rebuild(ctx), Err(WatchError::SourceNotFound(_))));
    }
}
