//! Scripted releases: merge, bump, build, amend, tag.

pub mod state;
pub mod vcs;

pub use state::{Release, ReleasePlan, ReleaseState};
pub use vcs::{GitCli, VersionControl};
