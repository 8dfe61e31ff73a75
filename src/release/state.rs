//! The release state machine.
//!
//! A release walks one fixed path:
//!
//! ```text
//! NotStarted -> CheckedOut -> Merged -> VersionBumped -> Built -> Committed -> Tagged
//! ```
//!
//! Each call to [`Release::step`] performs exactly one transition. A failed
//! transition leaves the machine in the state it was in; nothing already done
//! is rolled back.

use crate::build::BuildContext;
use crate::error::{Result, ShipError};
use crate::release::VersionControl;
use crate::version::bump_version;
use std::fmt;
use std::path::PathBuf;

/// Where a release currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseState {
    NotStarted,
    CheckedOut,
    Merged,
    VersionBumped,
    Built,
    Committed,
    Tagged,
}

impl ReleaseState {
    /// The state a successful step leads to, `None` once tagged.
    pub fn next(self) -> Option<Self> {
        match self {
            ReleaseState::NotStarted => Some(ReleaseState::CheckedOut),
            ReleaseState::CheckedOut => Some(ReleaseState::Merged),
            ReleaseState::Merged => Some(ReleaseState::VersionBumped),
            ReleaseState::VersionBumped => Some(ReleaseState::Built),
            ReleaseState::Built => Some(ReleaseState::Committed),
            ReleaseState::Committed => Some(ReleaseState::Tagged),
            ReleaseState::Tagged => None,
        }
    }

    pub fn is_complete(self) -> bool {
        self == ReleaseState::Tagged
    }
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseState::NotStarted => "not started",
            ReleaseState::CheckedOut => "checked out",
            ReleaseState::Merged => "merged",
            ReleaseState::VersionBumped => "version bumped",
            ReleaseState::Built => "built",
            ReleaseState::Committed => "committed",
            ReleaseState::Tagged => "tagged",
        };
        f.write_str(name)
    }
}

/// Inputs of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Release tag; required from the merge step on
    pub tag: Option<String>,
    pub target_branch: String,
    pub source_branch: String,
    /// Merge and tag message, `{tag}` substituted
    pub message: String,
    pub version_file: PathBuf,
}

impl ReleasePlan {
    pub fn from_context(ctx: &BuildContext) -> Self {
        let release = &ctx.config().release;
        Self {
            tag: ctx.tag().map(str::to_string),
            target_branch: release.target_branch.clone(),
            source_branch: release.source_branch.clone(),
            message: release.message.clone(),
            version_file: ctx.version_file(),
        }
    }

    fn require_tag(&self) -> Result<&str> {
        self.tag
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ShipError::config("a release tag is required (pass --tag <version>)"))
    }

    /// Message for the merge commit and the annotated tag.
    pub fn message_for(&self, tag: &str) -> String {
        self.message.replace("{tag}", tag)
    }
}

/// A release in progress.
///
/// `build` runs the full artifact build for the given tag.
pub struct Release<V, B> {
    vcs: V,
    build: B,
    plan: ReleasePlan,
    state: ReleaseState,
}

impl<V, B> Release<V, B>
where
    V: VersionControl,
    B: FnMut(&str) -> Result<()>,
{
    pub fn new(vcs: V, plan: ReleasePlan, build: B) -> Self {
        Self { vcs, build, plan, state: ReleaseState::NotStarted }
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    pub fn plan(&self) -> &ReleasePlan {
        &self.plan
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Perform the next transition.
    pub fn step(&mut self) -> Result<ReleaseState> {
        let Some(next) = self.state.next() else {
            return Ok(self.state);
        };

        match next {
            ReleaseState::NotStarted => {}
            ReleaseState::CheckedOut => self.vcs.checkout(&self.plan.target_branch)?,
            ReleaseState::Merged => {
                let tag = self.plan.require_tag()?;
                let message = self.plan.message_for(tag);
                self.vcs.merge(&self.plan.source_branch, &message)?;
            }
            ReleaseState::VersionBumped => {
                let tag = self.plan.require_tag()?;
                bump_version(&self.plan.version_file, tag)?;
            }
            ReleaseState::Built => {
                let tag = self.plan.require_tag()?;
                (self.build)(tag)?;
            }
            ReleaseState::Committed => self.vcs.commit_amend()?,
            ReleaseState::Tagged => {
                let tag = self.plan.require_tag()?;
                let message = self.plan.message_for(tag);
                self.vcs.tag(tag, &message)?;
            }
        }

        tracing::info!(from = %self.state, to = %next, "release step complete");
        self.state = next;
        Ok(next)
    }

    /// Run every remaining transition. Stops at the first failure.
    pub fn run(&mut self) -> Result<ReleaseState> {
        while !self.state.is_complete() {
            if let Err(e) = self.step() {
                tracing::error!(state = %self.state, error = %e, "release halted");
                return Err(e);
            }
        }
        Ok(self.state)
    }
}
