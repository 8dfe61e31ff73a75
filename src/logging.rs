//! Diagnostic logging setup.
//!
//! Events go to stderr so stdout stays reserved for command summaries.
//! `RUST_LOG` overrides the default level.

use tracing::metadata::LevelFilter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn level_from_verbosity(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbose).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if subscriber.try_init().is_err() {
        tracing::debug!("logging already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(false), LevelFilter::WARN);
        assert_eq!(level_from_verbosity(true), LevelFilter::DEBUG);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
