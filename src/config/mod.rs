//! Configuration module for shipwright
//!
//! Provides types and parsing for `ship.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, find_config, load_config, ConfigError};
pub use schema::*;
