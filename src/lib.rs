//! Shipwright - asset build and release orchestration for script libraries
//!
//! This library provides functionality to:
//! - Resolve an ordered source set from precedence and catch-all patterns
//! - Embed vector icons as code, concatenate, and wrap the module
//! - Minify scripts, compile and prefix stylesheets, stamp license banners
//! - Drive a scripted release through a version-control adapter

pub mod build;
pub mod cli;
pub mod config;
pub mod doc;
pub mod error;
pub mod finish;
pub mod logging;
pub mod release;
pub mod version;
pub mod watch;
