//! Build pipeline for shipwright
//!
//! Turns a multi-file script library into its distributable artifacts.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Expand the ordering patterns into code and icon manifests
//! - **Assembly**: Embed icons, concatenate fragments, wrap the module
//! - **Planning**: One target per artifact, derived artifacts after their source
//! - **Finishing**: Minify, compile and prefix stylesheets, stamp the banner
//! - **Output**: Write the whole artifact set once everything succeeded
//!
//! # Example
//!
//! ```ignore
//! use shipwright::build::{BuildContext, BuildPipeline};
//! use shipwright::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let pipeline = BuildPipeline::new(context);
//!
//! let result = pipeline.build()?;
//! println!("{}", result.summary());
//! ```

pub mod artifact;
pub mod concat;
pub mod context;
pub mod discovery;
pub mod embed;
pub mod module;
pub mod pipeline;
pub mod result;
pub mod source;
pub mod target;
pub mod wrapper;

pub use artifact::*;
pub use concat::*;
pub use context::*;
pub use discovery::*;
pub use embed::*;
pub use module::*;
pub use pipeline::*;
pub use result::*;
pub use source::*;
pub use target::*;
pub use wrapper::*;
