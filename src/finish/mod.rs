//! Artifact finishing stages.
//!
//! Everything that turns an assembled module or a stylesheet source into a
//! distributable file: script minification, stylesheet compilation, vendor
//! prefixing, stylesheet minification and the license banner.

pub mod banner;
pub mod minify;
pub mod styles;

pub use banner::{prepend_banner, Banner};
pub use minify::minify_script;
pub use styles::{compile_scss, minify_css, prefix_css};
