//! Domain models for rsbuild
//!
//! Pure data types for the build: sources and the per-source bundles of
//! outputs and dependencies. No file system access happens here.

pub mod bundle;
pub mod source;

pub use bundle::{Bundle, BundleStore};
pub use source::SourceUnit;
