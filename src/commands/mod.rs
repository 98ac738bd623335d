//! Command implementations for rsbuild CLI

pub mod build;
pub mod clean;
pub mod completions;
pub mod helpers;
pub mod status;
