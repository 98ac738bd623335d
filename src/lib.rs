//! rsbuild - incremental RenderScript builder
//!
//! Compiles RenderScript sources with an external compiler (`llvm-rs-cc`),
//! converts its diagnostics into file markers, and keeps a bundle per source
//! (the files it produced and the files it depends on) from the dependency
//! files the compiler writes. Later passes compile only what is out of date.

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod depfile;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod hash;
pub mod path_utils;
pub mod planner;
pub mod state;
pub mod tool;
pub mod workspace;
