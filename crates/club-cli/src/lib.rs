//! Computer club day simulator CLI library.
//!
//! This crate provides the CLI interface for the club simulator.

mod cli;
pub mod commands;
mod config;

pub use cli::Cli;
pub use config::{Config, OutputFormat};
