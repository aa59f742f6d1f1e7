//! Biathlon results CLI library.
//!
//! This crate provides the CLI interface for the race results engine.

mod cli;
pub mod commands;
mod config;

pub use cli::Cli;
pub use config::{ENV_PREFIX, load_from as load_race_config};
