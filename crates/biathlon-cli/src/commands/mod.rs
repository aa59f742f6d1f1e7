//! CLI subcommand implementations.

pub mod results;
