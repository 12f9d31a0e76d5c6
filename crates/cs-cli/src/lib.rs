//! Chat transcript analyzer CLI library.
//!
//! This crate provides the CLI interface over `cs-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, TranscriptArgs};
pub use config::Config;
