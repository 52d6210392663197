//! CLI module for rowgate
//!
//! Provides command-line interface for:
//! - serve: Connect to the backing app and serve HTTP
//! - check-config: Validate and print the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ConfigArgs};
pub use commands::{check_config, connect_app, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
