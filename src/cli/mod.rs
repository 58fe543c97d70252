//! CLI module
//!
//! Command-line interface for running list operations.
//!
//! # Commands
//!
//! - `services` - List built-in service definitions
//! - `operations` - List the operations of a service
//! - `validate` - Validate a service definition
//! - `list` - Run a list operation and print its items

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListArgs, OutputFormat};
pub use runner::{build_client, build_params, Runner};
