//! Command-line parsing and execution
//!
//! Each subcommand loads the config file, does its work and saves the
//! file back when it changed it.

pub mod cli;
pub mod handlers;

pub use cli::{Cli, Command, ListKind};
pub use handlers::dispatch;
