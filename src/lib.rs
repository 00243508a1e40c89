//! pam - save, run and browse SQL queries from the terminal
//!
//! Named queries are stored per connection in a TOML config file. Running
//! one shows a spinner while it executes, then opens the result set in an
//! interactive grid with keyboard navigation and cell copying.
//!
//! # Architecture
//!
//! - [`commands`]: CLI definition and the handler for each subcommand
//! - [`config`]: Connections, saved queries, settings and key overrides
//! - [`db`]: Result set model and the PostgreSQL executor
//! - [`grid`]: Grid viewer state machine and its frame rendering
//! - [`sql`]: SQL formatter and keyword highlighter
//! - [`keymap`]: Key to grid event bindings
//! - [`ui`]: Terminal session, theme and spinner
//! - [`clipboard`]: System clipboard access
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use pam::db::{CellValue, ColumnDef, DataType, QueryResults, Row};
//! use pam::grid::{GridEvent, GridViewer};
//! use std::time::Duration;
//!
//! let results = QueryResults::new(
//!     vec![ColumnDef::new("id", DataType::Integer)],
//!     vec![Row { values: vec![CellValue::Integer(1)] }],
//!     Duration::from_millis(2),
//! );
//! let mut viewer = GridViewer::new(results, Duration::from_millis(2));
//! viewer.handle(GridEvent::Resize { width: 80, height: 24 });
//! let frame = viewer.render();
//! assert!(!frame.lines.is_empty());
//! ```

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod grid;
pub mod keymap;
pub mod logging;
pub mod sql;
pub mod ui;

pub use error::{CommandError, ConfigError, DbError, PamError, Result};
