//! SQL utilities
//!
//! Lexical formatting and highlighting of SQL text for display.

pub mod formatter;
pub mod keywords;
pub mod lexer;

pub use formatter::{format_sql, FormatOptions, FormattedSql, Segment, SegmentKind, SqlLine};
