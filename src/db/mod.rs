//! Database abstraction layer
//!
//! The result set model shared with the grid viewer, the executor
//! capability that produces it, and the PostgreSQL backend.

pub mod executor;
pub mod postgres;
pub mod types;

// Re-export main types
pub use executor::QueryExecutor;
pub use types::{CellValue, ColumnDef, DataType, QueryResults, Row};

use serde::{Deserialize, Serialize};

/// Database engines a saved connection can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    #[default]
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DbType {
    /// Parse a user-supplied engine name
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(DbType::Postgres),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DbType::Postgres => "postgres",
        }
    }

    /// Statement listing the user tables of the connected database
    pub fn list_tables_sql(self) -> &'static str {
        match self {
            DbType::Postgres => {
                "SELECT tablename FROM pg_tables WHERE schemaname='public' ORDER BY tablename"
            }
        }
    }
}
