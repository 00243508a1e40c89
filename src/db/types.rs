//! Result set type definitions
//!
//! Core data structures for representing query results: declared column
//! types and typed cell values. A result set is built once per query
//! execution and only read afterwards.

use std::time::Duration;

/// Query execution results
#[derive(Debug, Clone, Default)]
pub struct QueryResults {
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Time spent executing the statement on the server
    pub execution_time: Duration,
}

/// Column definition in query results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared data type
    pub data_type: DataType,
}

/// Database data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,
    Numeric,

    // Text types
    Text,
    Varchar,
    Char,

    // Boolean
    Boolean,

    // Date/time types
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,

    // JSON types
    Json,
    Jsonb,

    // Binary data
    Bytea,

    // UUID
    Uuid,

    // Array type
    Array(Box<DataType>),

    // Other/unknown types
    Unknown(String),
}

/// A single row of query results
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub values: Vec<CellValue>,
}

/// A cell value (single column value in a row)
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL, distinct from an empty string
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    /// JSON value (parsed)
    Json(serde_json::Value),
    Binary(Vec<u8>),
    /// Date/time value, already rendered by the driver
    DateTime(String),
    Uuid(String),
    Array(Vec<CellValue>),
}

impl QueryResults {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>, execution_time: Duration) -> Self {
        Self {
            columns,
            rows,
            execution_time,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Bounds-checked cell lookup
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.values.get(col)
    }
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl DataType {
    /// Get a human-readable display name for this type
    pub fn display_name(&self) -> String {
        match self {
            DataType::SmallInt => "smallint".to_string(),
            DataType::Integer => "integer".to_string(),
            DataType::BigInt => "bigint".to_string(),
            DataType::Real => "real".to_string(),
            DataType::Double => "double precision".to_string(),
            DataType::Numeric => "numeric".to_string(),
            DataType::Text => "text".to_string(),
            DataType::Varchar => "varchar".to_string(),
            DataType::Char => "char".to_string(),
            DataType::Boolean => "boolean".to_string(),
            DataType::Date => "date".to_string(),
            DataType::Time => "time".to_string(),
            DataType::Timestamp => "timestamp".to_string(),
            DataType::TimestampTz => "timestamptz".to_string(),
            DataType::Interval => "interval".to_string(),
            DataType::Json => "json".to_string(),
            DataType::Jsonb => "jsonb".to_string(),
            DataType::Bytea => "bytea".to_string(),
            DataType::Uuid => "uuid".to_string(),
            DataType::Array(inner) => format!("{}[]", inner.display_name()),
            DataType::Unknown(s) => s.clone(),
        }
    }
}

impl CellValue {
    /// Full literal text of this value; NULL renders as `NULL`
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Json(v) => v.to_string(),
            CellValue::Binary(b) => format!("<binary {} bytes>", b.len()),
            CellValue::DateTime(s) => s.clone(),
            CellValue::Uuid(s) => s.clone(),
            CellValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(CellValue::display_string).collect();
                format!("{{{}}}", items.join(","))
            }
        }
    }

    /// Check if this is a NULL value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_display_name() {
        assert_eq!(DataType::Integer.display_name(), "integer");
        assert_eq!(DataType::Double.display_name(), "double precision");
        assert_eq!(
            DataType::Array(Box::new(DataType::Integer)).display_name(),
            "integer[]"
        );
        assert_eq!(DataType::Unknown("inet".to_string()).display_name(), "inet");
    }

    #[test]
    fn test_null_is_distinct_from_empty_text() {
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Text(String::new()).is_null());
        assert_eq!(CellValue::Null.display_string(), "NULL");
        assert_eq!(CellValue::Text(String::new()).display_string(), "");
    }

    #[test]
    fn test_array_display_string() {
        let arr = CellValue::Array(vec![
            CellValue::Text("a".to_string()),
            CellValue::Null,
        ]);
        assert_eq!(arr.display_string(), "{a,NULL}");
    }

    #[test]
    fn test_cell_lookup_is_bounds_checked() {
        let results = QueryResults::new(
            vec![ColumnDef::new("id", DataType::Integer)],
            vec![Row {
                values: vec![CellValue::Integer(1)],
            }],
            Duration::ZERO,
        );
        assert_eq!(results.cell(0, 0), Some(&CellValue::Integer(1)));
        assert_eq!(results.cell(0, 1), None);
        assert_eq!(results.cell(1, 0), None);
    }

    #[test]
    fn test_option_conversion_maps_none_to_null() {
        assert_eq!(CellValue::from(None::<&str>), CellValue::Null);
        assert_eq!(CellValue::from(Some("Ann")), CellValue::Text("Ann".to_string()));
    }
}
