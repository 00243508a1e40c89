//! Common test utilities and helpers
//!
//! Shared result sets for the grid and rendering tests.

#![allow(dead_code)]

use pam::db::{CellValue, ColumnDef, DataType, QueryResults, Row};
use pam::grid::{GridEvent, GridViewer};
use std::time::Duration;

/// `id | name` with a NULL name in the second row
pub fn people() -> QueryResults {
    QueryResults::new(
        vec![
            ColumnDef::new("id", DataType::Integer),
            ColumnDef::new("name", DataType::Text),
        ],
        vec![
            Row {
                values: vec![CellValue::Integer(1), CellValue::Text("Ann".to_string())],
            },
            Row {
                values: vec![CellValue::Integer(2), CellValue::Null],
            },
        ],
        Duration::from_millis(7),
    )
}

/// A `rows` x `cols` grid of short text cells named `r<row>c<col>`
pub fn grid(rows: usize, cols: usize) -> QueryResults {
    let columns = (0..cols)
        .map(|c| ColumnDef::new(format!("col{c}"), DataType::Text))
        .collect();
    let rows = (0..rows)
        .map(|r| Row {
            values: (0..cols)
                .map(|c| CellValue::Text(format!("r{r}c{c}")))
                .collect(),
        })
        .collect();
    QueryResults::new(columns, rows, Duration::from_millis(1))
}

/// Viewer over `results` already sized to `width` x `height`
pub fn sized_viewer(results: QueryResults, width: u16, height: u16) -> GridViewer {
    let elapsed = results.execution_time;
    let mut viewer = GridViewer::new(results, elapsed);
    viewer.handle(GridEvent::Resize { width, height });
    viewer
}
