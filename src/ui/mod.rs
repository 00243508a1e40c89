//! Terminal UI
//!
//! Styling, the interactive session that hosts the result grid, and the
//! progress spinner shown while a query runs.

pub mod spinner;
pub mod terminal;
pub mod theme;

pub use theme::Theme;
