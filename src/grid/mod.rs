//! Interactive result grid
//!
//! [`GridViewer`] owns the viewport over a [`QueryResults`](crate::db::QueryResults)
//! and turns [`GridEvent`]s into state changes plus [`GridCommand`]s. It
//! performs no I/O; the host loop in [`crate::ui::terminal`] runs the
//! commands and paints [`GridViewer::render`].

pub mod events;
pub mod render;
pub mod state;

pub use events::{GridCommand, GridEvent};
pub use render::fit_cell;
pub use state::{Feedback, GridViewer, Position, QueryAnnotation, ViewportState};
