//! Grid input events and output commands
//!
//! The viewer never performs side effects itself. It consumes a
//! [`GridEvent`] and hands back [`GridCommand`]s for the host loop to carry
//! out.

use std::time::Duration;

/// Input to [`GridViewer::handle`](crate::grid::GridViewer::handle)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    JumpFirstCol,
    JumpLastCol,
    JumpFirstRow,
    JumpLastRow,
    PageUp,
    PageDown,
    CopyCell,
    /// Terminal size changed (columns, rows)
    Resize { width: u16, height: u16 },
    /// The timer armed by [`GridCommand::ScheduleFeedbackExpiry`] fired
    FeedbackExpired,
    Quit,
}

/// Side effect requested by the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    /// Put the text on the system clipboard; fire and forget
    CopyToClipboard(String),
    /// Deliver [`GridEvent::FeedbackExpired`] after the given delay
    ScheduleFeedbackExpiry(Duration),
    /// End the session
    Quit,
}

impl GridEvent {
    /// Whether the event only moves the selection
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            GridEvent::MoveUp
                | GridEvent::MoveDown
                | GridEvent::MoveLeft
                | GridEvent::MoveRight
                | GridEvent::JumpFirstCol
                | GridEvent::JumpLastCol
                | GridEvent::JumpFirstRow
                | GridEvent::JumpLastRow
                | GridEvent::PageUp
                | GridEvent::PageDown
        )
    }
}
