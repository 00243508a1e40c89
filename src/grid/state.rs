//! Grid viewer state and transitions
//!
//! [`GridViewer::handle`] is total: every event is valid in every state, and
//! after each transition the selection sits inside the visible window on
//! both axes (whenever that window is non-empty). Movement on an empty
//! result set is a no-op.

use crate::db::types::{ColumnDef, QueryResults};
use crate::grid::events::{GridCommand, GridEvent};
use crate::sql::{format_sql, FormatOptions, FormattedSql};
use crate::ui::theme::Theme;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

pub const MIN_COLUMN_WIDTH: usize = 4;
pub const MAX_COLUMN_WIDTH: usize = 40;
/// Rows sampled when sizing columns
const WIDTH_SAMPLE_ROWS: usize = 100;
/// How long the "copied" highlight stays up
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(400);
/// Header, spacer and footer
pub const CHROME_ROWS: usize = 3;
/// Width of the `│` between columns
pub const SEPARATOR_WIDTH: usize = 1;
/// Indent applied to the SQL under the query title
pub const ANNOTATION_INDENT: &str = "  ";

/// A (row, column) pair of indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Transient, purely cosmetic feedback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Copied,
}

/// Everything that changes while browsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub selected: Position,
    /// Top-left corner of the visible window
    pub offset: Position,
    /// Number of rows and columns that fit on screen
    pub visible: Position,
    pub column_widths: Vec<usize>,
    pub feedback: Feedback,
}

/// Query shown above the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnnotation {
    pub name: String,
    pub sql: String,
}

/// Interactive result grid
pub struct GridViewer {
    pub(crate) results: QueryResults,
    pub(crate) elapsed: Duration,
    pub(crate) annotation: Option<QueryAnnotation>,
    pub(crate) viewport: ViewportState,
    /// Last known terminal size (columns, rows)
    pub(crate) size: (u16, u16),
    pub(crate) format_width: usize,
    pub(crate) theme: Theme,
    running: bool,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Back,
    Forward,
    First,
    Last,
    PageBack,
    PageForward,
}

impl GridViewer {
    /// Viewer over `results`, annotated with the time the query took
    pub fn new(results: QueryResults, elapsed: Duration) -> Self {
        let column_widths = compute_column_widths(&results);
        Self {
            results,
            elapsed,
            annotation: None,
            viewport: ViewportState {
                column_widths,
                ..ViewportState::default()
            },
            size: (0, 0),
            format_width: FormatOptions::default().width,
            theme: Theme::default(),
            running: true,
        }
    }

    /// Show `◆ name` and the formatted query above the grid
    pub fn with_query(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.annotation = Some(QueryAnnotation {
            name: name.into(),
            sql: sql.into(),
        });
        self.recompute_extent();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Upper bound for the annotation's formatting width
    pub fn with_format_width(mut self, width: usize) -> Self {
        self.format_width = width;
        self.recompute_extent();
        self
    }

    /// Apply one event, returning the side effects for the host to run
    pub fn handle(&mut self, event: GridEvent) -> Vec<GridCommand> {
        if event.is_navigation() && self.is_empty() {
            return Vec::new();
        }

        match event {
            GridEvent::MoveUp => self.move_row(Motion::Back),
            GridEvent::MoveDown => self.move_row(Motion::Forward),
            GridEvent::MoveLeft => self.move_col(Motion::Back),
            GridEvent::MoveRight => self.move_col(Motion::Forward),
            GridEvent::JumpFirstRow => self.move_row(Motion::First),
            GridEvent::JumpLastRow => self.move_row(Motion::Last),
            GridEvent::JumpFirstCol => self.move_col(Motion::First),
            GridEvent::JumpLastCol => self.move_col(Motion::Last),
            GridEvent::PageUp => self.move_row(Motion::PageBack),
            GridEvent::PageDown => self.move_row(Motion::PageForward),
            GridEvent::CopyCell => return self.copy_selected(),
            GridEvent::Resize { width, height } => {
                self.size = (width, height);
                self.recompute_extent();
            }
            GridEvent::FeedbackExpired => self.viewport.feedback = Feedback::None,
            GridEvent::Quit => {
                self.running = false;
                return vec![GridCommand::Quit];
            }
        }
        Vec::new()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// No rows or no columns
    pub fn is_empty(&self) -> bool {
        self.results.row_count() == 0 || self.results.col_count() == 0
    }

    pub fn results(&self) -> &QueryResults {
        &self.results
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn selected(&self) -> Position {
        self.viewport.selected
    }

    pub fn offset(&self) -> Position {
        self.viewport.offset
    }

    pub fn visible(&self) -> Position {
        self.viewport.visible
    }

    pub fn feedback(&self) -> Feedback {
        self.viewport.feedback
    }

    pub fn column_widths(&self) -> &[usize] {
        &self.viewport.column_widths
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn annotation(&self) -> Option<&QueryAnnotation> {
        self.annotation.as_ref()
    }

    /// Definition of the column holding the selection
    pub fn selected_column(&self) -> Option<&ColumnDef> {
        self.results.columns.get(self.viewport.selected.col)
    }

    fn move_row(&mut self, motion: Motion) {
        let vp = &mut self.viewport;
        (vp.selected.row, vp.offset.row) = move_axis(
            vp.selected.row,
            vp.offset.row,
            self.results.row_count(),
            vp.visible.row,
            motion,
        );
    }

    fn move_col(&mut self, motion: Motion) {
        let vp = &mut self.viewport;
        (vp.selected.col, vp.offset.col) = move_axis(
            vp.selected.col,
            vp.offset.col,
            self.results.col_count(),
            vp.visible.col,
            motion,
        );
    }

    fn copy_selected(&mut self) -> Vec<GridCommand> {
        let Position { row, col } = self.viewport.selected;
        let Some(cell) = self.results.cell(row, col) else {
            return Vec::new();
        };
        let text = cell.display_string();
        log::debug!("copying cell ({row}, {col}), {} bytes", text.len());
        self.viewport.feedback = Feedback::Copied;
        vec![
            GridCommand::CopyToClipboard(text),
            GridCommand::ScheduleFeedbackExpiry(FEEDBACK_DURATION),
        ]
    }

    /// Formatting options for the annotation at the current terminal width
    pub(crate) fn annotation_options(&self) -> FormatOptions {
        let available = usize::from(self.size.0).saturating_sub(ANNOTATION_INDENT.len());
        FormatOptions::with_width(self.format_width.min(available))
    }

    /// Formatted annotation SQL, recomputed on every call
    pub(crate) fn formatted_annotation(&self) -> Option<FormattedSql> {
        self.annotation
            .as_ref()
            .map(|a| format_sql(&a.sql, &self.annotation_options()))
    }

    /// Rows taken by the annotation: title plus SQL, capped at a third of
    /// the terminal height
    pub(crate) fn annotation_height(&self) -> usize {
        let Some(formatted) = self.formatted_annotation() else {
            return 0;
        };
        (1 + formatted.line_count()).min(usize::from(self.size.1) / 3)
    }

    /// Recompute the visible extent from the terminal size, then pull the
    /// offsets back so the selection stays in view.
    fn recompute_extent(&mut self) {
        let (width, height) = (usize::from(self.size.0), usize::from(self.size.1));
        let visible_rows = height
            .saturating_sub(CHROME_ROWS)
            .saturating_sub(self.annotation_height());
        let visible_cols = fitting_column_count(&self.viewport.column_widths, width);

        let rows = self.results.row_count();
        let cols = self.results.col_count();
        let vp = &mut self.viewport;
        vp.visible = Position::new(visible_rows, visible_cols);
        vp.offset.row = scroll_into_view(
            vp.selected.row,
            vp.offset.row.min(rows.saturating_sub(visible_rows)),
            visible_rows,
        );
        vp.offset.col = scroll_into_view(
            vp.selected.col,
            vp.offset.col.min(cols.saturating_sub(visible_cols)),
            visible_cols,
        );
        log::trace!(
            "resized to {width}x{height}: {visible_rows} rows x {visible_cols} cols visible"
        );
    }
}

/// Move along one axis of `count > 0` items, returning `(selected, offset)`
fn move_axis(
    selected: usize,
    offset: usize,
    count: usize,
    visible: usize,
    motion: Motion,
) -> (usize, usize) {
    let last = count.saturating_sub(1);
    // Paging before the first resize still makes progress
    let page = visible.max(1);

    let selected = match motion {
        Motion::First => return (0, 0),
        Motion::Last => return (last, count.saturating_sub(page)),
        Motion::Back => selected.saturating_sub(1),
        Motion::Forward => (selected + 1).min(last),
        Motion::PageBack => selected.saturating_sub(page),
        Motion::PageForward => selected.saturating_add(page).min(last),
    };
    (selected, scroll_into_view(selected, offset, visible))
}

/// Smallest change to `offset` that puts `selected` inside the window
fn scroll_into_view(selected: usize, offset: usize, visible: usize) -> usize {
    if selected < offset {
        selected
    } else if visible > 0 && selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    }
}

/// Widest header or sampled cell plus one, clamped to the column limits
pub fn compute_column_widths(results: &QueryResults) -> Vec<usize> {
    results
        .columns
        .iter()
        .enumerate()
        .map(|(col, def)| {
            let content = results
                .rows
                .iter()
                .take(WIDTH_SAMPLE_ROWS)
                .filter_map(|row| row.values.get(col))
                .map(|cell| cell.display_string().width())
                .max()
                .unwrap_or(0);
            (def.name.width().max(content) + 1).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Largest `n` such that any `n` consecutive columns, with separators, fit
/// in `available` cells. At least one column shows whenever there is room.
pub fn fitting_column_count(widths: &[usize], available: usize) -> usize {
    if available == 0 || widths.is_empty() {
        return 0;
    }
    (1..=widths.len())
        .rev()
        .find(|&n| {
            widths.windows(n).all(|window| {
                window.iter().sum::<usize>() + (n - 1) * SEPARATOR_WIDTH <= available
            })
        })
        .unwrap_or(1)
}
