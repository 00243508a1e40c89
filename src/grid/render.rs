//! Grid frame rendering
//!
//! [`GridViewer::render`] builds the whole frame as styled text: optional
//! query annotation, header, visible rows, a spacer and the footer.
//! Rendering never mutates the viewer.

use crate::grid::state::{Feedback, GridViewer, ANNOTATION_INDENT};
use ratatui::text::{Line, Span, Text};
use unicode_truncate::UnicodeTruncateStr;
use unicode_width::UnicodeWidthStr;

pub const MSG_LOADING: &str = "Loading...";
pub const MSG_NO_DATA: &str = "Nothing to show here...";
pub const MSG_COPIED: &str = "Copied to clipboard";
const COLUMN_SEPARATOR: &str = "│";
const ELLIPSIS: &str = "…";
const UNKNOWN_TYPE: &str = "?";

/// Fit `content` into a cell `width` display columns wide.
///
/// The last column is always a space. Content that does not fit in the
/// rest is cut on a character boundary and ends in `…`.
pub fn fit_cell(content: &str, width: usize) -> String {
    if width < 2 {
        return " ".repeat(width);
    }
    let content = sanitize(content);
    let inner = width - 1;

    let fitted = if content.width() > inner {
        let (head, _) = content.unicode_truncate(inner - 1);
        format!("{head}{ELLIPSIS}")
    } else {
        content
    };
    // Wide glyphs can leave a gap after truncation
    let padding = inner.saturating_sub(fitted.width());
    format!("{fitted}{} ", " ".repeat(padding))
}

/// Control characters would break the row layout
fn sanitize(content: &str) -> String {
    content
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

impl GridViewer {
    /// The current frame
    pub fn render(&self) -> Text<'static> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Text::from(MSG_LOADING);
        }

        let mut lines = self.annotation_lines();
        lines.push(self.header_line());

        let vp = &self.viewport;
        let end_row = (vp.offset.row + vp.visible.row).min(self.results.row_count());
        for row in vp.offset.row..end_row {
            lines.push(self.row_line(row));
        }
        if self.results.row_count() == 0 {
            lines.push(Line::styled(MSG_NO_DATA, self.theme.grid_empty));
        }

        lines.push(Line::default());
        lines.push(self.footer_line());
        Text::from(lines)
    }

    fn annotation_lines(&self) -> Vec<Line<'static>> {
        let (Some(annotation), Some(formatted)) = (&self.annotation, self.formatted_annotation())
        else {
            return Vec::new();
        };
        let height = self.annotation_height();
        if height == 0 {
            return Vec::new();
        }

        let mut lines = vec![Line::styled(
            format!("◆ {}", annotation.name),
            self.theme.query_title,
        )];
        lines.extend(
            formatted
                .to_lines(&self.theme, ANNOTATION_INDENT)
                .into_iter()
                .take(height - 1),
        );
        lines
    }

    fn visible_columns(&self) -> std::ops::Range<usize> {
        let vp = &self.viewport;
        let end = (vp.offset.col + vp.visible.col).min(self.results.col_count());
        vp.offset.col.min(end)..end
    }

    fn join_cells(&self, cells: Vec<Span<'static>>) -> Line<'static> {
        let mut spans = Vec::with_capacity(cells.len() * 2);
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(COLUMN_SEPARATOR, self.theme.grid_border));
            }
            spans.push(cell);
        }
        Line::from(spans)
    }

    fn header_line(&self) -> Line<'static> {
        let cells = self
            .visible_columns()
            .filter_map(|col| {
                let def = self.results.columns.get(col)?;
                let width = self.viewport.column_widths.get(col).copied()?;
                Some(Span::styled(
                    fit_cell(&def.name, width),
                    self.theme.grid_header,
                ))
            })
            .collect();
        self.join_cells(cells)
    }

    fn row_line(&self, row: usize) -> Line<'static> {
        let vp = &self.viewport;
        let cells = self
            .visible_columns()
            .filter_map(|col| {
                let cell = self.results.cell(row, col)?;
                let width = vp.column_widths.get(col).copied()?;
                let selected = vp.selected.row == row && vp.selected.col == col;
                let style = self.theme.cell_style(
                    selected,
                    vp.feedback == Feedback::Copied,
                    cell.is_null(),
                );
                Some(Span::styled(fit_cell(&cell.display_string(), width), style))
            })
            .collect();
        self.join_cells(cells)
    }

    /// `type | position or feedback | elapsed | legend`
    fn footer_line(&self) -> Line<'static> {
        let theme = &self.theme;
        let column_type = if self.is_empty() {
            UNKNOWN_TYPE.to_string()
        } else {
            self.selected_column()
                .map_or_else(|| UNKNOWN_TYPE.to_string(), |c| c.data_type.display_name())
        };

        let status = match self.viewport.feedback {
            Feedback::Copied => Span::styled(MSG_COPIED, theme.footer_success),
            Feedback::None => Span::styled(self.position_text(), theme.footer_text),
        };

        let mut spans = vec![
            Span::styled(format!("{column_type} | "), theme.footer_text),
            status,
            Span::styled(
                format!(" | {}ms | ", self.elapsed.as_millis()),
                theme.footer_text,
            ),
        ];
        for (i, (key, rest)) in [("y", "ank"), ("q", "uit")].into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", theme.footer_text));
            }
            spans.push(Span::styled(key, theme.footer_key));
            spans.push(Span::styled(rest, theme.footer_text));
        }
        spans.push(Span::styled("  hjkl: navigate", theme.footer_text));
        Line::from(spans)
    }

    fn position_text(&self) -> String {
        let rows = self.results.row_count();
        let cols = self.results.col_count();
        let (row, col) = if self.is_empty() {
            (0, 0)
        } else {
            (self.viewport.selected.row + 1, self.viewport.selected.col + 1)
        };
        format!("{row}/{rows} rows, {col}/{cols} cols")
    }
}
