//! UI theme and styling
//!
//! Defines colors and styles for the result grid, its footer, and
//! highlighted SQL.

use crate::sql::SegmentKind;
use ratatui::crossterm::style::{Attribute, ContentStyle};
use ratatui::style::{Color, Modifier, Style};

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Result grid
    pub grid_header: Style,
    pub grid_cell: Style,
    pub grid_selected: Style,
    pub grid_copied: Style,
    pub grid_null: Style,
    pub grid_border: Style,
    pub grid_empty: Style,

    // Footer
    pub footer_text: Style,
    pub footer_key: Style,
    pub footer_success: Style,

    // Query annotation and listings
    pub query_title: Style,
    pub sql_plain: Style,
    pub sql_keyword: Style,
    pub sql_string: Style,
    pub sql_comment: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let selected_bg = Color::Indexed(62);
        let accent = Color::Indexed(205);
        let normal = Color::Indexed(252);

        Self {
            // Result grid
            grid_header: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            grid_cell: Style::default().fg(normal),
            grid_selected: Style::default()
                .fg(Color::Indexed(230))
                .bg(selected_bg)
                .add_modifier(Modifier::BOLD),
            grid_copied: Style::default()
                .fg(accent)
                .bg(selected_bg)
                .add_modifier(Modifier::BOLD),
            grid_null: Style::default().fg(Color::Indexed(240)),
            grid_border: Style::default().fg(Color::Indexed(238)),
            grid_empty: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::ITALIC),

            // Footer
            footer_text: Style::default().fg(normal),
            footer_key: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            footer_success: Style::default()
                .fg(Color::Indexed(40))
                .add_modifier(Modifier::BOLD),

            // SQL
            query_title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            sql_plain: Style::default(),
            sql_keyword: Style::default()
                .fg(Color::Indexed(86))
                .add_modifier(Modifier::BOLD),
            sql_string: Style::default().fg(Color::Indexed(220)),
            sql_comment: Style::default()
                .fg(Color::Indexed(243))
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for a piece of formatted SQL
    pub fn segment_style(&self, kind: SegmentKind) -> Style {
        match kind {
            SegmentKind::Plain => self.sql_plain,
            SegmentKind::Keyword => self.sql_keyword,
            SegmentKind::String => self.sql_string,
            SegmentKind::Comment => self.sql_comment,
        }
    }

    /// Style of a data cell
    pub fn cell_style(&self, selected: bool, copied: bool, null: bool) -> Style {
        match (selected, copied, null) {
            (true, true, _) => self.grid_copied,
            (true, false, _) => self.grid_selected,
            (false, _, true) => self.grid_null,
            (false, _, false) => self.grid_cell,
        }
    }
}

/// Map a ratatui style onto crossterm's, for output outside a frame
pub fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(Into::into);
    content.background_color = style.bg.map(Into::into);
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
    ] {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}
