//! SQL formatting and highlighting
//!
//! A lexical pretty-printer: it knows nothing of SQL grammar, only which
//! words start a clause. The pipeline is
//!
//! 1. set comments and quoted literals aside ([`lexer::protect`])
//! 2. start a new line before every break phrase, upper-casing it
//! 3. trim each line and drop the empty ones
//! 4. word-wrap lines wider than the wrap width
//! 5. tag every highlight keyword
//! 6. put the literals back, tagged as comment or string
//!
//! The result is a [`FormattedSql`] of tagged segments. Styling happens only
//! in the output adapters ([`FormattedSql::to_lines`],
//! [`FormattedSql::to_ansi`]), so formatting its own output again can never
//! double-tag anything.

use crate::sql::keywords::{is_highlight_keyword, BREAK_PHRASES};
use crate::sql::lexer::{self, LiteralKind, Protected, Token};
use crate::ui::theme::{content_style, Theme};
use ratatui::text::{Line, Span};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

const DEFAULT_WIDTH: usize = 80;
const MIN_WRAP_WIDTH: usize = 10;
const CONTINUATION_INDENT: &str = "  ";

/// Formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Target display width; lines wrap at `width - 2`
    pub width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

impl FormatOptions {
    pub fn with_width(width: usize) -> Self {
        Self { width }
    }

    fn wrap_width(&self) -> usize {
        self.width.saturating_sub(2).max(MIN_WRAP_WIDTH)
    }
}

/// Semantic class of a piece of formatted SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Plain,
    Keyword,
    String,
    Comment,
}

/// A run of text sharing one [`SegmentKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

/// One display line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlLine {
    pub segments: Vec<Segment>,
}

/// Formatted, tagged SQL ready for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedSql {
    pub lines: Vec<SqlLine>,
}

/// Intermediate unit between lexing and segment building
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Word(String),
    Space(String),
    Punct(char),
    /// Already-normalised keyword text
    Keyword(String),
    Literal(usize),
}

impl Piece {
    fn is_space(&self) -> bool {
        matches!(self, Piece::Space(_))
    }

    fn width(&self, protected: &Protected) -> usize {
        match self {
            Piece::Word(s) | Piece::Space(s) | Piece::Keyword(s) => s.width(),
            Piece::Punct(c) => c.to_string().width(),
            // A multi-line literal only occupies its widest line
            Piece::Literal(idx) => protected
                .literal(*idx)
                .map_or(0, |lit| lit.text.lines().map(str::width).max().unwrap_or(0)),
        }
    }
}

type PieceLine = Vec<Piece>;

/// Format `sql` for display.
///
/// Total over any input: malformed SQL, unterminated strings and comments
/// are all formatted, and the empty string gives empty output.
pub fn format_sql(sql: &str, options: &FormatOptions) -> FormattedSql {
    let protected = lexer::protect(sql);
    let lines = break_before_phrases(&protected.tokens);
    let lines = trim_lines(lines);
    let lines = wrap_lines(lines, options.wrap_width(), &protected);
    let lines = lines.into_iter().map(tag_keywords).collect::<Vec<_>>();
    restore_literals(lines, &protected)
}

/// Step 2: split the token stream into lines, starting a new one before
/// each break phrase. Source line breaks are kept.
fn break_before_phrases(tokens: &[Token]) -> Vec<PieceLine> {
    let mut lines: Vec<PieceLine> = vec![Vec::new()];
    let mut i = 0;

    while i < tokens.len() {
        let piece = match &tokens[i] {
            Token::Word(word) => {
                if let Some((phrase, consumed)) = match_break_phrase(tokens, i) {
                    lines.push(vec![Piece::Keyword(phrase.to_string())]);
                    i += consumed;
                    continue;
                }
                Piece::Word(word.clone())
            }
            Token::Space(s) => Piece::Space(s.clone()),
            Token::Punct(c) => Piece::Punct(*c),
            Token::Placeholder(idx) => Piece::Literal(*idx),
            Token::Newline => {
                lines.push(Vec::new());
                i += 1;
                continue;
            }
        };
        if let Some(line) = lines.last_mut() {
            line.push(piece);
        }
        i += 1;
    }

    lines
}

/// First break phrase matching at `start`, with the number of tokens it spans
fn match_break_phrase(tokens: &[Token], start: usize) -> Option<(&'static str, usize)> {
    BREAK_PHRASES.iter().find_map(|phrase| {
        let mut pos = start;
        for (n, expected) in phrase.split(' ').enumerate() {
            if n > 0 {
                match tokens.get(pos) {
                    Some(Token::Space(_)) => pos += 1,
                    _ => return None,
                }
            }
            match tokens.get(pos) {
                Some(Token::Word(word)) if word.eq_ignore_ascii_case(expected) => pos += 1,
                _ => return None,
            }
        }
        Some((*phrase, pos - start))
    })
}

/// Step 3
fn trim_lines(lines: Vec<PieceLine>) -> Vec<PieceLine> {
    lines
        .into_iter()
        .map(|mut line| {
            while line.last().is_some_and(Piece::is_space) {
                line.pop();
            }
            let leading = line.iter().take_while(|p| p.is_space()).count();
            line.drain(..leading);
            line
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Step 4
fn wrap_lines(lines: Vec<PieceLine>, wrap_width: usize, protected: &Protected) -> Vec<PieceLine> {
    let indent = || Piece::Space(CONTINUATION_INDENT.to_string());
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let width: usize = line.iter().map(|p| p.width(protected)).sum();
        if width <= wrap_width {
            out.push(line);
            continue;
        }

        let mut pieces = line.into_iter();
        match pieces.next() {
            Some(keyword @ Piece::Keyword(_)) => {
                out.push(vec![keyword]);
                let rest: PieceLine = pieces.skip_while(Piece::is_space).collect();
                for mut wrapped in word_wrap(rest, wrap_width.saturating_sub(2), protected) {
                    wrapped.insert(0, indent());
                    out.push(wrapped);
                }
            }
            Some(first) => {
                let line: PieceLine = std::iter::once(first).chain(pieces).collect();
                for (n, mut wrapped) in word_wrap(line, wrap_width, protected)
                    .into_iter()
                    .enumerate()
                {
                    if n > 0 {
                        wrapped.insert(0, indent());
                    }
                    out.push(wrapped);
                }
            }
            None => {}
        }
    }

    out
}

/// Greedy wrap at space boundaries. A word wider than `limit` gets a line
/// of its own rather than being split.
fn word_wrap(line: PieceLine, limit: usize, protected: &Protected) -> Vec<PieceLine> {
    // Words are maximal runs of non-space pieces, each with the gap before it
    let mut words: Vec<(Option<Piece>, PieceLine)> = Vec::new();
    let mut gap = None;
    for piece in line {
        if piece.is_space() {
            gap = Some(piece);
            continue;
        }
        match (gap.take(), words.last_mut()) {
            (None, Some((_, word))) => word.push(piece),
            (gap, _) => words.push((gap, vec![piece])),
        }
    }

    let mut out: Vec<PieceLine> = Vec::new();
    let mut current: PieceLine = Vec::new();
    let mut current_width = 0;

    for (gap, word) in words {
        let word_width: usize = word.iter().map(|p| p.width(protected)).sum();
        let gap_width = gap.as_ref().map_or(0, |g| g.width(protected));

        if !current.is_empty() && current_width + gap_width + word_width > limit {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty()
            && let Some(gap) = gap
        {
            current.push(gap);
            current_width += gap_width;
        }
        current_width += word_width;
        current.extend(word);
    }
    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// Step 5
fn tag_keywords(line: PieceLine) -> PieceLine {
    line.into_iter()
        .map(|piece| match piece {
            Piece::Word(word) if is_highlight_keyword(&word) => {
                Piece::Keyword(word.to_ascii_uppercase())
            }
            other => other,
        })
        .collect()
}

/// Step 6: turn pieces into segments, splitting multi-line literals over
/// several display lines.
fn restore_literals(lines: Vec<PieceLine>, protected: &Protected) -> FormattedSql {
    let mut out = FormattedSql::default();

    for line in lines {
        let mut current = SqlLine::default();
        for piece in line {
            match piece {
                Piece::Word(s) | Piece::Space(s) => current.push(s, SegmentKind::Plain),
                Piece::Punct(c) => current.push(c.to_string(), SegmentKind::Plain),
                Piece::Keyword(s) => current.push(s, SegmentKind::Keyword),
                Piece::Literal(idx) => {
                    let Some(literal) = protected.literal(idx) else {
                        continue;
                    };
                    let kind = match literal.kind {
                        LiteralKind::LineComment | LiteralKind::BlockComment => {
                            SegmentKind::Comment
                        }
                        LiteralKind::SingleQuoted | LiteralKind::DoubleQuoted => {
                            SegmentKind::String
                        }
                    };
                    for (n, part) in literal.text.split('\n').enumerate() {
                        if n > 0 {
                            out.lines.push(std::mem::take(&mut current));
                        }
                        current.push(part.trim_end_matches('\r').to_string(), kind);
                    }
                }
            }
        }
        out.lines.push(current);
    }

    out
}

impl SqlLine {
    /// Append text, merging it into the previous segment when the kind matches
    fn push(&mut self, text: String, kind: SegmentKind) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.kind == kind && kind != SegmentKind::Keyword => {
                last.text.push_str(&text)
            }
            _ => self.segments.push(Segment { text, kind }),
        }
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.text.width()).sum()
    }
}

impl FormattedSql {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The formatted text without any tags, lines joined with `\n`
    pub fn to_plain_string(&self) -> String {
        self.lines
            .iter()
            .map(SqlLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Distinct keywords tagged anywhere in the output
    pub fn keywords(&self) -> BTreeSet<String> {
        self.lines
            .iter()
            .flat_map(|line| &line.segments)
            .filter(|seg| seg.kind == SegmentKind::Keyword)
            .flat_map(|seg| seg.text.split_whitespace().map(str::to_string))
            .collect()
    }

    /// Styled lines for a ratatui frame, each prefixed with `indent`
    pub fn to_lines(&self, theme: &Theme, indent: &str) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .map(|line| {
                let mut spans = Vec::with_capacity(line.segments.len() + 1);
                if !indent.is_empty() {
                    spans.push(Span::raw(indent.to_string()));
                }
                spans.extend(
                    line.segments
                        .iter()
                        .map(|seg| Span::styled(seg.text.clone(), theme.segment_style(seg.kind))),
                );
                Line::from(spans)
            })
            .collect()
    }

    /// ANSI-escaped text for plain stdout, each line prefixed with `indent`
    pub fn to_ansi(&self, theme: &Theme, indent: &str) -> String {
        let mut out = String::new();
        for (n, line) in self.lines.iter().enumerate() {
            if n > 0 {
                out.push('\n');
            }
            out.push_str(indent);
            for seg in &line.segments {
                let style = content_style(theme.segment_style(seg.kind));
                let _ = write!(out, "{}", style.apply(seg.text.as_str()));
            }
        }
        out
    }
}
