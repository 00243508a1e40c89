//! SQL keyword tables
//!
//! Two lists drive the formatter: phrases that start a new line, and the
//! wider set of words that get keyword styling.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Phrases that get a line break in front of them.
///
/// Order is priority: every multi-word phrase precedes the shorter phrases
/// it contains, so `LEFT JOIN` is matched before `JOIN` gets a chance.
pub const BREAK_PHRASES: &[&str] = &[
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "FULL OUTER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "OUTER JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "INSERT INTO",
    "DELETE FROM",
    "GROUP BY",
    "ORDER BY",
    "UNION ALL",
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "ON",
    "AND",
    "OR",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "INSERT",
    "UPDATE",
    "DELETE",
    "SET",
    "VALUES",
];

/// Words styled as keywords, in addition to every word of [`BREAK_PHRASES`]
const EXTRA_HIGHLIGHT_WORDS: &[&str] = &[
    "AS", "IN", "NOT", "NULL", "IS", "LIKE", "BETWEEN", "EXISTS", "CASE", "WHEN", "THEN", "ELSE",
    "END", "DISTINCT", "ALL", "LEFT", "RIGHT", "INNER", "FULL", "CROSS", "OUTER", "GROUP", "BY",
    "ORDER", "INTO", "FETCH", "FIRST", "ROWS", "ONLY",
];

static HIGHLIGHT_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    BREAK_PHRASES
        .iter()
        .flat_map(|phrase| phrase.split(' '))
        .chain(EXTRA_HIGHLIGHT_WORDS.iter().copied())
        .collect()
});

/// Whether `word` (any case) gets keyword styling
pub fn is_highlight_keyword(word: &str) -> bool {
    HIGHLIGHT_WORDS.contains(word.to_ascii_uppercase().as_str())
}
