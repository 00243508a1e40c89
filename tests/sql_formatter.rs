//! SQL formatter behaviour through the public API

use pam::sql::{FormatOptions, SegmentKind, format_sql};
use pam::ui::Theme;
use proptest::prelude::*;

fn lines(sql: &str, width: usize) -> Vec<String> {
    format_sql(sql, &FormatOptions::with_width(width))
        .lines
        .iter()
        .map(|l| l.text())
        .collect()
}

/// Non-whitespace characters, case-folded
fn skeleton(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

proptest! {
    #[test]
    fn formatting_only_changes_whitespace_and_case(
        sql in "[a-zA-Z0-9_ ,()=*'\n-]{0,200}",
        width in 0usize..120,
    ) {
        let formatted = format_sql(&sql, &FormatOptions::with_width(width));
        prop_assert_eq!(skeleton(&formatted.to_plain_string()), skeleton(&sql));
    }

    #[test]
    fn string_literals_survive_verbatim(body in "[a-z FROMWHEREselectjoin]{0,40}") {
        let sql = format!("select * from t where name = '{body}' order by 1");
        let formatted = format_sql(&sql, &FormatOptions::default());
        let strings: Vec<&str> = formatted
            .lines
            .iter()
            .flat_map(|l| &l.segments)
            .filter(|s| s.kind == SegmentKind::String)
            .map(|s| s.text.as_str())
            .collect();
        let expected = format!("'{body}'");
        prop_assert_eq!(strings, vec![expected.as_str()]);
    }
}

#[test]
fn test_every_clause_starts_a_line() {
    let sql = "select u.id, count(*) from users u inner join orders o on o.user_id = u.id \
               where o.total > 10 group by u.id having count(*) > 2 order by 2 desc limit 5";
    assert_eq!(
        lines(sql, 80),
        vec![
            "SELECT u.id, count(*)",
            "FROM users u",
            "INNER JOIN orders o",
            "ON o.user_id = u.id",
            "WHERE o.total > 10",
            "GROUP BY u.id",
            "HAVING count(*) > 2",
            "ORDER BY 2 desc",
            "LIMIT 5",
        ]
    );
}

#[test]
fn test_comment_is_kept_verbatim() {
    let formatted = format_sql(
        "SELECT * FROM users WHERE id=1 -- keep this",
        &FormatOptions::default(),
    );
    let comments: Vec<_> = formatted
        .lines
        .iter()
        .flat_map(|l| &l.segments)
        .filter(|s| s.kind == SegmentKind::Comment)
        .map(|s| s.text.clone())
        .collect();
    assert_eq!(comments, vec!["-- keep this".to_string()]);
}

#[test]
fn test_narrow_width_wraps_long_select_list() {
    let wrapped = lines("select alpha, beta, gamma, delta, epsilon from t", 20);
    assert!(wrapped.len() > 2, "{wrapped:?}");
    assert_eq!(wrapped.last().map(String::as_str), Some("FROM t"));
    for line in &wrapped {
        assert!(line.chars().count() <= 18, "{line:?} too wide");
    }
}

#[test]
fn test_listing_output_is_indented_and_colored() {
    let formatted = format_sql("select 1 from t", &FormatOptions::default());
    let ansi = formatted.to_ansi(&Theme::default(), "  ");
    let rows: Vec<&str> = ansi.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.starts_with("  ")));
    assert!(ansi.contains('\u{1b}'));
}
