//! Protect pass for the SQL formatter
//!
//! Splits raw SQL into words, whitespace and punctuation, setting comments
//! and quoted literals aside in a table. The token stream only carries a
//! [`Token::Placeholder`] index for them, so keyword matching can never
//! fire inside `'from'` or `-- order by`.

/// A lexical token of the code between literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of alphanumeric characters or `_`
    Word(String),
    /// Run of horizontal whitespace
    Space(String),
    /// Line break in the source
    Newline,
    /// Any other single character
    Punct(char),
    /// Index into [`Protected::literals`]
    Placeholder(usize),
}

/// Kind of a protected span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
}

/// A comment or quoted literal, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl LiteralKind {
    pub fn is_comment(self) -> bool {
        matches!(self, LiteralKind::LineComment | LiteralKind::BlockComment)
    }
}

/// Token stream plus the literals it refers to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protected {
    pub tokens: Vec<Token>,
    pub literals: Vec<Literal>,
}

impl Protected {
    pub fn literal(&self, index: usize) -> Option<&Literal> {
        self.literals.get(index)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lex `sql`, moving comments and quoted literals into the literal table.
///
/// Unterminated literals and block comments extend to the end of input.
pub fn protect(sql: &str) -> Protected {
    let chars: Vec<char> = sql.chars().collect();
    let len = chars.len();
    let mut out = Protected::default();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        let literal_end = match (c, next) {
            ('-', Some('-')) => Some((LiteralKind::LineComment, scan_line_comment(&chars, i))),
            ('/', Some('*')) => Some((LiteralKind::BlockComment, scan_block_comment(&chars, i))),
            ('\'', _) => Some((LiteralKind::SingleQuoted, scan_quoted(&chars, i, '\''))),
            ('"', _) => Some((LiteralKind::DoubleQuoted, scan_quoted(&chars, i, '"'))),
            _ => None,
        };

        if let Some((kind, end)) = literal_end {
            out.tokens.push(Token::Placeholder(out.literals.len()));
            out.literals.push(Literal {
                kind,
                text: chars[i..end].iter().collect(),
            });
            i = end;
            continue;
        }

        if c == '\n' {
            out.tokens.push(Token::Newline);
            i += 1;
        } else if c.is_whitespace() {
            let start = i;
            while i < len && chars[i].is_whitespace() && chars[i] != '\n' {
                i += 1;
            }
            out.tokens.push(Token::Space(chars[start..i].iter().collect()));
        } else if is_word_char(c) {
            let start = i;
            while i < len && is_word_char(chars[i]) {
                i += 1;
            }
            out.tokens.push(Token::Word(chars[start..i].iter().collect()));
        } else {
            out.tokens.push(Token::Punct(c));
            i += 1;
        }
    }

    out
}

/// `--` runs up to, not including, the line break
fn scan_line_comment(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |offset| start + offset)
}

fn scan_block_comment(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// A doubled quote inside the literal is an escape, not the end
fn scan_quoted(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_texts(p: &Protected) -> Vec<&str> {
        p.literals.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn words_spaces_and_punctuation() {
        let p = protect("a.b = 1");
        assert_eq!(
            p.tokens,
            vec![
                Token::Word("a".into()),
                Token::Punct('.'),
                Token::Word("b".into()),
                Token::Space(" ".into()),
                Token::Punct('='),
                Token::Space(" ".into()),
                Token::Word("1".into()),
            ]
        );
        assert!(p.literals.is_empty());
    }

    #[test]
    fn string_becomes_placeholder() {
        let p = protect("WHERE b='FROM'");
        assert_eq!(p.tokens.last(), Some(&Token::Placeholder(0)));
        assert_eq!(literal_texts(&p), vec!["'FROM'"]);
        assert_eq!(p.literals[0].kind, LiteralKind::SingleQuoted);
    }

    #[test]
    fn escaped_quote_stays_inside_literal() {
        let p = protect("'it''s' x");
        assert_eq!(literal_texts(&p), vec!["'it''s'"]);
        assert_eq!(p.tokens[2], Token::Word("x".into()));
    }

    #[test]
    fn double_quoted_identifier() {
        let p = protect(r#"select "from" from t"#);
        assert_eq!(literal_texts(&p), vec![r#""from""#]);
        assert_eq!(p.literals[0].kind, LiteralKind::DoubleQuoted);
    }

    #[test]
    fn line_comment_stops_at_newline() {
        let p = protect("a -- note\nb");
        assert_eq!(literal_texts(&p), vec!["-- note"]);
        assert_eq!(p.tokens[2], Token::Placeholder(0));
        assert_eq!(p.tokens[3], Token::Newline);
        assert_eq!(p.tokens[4], Token::Word("b".into()));
    }

    #[test]
    fn block_comment_spans_lines() {
        let p = protect("a /* one\ntwo */ b");
        assert_eq!(literal_texts(&p), vec!["/* one\ntwo */"]);
        assert_eq!(p.literals[0].kind, LiteralKind::BlockComment);
    }

    #[test]
    fn unterminated_literals_run_to_end() {
        assert_eq!(literal_texts(&protect("x = 'open")), vec!["'open"]);
        assert_eq!(literal_texts(&protect("x /* open")), vec!["/* open"]);
        assert_eq!(literal_texts(&protect("x \"open")), vec!["\"open"]);
    }

    #[test]
    fn comment_markers_inside_strings_are_not_comments() {
        let p = protect("'-- no' '/* no */'");
        assert_eq!(literal_texts(&p), vec!["'-- no'", "'/* no */'"]);
        assert!(p.literals.iter().all(|l| !l.kind.is_comment()));
    }

    #[test]
    fn quotes_inside_comments_are_not_strings() {
        let p = protect("-- don't\nx");
        assert_eq!(literal_texts(&p), vec!["-- don't"]);
        assert_eq!(p.tokens.last(), Some(&Token::Word("x".into())));
    }

    #[test]
    fn empty_input() {
        assert_eq!(protect(""), Protected::default());
    }
}
