//! SQL syntax highlighting for the content panel
//!
//! Section markers and placeholder lines get their own styles so the
//! template structure stands out from the statements.

use crate::model::section::{parse_marker, PLACEHOLDER};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "FULL", "CROSS", "ON",
    "AS", "AND", "OR", "NOT", "IN", "EXISTS", "BETWEEN", "LIKE", "IS", "NULL", "GROUP", "BY",
    "HAVING", "ORDER", "ASC", "DESC", "TOP", "LIMIT", "OFFSET", "INSERT", "INTO", "VALUES",
    "UPDATE", "SET", "DELETE", "MERGE", "USING", "MATCHED", "TRUNCATE", "CREATE", "TABLE",
    "ALTER", "DROP", "ADD", "COLUMN", "INDEX", "VIEW", "PROCEDURE", "FUNCTION", "TRIGGER",
    "SCHEMA", "DATABASE", "PRIMARY", "FOREIGN", "KEY", "REFERENCES", "CONSTRAINT", "UNIQUE",
    "DEFAULT", "CHECK", "WITH", "CASE", "WHEN", "THEN", "ELSE", "END", "DISTINCT", "UNION",
    "ALL", "INTERSECT", "EXCEPT", "BEGIN", "COMMIT", "ROLLBACK", "TRANSACTION", "DECLARE",
    "EXEC", "IF", "GRANT", "REVOKE", "GO", "COUNT", "SUM", "AVG", "MIN", "MAX", "CAST",
    "COALESCE",
];

/// Token classes within a single line
#[derive(Debug, PartialEq, Clone)]
enum Token<'a> {
    Keyword(&'a str),
    String(&'a str),
    Number(&'a str),
    Comment(&'a str),
    Identifier(&'a str),
    Whitespace(&'a str),
    Punctuation(&'a str),
}

fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')' | ',' | ';' | '.' | '*' | '=' | '<' | '>' | '+' | '/' | '%' | '-' | '!'
    )
}

/// Tokenize one line. Block comments are only recognized within the line.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = line.as_bytes();
    let mut word_start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i] as char;
        let next = bytes.get(i + 1).map(|b| *b as char);

        if ch == '-' && next == Some('-') {
            flush(line, &mut tokens, &mut word_start, i);
            tokens.push(Token::Comment(&line[i..]));
            return tokens;
        }

        if ch == '/' && next == Some('*') {
            flush(line, &mut tokens, &mut word_start, i);
            let end = line[i + 2..]
                .find("*/")
                .map_or(line.len(), |p| i + 2 + p + 2);
            tokens.push(Token::Comment(&line[i..end]));
            i = end;
            continue;
        }

        if ch == '\'' || ch == '"' {
            flush(line, &mut tokens, &mut word_start, i);
            let end = line[i + 1..]
                .find(ch)
                .map_or(line.len(), |p| i + 1 + p + 1);
            tokens.push(Token::String(&line[i..end]));
            i = end;
            continue;
        }

        if ch == ' ' || ch == '\t' {
            flush(line, &mut tokens, &mut word_start, i);
            let end = line[i..]
                .find(|c: char| c != ' ' && c != '\t')
                .map_or(line.len(), |p| i + p);
            tokens.push(Token::Whitespace(&line[i..end]));
            i = end;
            continue;
        }

        if is_punctuation(ch) {
            flush(line, &mut tokens, &mut word_start, i);
            tokens.push(Token::Punctuation(&line[i..i + 1]));
            i += 1;
            continue;
        }

        if word_start.is_none() {
            word_start = Some(i);
        }
        // Step over the whole UTF-8 character
        i += line[i..].chars().next().map_or(1, char::len_utf8);
    }

    flush(line, &mut tokens, &mut word_start, line.len());
    tokens
}

/// Emit the pending word, if any, ending at `end`
fn flush<'a>(line: &'a str, tokens: &mut Vec<Token<'a>>, start: &mut Option<usize>, end: usize) {
    if let Some(s) = start.take() {
        tokens.push(classify_word(&line[s..end]));
    }
}

fn classify_word(word: &str) -> Token<'_> {
    if SQL_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) {
        Token::Keyword(word)
    } else if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit() || c == '.') {
        Token::Number(word)
    } else {
        Token::Identifier(word)
    }
}

fn token_style(token: &Token) -> Style {
    match token {
        Token::Keyword(_) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Token::String(_) => Style::default().fg(Color::Green),
        Token::Number(_) => Style::default().fg(Color::Magenta),
        Token::Comment(_) => Style::default().fg(Color::DarkGray),
        Token::Identifier(_) => Style::default().fg(Color::White),
        Token::Whitespace(_) => Style::default(),
        Token::Punctuation(_) => Style::default().fg(Color::Gray),
    }
}

fn token_text<'a>(token: &Token<'a>) -> &'a str {
    match token {
        Token::Keyword(s)
        | Token::String(s)
        | Token::Number(s)
        | Token::Comment(s)
        | Token::Identifier(s)
        | Token::Whitespace(s)
        | Token::Punctuation(s) => s,
    }
}

/// Highlight a single line
pub fn highlight_line(line: &str) -> Line<'static> {
    if parse_marker(line).is_some() {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if line.trim() == PLACEHOLDER {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let spans: Vec<Span<'static>> = tokenize(line)
        .iter()
        .map(|t| Span::styled(token_text(t).to_string(), token_style(t)))
        .collect();
    Line::from(spans)
}

/// Convert SQL text into highlighted lines
pub fn highlight_sql(sql: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = sql
        .split('\n')
        .map(|l| highlight_line(l.strip_suffix('\r').unwrap_or(l)))
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_select() {
        let tokens = tokenize("SELECT * FROM users");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword("SELECT"),
                Token::Whitespace(" "),
                Token::Punctuation("*"),
                Token::Whitespace(" "),
                Token::Keyword("FROM"),
                Token::Whitespace(" "),
                Token::Identifier("users"),
            ]
        );
    }

    #[test]
    fn test_tokenize_string_and_number() {
        let tokens = tokenize("WHERE name = 'O''Hara' AND id > 100");
        assert!(tokens.contains(&Token::String("'O'")));
        assert!(tokens.contains(&Token::Number("100")));
    }

    #[test]
    fn test_line_comment_runs_to_end() {
        let tokens = tokenize("SELECT 1 -- trailing note");
        assert_eq!(tokens.last(), Some(&Token::Comment("-- trailing note")));
    }

    #[test]
    fn test_block_comment_within_line() {
        let tokens = tokenize("/* a */ SELECT");
        assert_eq!(tokens[0], Token::Comment("/* a */"));
        assert_eq!(tokens[2], Token::Keyword("SELECT"));
    }

    #[test]
    fn test_non_ascii_identifiers() {
        let tokens = tokenize("SELECT 名稱 FROM 表");
        assert_eq!(tokens[2], Token::Identifier("名稱"));
        assert_eq!(tokens[6], Token::Identifier("表"));
    }

    #[test]
    fn test_marker_and_placeholder_lines() {
        let marker = highlight_line("--#MainSQL");
        assert_eq!(marker.spans.len(), 1);
        assert_eq!(marker.spans[0].style.fg, Some(Color::Yellow));

        let placeholder = highlight_line("/*--!*/");
        assert_eq!(placeholder.spans[0].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_highlight_preserves_line_count() {
        let lines = highlight_sql("--#PreSQL\r\n/*--!*/\r\nSELECT 1;\r\n");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_classify_keyword_case_insensitive() {
        assert!(matches!(classify_word("select"), Token::Keyword(_)));
        assert!(matches!(classify_word("SeLeCt"), Token::Keyword(_)));
        assert!(matches!(classify_word("45.67"), Token::Number(_)));
        assert!(matches!(classify_word("customer_id"), Token::Identifier(_)));
    }
}
