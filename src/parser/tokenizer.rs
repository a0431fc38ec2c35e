//! Statement splitting for plain-text dump content
//!
//! pg_dump output cannot be split on bare separator characters: semicolons
//! occur inside line comments (`-- Name: users_pkey; Type: CONSTRAINT; ...`),
//! string literals, quoted identifiers, and dollar-quoted function bodies.
//! This module is a hand-rolled scanner that tracks those lexical regions and
//! only splits on separators seen outside of all of them.
//!
//! The same scanner splits the column/constraint list inside a table
//! definition when called with `,` as the separator.

/// Lexical region the scanner is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Normal,
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
}

/// Split SQL text into individual statements on `separator`.
///
/// Each emitted statement includes its trailing separator. A non-empty
/// remainder without a trailing separator is emitted as the last statement.
pub fn split_statements(text: &str, separator: char) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = LexState::Normal;
    let mut i = 0;

    while i < text.len() {
        // Dollar quotes take precedence over every other lexical region,
        // the same way PostgreSQL's own lexer recognizes them. A quoted
        // body is consumed atomically, so nested dollar quotes and any
        // separators inside the body are swallowed as opaque text.
        if bytes[i] == b'$' {
            if let Some(tag_end) = dollar_tag_end(text, i) {
                let tag = &text[i..tag_end];
                if let Some(rel) = text[tag_end..].find(tag) {
                    let span_end = tag_end + rel + tag.len();
                    current.push_str(&text[i..span_end]);
                    i = span_end;
                } else {
                    // No matching close tag: keep the opening tag as plain
                    // text and carry on scanning.
                    current.push_str(tag);
                    i = tag_end;
                    state = LexState::Normal;
                }
                continue;
            }
        }

        let ch = text[i..].chars().next().expect("offset is a char boundary");
        let ch_len = ch.len_utf8();

        match state {
            LexState::Normal => {
                if ch == separator {
                    current.push(ch);
                    statements.push(std::mem::take(&mut current));
                    i += ch_len;
                    continue;
                }
                match ch {
                    '-' if bytes.get(i + 1) == Some(&b'-') => {
                        state = LexState::LineComment;
                        current.push_str("--");
                        i += 2;
                        continue;
                    }
                    '/' if bytes.get(i + 1) == Some(&b'*') => {
                        state = LexState::BlockComment;
                        current.push_str("/*");
                        i += 2;
                        continue;
                    }
                    '\'' => state = LexState::SingleQuoted,
                    '"' => state = LexState::DoubleQuoted,
                    _ => {}
                }
                current.push(ch);
                i += ch_len;
            }
            LexState::LineComment => {
                if ch == '\n' || ch == '\r' {
                    state = LexState::Normal;
                }
                current.push(ch);
                i += ch_len;
            }
            LexState::BlockComment => {
                if ch == '*' && bytes.get(i + 1) == Some(&b'/') {
                    state = LexState::Normal;
                    current.push_str("*/");
                    i += 2;
                    continue;
                }
                current.push(ch);
                i += ch_len;
            }
            LexState::SingleQuoted => {
                if ch == '\'' {
                    state = LexState::Normal;
                }
                current.push(ch);
                i += ch_len;
            }
            LexState::DoubleQuoted => {
                if ch == '"' {
                    state = LexState::Normal;
                }
                current.push(ch);
                i += ch_len;
            }
        }
    }

    if !current.is_empty() {
        statements.push(current);
    }

    statements
}

/// Byte offset one past the closing `$` of a dollar-quote tag starting at
/// `start`, or `None` if the text at `start` does not form a tag.
///
/// A tag is `$`, an optional identifier (`[A-Za-z_][A-Za-z0-9_]*`), and a
/// closing `$`; positional parameters like `$1` are not tags.
fn dollar_tag_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut j = start + 1;
    if j < bytes.len() && (bytes[j].is_ascii_alphabetic() || bytes[j] == b'_') {
        j += 1;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
            j += 1;
        }
    }
    if j < bytes.len() && bytes[j] == b'$' {
        Some(j + 1)
    } else {
        None
    }
}
