//! Folding sequence/constraint/index statements into their owning tables
//!
//! pg_dump emits identity sequences, table constraints, and indexes as
//! separate statements after the table they belong to. This pass splices
//! them back into the owning table or view definition so that each output
//! file is self-contained: identity clauses are inlined into their column,
//! constraints are inserted before the closing parenthesis of the column
//! list, and indexes are appended after the definition.
//!
//! Every lookup here is allowed to fail: a sequence whose column cannot be
//! found, a constraint on a definition without a closing parenthesis, or an
//! attachable whose owner does not exist is skipped without touching
//! anything else.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::split_statements;

use super::elements::{AttachableKind, AttachableStatement, ObjectKind, ParsedObject};

#[derive(Default)]
struct AttachGroup {
    sequences: Vec<AttachableStatement>,
    constraints: Vec<AttachableStatement>,
    indexes: Vec<AttachableStatement>,
}

/// Merge every attachable statement into its owning table or view,
/// mutating the owners in place. Attachables without an owner are dropped.
pub fn attach_to_owners(objects: &mut [ParsedObject], attachables: Vec<AttachableStatement>) {
    let mut groups: HashMap<String, AttachGroup> = HashMap::new();
    for attachable in attachables {
        let group = groups.entry(attachable.owner_qualified_name()).or_default();
        match attachable.kind {
            AttachableKind::Sequence => group.sequences.push(attachable),
            AttachableKind::Constraint => group.constraints.push(attachable),
            AttachableKind::Index => group.indexes.push(attachable),
        }
    }

    for object in objects.iter_mut() {
        if !matches!(object.kind, ObjectKind::Table | ObjectKind::View) {
            continue;
        }
        let Some(group) = groups.remove(&object.qualified_name()) else {
            continue;
        };
        for sequence in &group.sequences {
            inline_identity(object, sequence);
        }
        inline_constraints(object, &group.constraints);
        append_indexes(object, &group.indexes);
    }
}

static IDENTITY_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bGENERATED\s+(?:ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY\s*\(")
        .expect("identity clause pattern")
});

/// Trailing `NULL` / `NOT NULL` at the end of a column definition
static TRAILING_NULLABILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s((?:NOT\s+)?NULL)\s*$").expect("nullability pattern"));

static ADD_CONSTRAINT_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bADD\s+CONSTRAINT\s+(?:"[^"]+"|\S+)\s+(.*)$"#)
        .expect("constraint body pattern")
});

/// Inline one identity clause into the definition of its target column.
fn inline_identity(object: &mut ParsedObject, sequence: &AttachableStatement) {
    let Some(column) = sequence.column.as_deref() else {
        return;
    };
    let Some(clause) = identity_clause(&sequence.definition) else {
        return;
    };

    let Some(open) = object.definition.find('(') else {
        return;
    };
    let Some(close) = object.definition.rfind(')') else {
        return;
    };
    if close <= open {
        return;
    }

    let interior = object.definition[open + 1..close].to_string();
    let Some((piece_start, piece_len)) = find_column_piece(&interior, column) else {
        return;
    };
    let piece = &interior[piece_start..piece_start + piece_len];

    // The piece keeps its trailing comma; the insertion point is computed
    // against the text before it.
    let body_len = if piece.ends_with(',') {
        piece.len() - 1
    } else {
        piece.len()
    };
    let body = &piece[..body_len];
    let (insert_at, insertion) = match TRAILING_NULLABILITY.captures(body) {
        Some(caps) => {
            let keyword = caps.get(1).expect("nullability group");
            (keyword.start(), format!("{clause} "))
        }
        None => (body.trim_end().len(), format!(" {clause}")),
    };

    let mut rebuilt = String::with_capacity(object.definition.len() + insertion.len());
    rebuilt.push_str(&object.definition[..open + 1]);
    rebuilt.push_str(&interior[..piece_start]);
    rebuilt.push_str(&piece[..insert_at]);
    rebuilt.push_str(&insertion);
    rebuilt.push_str(&piece[insert_at..]);
    rebuilt.push_str(&interior[piece_start + piece_len..]);
    rebuilt.push_str(&object.definition[close..]);
    object.definition = rebuilt;

    if let Some(name) = &sequence.name {
        object.sequences.push(name.clone());
    }
}

/// Locate the first comma-separated piece of the column list that starts,
/// after leading whitespace, with `column` (quoted or not) followed by
/// whitespace. Returns the piece's byte range within the interior.
fn find_column_piece(interior: &str, column: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for piece in split_statements(interior, ',') {
        if column_leads(&piece, column) {
            return Some((offset, piece.len()));
        }
        offset += piece.len();
    }
    None
}

fn column_leads(piece: &str, column: &str) -> bool {
    let trimmed = piece.trim_start();
    let rest = if let Some(rest) = trimmed.strip_prefix(column) {
        rest
    } else if let Some(rest) = trimmed
        .strip_prefix('"')
        .and_then(|r| r.strip_prefix(column))
        .and_then(|r| r.strip_prefix('"'))
    {
        rest
    } else {
        return false;
    };
    rest.starts_with(|c: char| c.is_whitespace())
}

/// Reduce the identity statement to its `GENERATED ... AS IDENTITY (...)`
/// clause, collapsed onto one line.
fn identity_clause(definition: &str) -> Option<String> {
    let matched = IDENTITY_CLAUSE.find(definition)?;
    let open = matched.end() - 1;
    let close = matching_paren(definition, open)?;
    Some(collapse_whitespace(&definition[matched.start()..=close]))
}

/// Byte offset of the parenthesis closing the one at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collapse line breaks and indentation runs to single spaces and trim the
/// whitespace immediately inside parentheses.
fn collapse_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace("( ", "(").replace(" )", ")")
}

/// Insert the reduced constraints before the definition's closing
/// parenthesis, one per line at the definition's own indentation.
fn inline_constraints(object: &mut ParsedObject, constraints: &[AttachableStatement]) {
    if constraints.is_empty() {
        return;
    }
    let reduced: Vec<(String, String)> = constraints.iter().filter_map(reduce_constraint).collect();
    if reduced.is_empty() {
        return;
    }
    let Some(close) = object.definition.rfind(')') else {
        return;
    };

    let indent = detect_indentation(&object.definition);
    let separator = format!(",\n{indent}");
    let joined = reduced
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(&separator);

    let head = &object.definition[..close];
    let content_end = head.trim_end().len();

    let mut rebuilt =
        String::with_capacity(object.definition.len() + joined.len() + indent.len() + 3);
    rebuilt.push_str(&head[..content_end]);
    rebuilt.push_str(",\n");
    rebuilt.push_str(&indent);
    rebuilt.push_str(&joined);
    rebuilt.push('\n');
    rebuilt.push_str(&object.definition[close..]);
    object.definition = rebuilt;

    object
        .constraints
        .extend(reduced.into_iter().map(|(name, _)| name));
}

/// `(name, "CONSTRAINT <name> <definition>")` for one ADD CONSTRAINT
/// statement, with the definition taken verbatim up to the terminating
/// separator.
fn reduce_constraint(attachable: &AttachableStatement) -> Option<(String, String)> {
    let name = attachable.name.clone()?;
    let caps = ADD_CONSTRAINT_BODY.captures(&attachable.definition)?;
    let body = caps.get(1)?.as_str().trim();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    if body.is_empty() {
        return None;
    }
    Some((name.clone(), format!("CONSTRAINT {name} {body}")))
}

/// Append index statements after the definition, separated by blank lines.
fn append_indexes(object: &mut ParsedObject, indexes: &[AttachableStatement]) {
    for index in indexes {
        let text = index.definition.trim();
        if text.is_empty() {
            continue;
        }
        object.definition.push_str("\n\n");
        object.definition.push_str(text);
        let label = index
            .name
            .clone()
            .unwrap_or_else(|| text.lines().next().unwrap_or_default().trim().to_string());
        object.indexes.push(label);
    }
}

/// The indentation string used by a definition's lines.
///
/// If one exact leading-whitespace run accounts for a strict majority of
/// the indented lines it is used verbatim; otherwise one unit of the GCD of
/// the run lengths is used, computed separately for space-indented and
/// tab-indented lines with spaces preferred. No indented lines yields an
/// empty string.
fn detect_indentation(text: &str) -> String {
    let mut runs: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let run = &line[..line.len() - trimmed.len()];
        if !run.is_empty() {
            runs.push(run);
        }
    }
    if runs.is_empty() {
        return String::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for run in runs.iter() {
        *counts.entry(*run).or_default() += 1;
    }
    if let Some((run, count)) = counts.iter().max_by_key(|(_, count)| *count) {
        if count * 2 > runs.len() {
            return (*run).to_string();
        }
    }

    let space_lengths: Vec<usize> = runs
        .iter()
        .filter(|run| run.bytes().all(|b| b == b' '))
        .map(|run| run.len())
        .collect();
    if !space_lengths.is_empty() {
        let unit = space_lengths.into_iter().fold(0, gcd);
        return " ".repeat(unit);
    }

    let tab_lengths: Vec<usize> = runs
        .iter()
        .filter(|run| run.bytes().all(|b| b == b'\t'))
        .map(|run| run.len())
        .collect();
    if !tab_lengths.is_empty() {
        let unit = tab_lengths.into_iter().fold(0, gcd);
        return "\t".repeat(unit);
    }

    String::new()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
