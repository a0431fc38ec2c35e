//! Ordered statement classification
//!
//! Each matcher recognizes one DDL form that a plain-text schema dump can
//! contain. Matchers are tried in a fixed priority order and the first match
//! wins; a statement no matcher recognizes stays residual. The patterns
//! accept quoted and unquoted identifiers (including Unicode letters) and
//! default the schema part to `public` when a statement omits it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::model::{AttachableKind, AttachableStatement, ObjectKind, ParsedObject};
use crate::util::contains_ci;

/// Schema used when a statement does not qualify an object name
pub const DEFAULT_SCHEMA: &str = "public";

/// A quoted-or-unquoted identifier; two capture groups per use.
const IDENT: &str = r#"(?:"([^"]+)"|([\p{L}_][\p{L}\p{N}_$]*))"#;

/// An optionally schema-qualified identifier; four capture groups per use.
macro_rules! qualified {
    () => {
        concat!(
            r#"(?:(?:"([^"]+)"|([\p{L}_][\p{L}\p{N}_$]*))\.)?"#,
            r#"(?:"([^"]+)"|([\p{L}_][\p{L}\p{N}_$]*))"#
        )
    };
}

/// Outcome of classifying one statement
#[derive(Debug, Clone)]
pub enum Classified {
    /// A terminal object that gets its own output file
    Object(ParsedObject),
    /// A statement that is merged into its owning table or view
    Attachable(AttachableStatement),
}

/// A classified statement plus any text found before the matched keyword
/// (typically a `--` comment header), which stays residual.
#[derive(Debug, Clone)]
pub struct Classification {
    pub residual_prefix: Option<String>,
    pub classified: Classified,
}

static CREATE_SCHEMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bCREATE\s+SCHEMA\s+{IDENT}")).expect("schema pattern")
});

static CREATE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+EXTENSION\s+(?:IF\s+NOT\s+EXISTS\s+)?{IDENT}(?:\s+(?:WITH\s+)?SCHEMA\s+{IDENT})?"
    ))
    .expect("extension pattern")
});

/// Generic `CREATE [modifiers] <KEYWORD> <schema.>name` matchers, in
/// priority order. FUNCTION and PROCEDURE come before TABLE so that a
/// dollar-quoted body mentioning tables cannot shadow its own header, and
/// TABLE comes before the `ALTER TABLE` attachable matchers below.
static CREATE_OBJECT: Lazy<Vec<(ObjectKind, Regex)>> = Lazy::new(|| {
    [
        (ObjectKind::Type, "TYPE"),
        (ObjectKind::Domain, "DOMAIN"),
        (ObjectKind::Function, "FUNCTION"),
        (ObjectKind::Procedure, "PROCEDURE"),
        (ObjectKind::Table, "TABLE"),
        (ObjectKind::View, "VIEW"),
    ]
    .into_iter()
    .map(|(kind, keyword)| {
        let pattern = format!(
            r"(?i)\bCREATE\s+(?:(?:OR\s+REPLACE|MATERIALIZED|UNLOGGED|TEMPORARY|TEMP|RECURSIVE)\s+)*{keyword}\s+{qualified}",
            qualified = qualified!(),
        );
        (kind, Regex::new(&pattern).expect("create pattern"))
    })
    .collect()
});

static IDENTITY_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)\bALTER\s+TABLE\s+(?:ONLY\s+)?{qualified}\s+ALTER\s+(?:COLUMN\s+)?{IDENT}\s+ADD\s+GENERATED\s+(?:ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY\s*\(\s*SEQUENCE\s+NAME\s+{qualified}",
        qualified = qualified!(),
    ))
    .expect("identity sequence pattern")
});

static ADD_CONSTRAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)\bALTER\s+TABLE\s+(?:ONLY\s+)?{qualified}\s+ADD\s+CONSTRAINT\s+{IDENT}",
        qualified = qualified!(),
    ))
    .expect("constraint pattern")
});

static CREATE_INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+(?:UNIQUE\s+)?INDEX\s+(?:{IDENT}\s+)?ON\s+(?:ONLY\s+)?{qualified}",
        qualified = qualified!(),
    ))
    .expect("index pattern")
});

/// Classify one statement, trying each matcher in priority order.
pub fn classify(statement: &str) -> Option<Classification> {
    try_create_schema(statement)
        .or_else(|| try_create_extension(statement))
        .or_else(|| try_create_object(statement))
        .or_else(|| try_identity_sequence(statement))
        .or_else(|| try_add_constraint(statement))
        .or_else(|| try_create_index(statement))
}

fn try_create_schema(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "SCHEMA") {
        return None;
    }
    let caps = CREATE_SCHEMA.captures(statement)?;
    let name = ident_at(&caps, 1)?;
    let (prefix, definition) = split_at_match(statement, &caps);
    Some(Classification {
        residual_prefix: prefix,
        classified: Classified::Object(ParsedObject::new(
            ObjectKind::Schema,
            name.clone(),
            name,
            definition,
        )),
    })
}

fn try_create_extension(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "EXTENSION") {
        return None;
    }
    let caps = CREATE_EXTENSION.captures(statement)?;
    let name = ident_at(&caps, 1)?;
    let schema = ident_at(&caps, 3).unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    let (prefix, definition) = split_at_match(statement, &caps);
    Some(Classification {
        residual_prefix: prefix,
        classified: Classified::Object(ParsedObject::new(
            ObjectKind::Extension,
            schema,
            name,
            definition,
        )),
    })
}

fn try_create_object(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "CREATE") {
        return None;
    }
    for (kind, pattern) in CREATE_OBJECT.iter() {
        let Some(caps) = pattern.captures(statement) else {
            continue;
        };
        let Some((schema, name)) = qualified_at(&caps, 1) else {
            continue;
        };
        let (prefix, definition) = split_at_match(statement, &caps);
        return Some(Classification {
            residual_prefix: prefix,
            classified: Classified::Object(ParsedObject::new(*kind, schema, name, definition)),
        });
    }
    None
}

fn try_identity_sequence(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "IDENTITY") {
        return None;
    }
    let caps = IDENTITY_SEQUENCE.captures(statement)?;
    let (owning_schema, owning_table) = qualified_at(&caps, 1)?;
    let column = ident_at(&caps, 5)?;
    let (sequence_schema, sequence_name) = qualified_at(&caps, 7)?;
    let (prefix, definition) = split_at_match(statement, &caps);
    Some(Classification {
        residual_prefix: prefix,
        classified: Classified::Attachable(AttachableStatement {
            kind: AttachableKind::Sequence,
            owning_schema,
            owning_table,
            name: Some(format!("{}.{}", sequence_schema, sequence_name)),
            column: Some(column),
            definition,
        }),
    })
}

fn try_add_constraint(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "CONSTRAINT") {
        return None;
    }
    let caps = ADD_CONSTRAINT.captures(statement)?;
    let (owning_schema, owning_table) = qualified_at(&caps, 1)?;
    let name = ident_at(&caps, 5)?;
    let (prefix, definition) = split_at_match(statement, &caps);
    Some(Classification {
        residual_prefix: prefix,
        classified: Classified::Attachable(AttachableStatement {
            kind: AttachableKind::Constraint,
            owning_schema,
            owning_table,
            name: Some(name),
            column: None,
            definition,
        }),
    })
}

fn try_create_index(statement: &str) -> Option<Classification> {
    if !contains_ci(statement, "INDEX") {
        return None;
    }
    let caps = CREATE_INDEX.captures(statement)?;
    let name = ident_at(&caps, 1);
    let (owning_schema, owning_table) = qualified_at(&caps, 3)?;
    let (prefix, definition) = split_at_match(statement, &caps);
    Some(Classification {
        residual_prefix: prefix,
        classified: Classified::Attachable(AttachableStatement {
            kind: AttachableKind::Index,
            owning_schema,
            owning_table,
            name,
            column: None,
            definition,
        }),
    })
}

/// Identifier captured at `first` (quoted) or `first + 1` (unquoted).
fn ident_at(caps: &Captures<'_>, first: usize) -> Option<String> {
    caps.get(first)
        .or_else(|| caps.get(first + 1))
        .map(|m| m.as_str().to_string())
}

/// Schema-qualified name captured starting at group `first` (four slots),
/// with the schema part defaulting to [`DEFAULT_SCHEMA`].
fn qualified_at(caps: &Captures<'_>, first: usize) -> Option<(String, String)> {
    let name = ident_at(caps, first + 2)?;
    let schema = ident_at(caps, first).unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    Some((schema, name))
}

/// Split a statement at the match start: text before it becomes the residual
/// prefix and the definition starts exactly at the matched keyword.
fn split_at_match(statement: &str, caps: &Captures<'_>) -> (Option<String>, String) {
    let start = caps.get(0).expect("whole match").start();
    if start == 0 {
        (None, statement.to_string())
    } else {
        (
            Some(statement[..start].to_string()),
            statement[start..].to_string(),
        )
    }
}
