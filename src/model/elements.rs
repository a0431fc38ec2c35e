//! Classified dump model element types

use std::fmt;

/// The kind of a terminal object, each of which gets its own output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Schema,
    Extension,
    Type,
    Domain,
    Function,
    Procedure,
    Table,
    View,
}

impl ObjectKind {
    /// Directory the object's file is written under
    pub fn directory(&self) -> &'static str {
        match self {
            ObjectKind::Schema => "schemas",
            ObjectKind::Extension => "extensions",
            ObjectKind::Type => "types",
            ObjectKind::Domain => "domains",
            ObjectKind::Function => "functions",
            ObjectKind::Procedure => "procedures",
            ObjectKind::Table => "tables",
            ObjectKind::View => "views",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Schema => write!(f, "schema"),
            ObjectKind::Extension => write!(f, "extension"),
            ObjectKind::Type => write!(f, "type"),
            ObjectKind::Domain => write!(f, "domain"),
            ObjectKind::Function => write!(f, "function"),
            ObjectKind::Procedure => write!(f, "procedure"),
            ObjectKind::Table => write!(f, "table"),
            ObjectKind::View => write!(f, "view"),
        }
    }
}

/// A classified object together with its source text.
///
/// `definition` starts at the statement's matched keyword and is edited in
/// place when sequences, constraints, or indexes are attached; the
/// `sequences`/`constraints`/`indexes` lists record what was attached.
#[derive(Debug, Clone)]
pub struct ParsedObject {
    pub kind: ObjectKind,
    pub schema: String,
    pub name: String,
    pub definition: String,
    pub sequences: Vec<String>,
    pub constraints: Vec<String>,
    pub indexes: Vec<String>,
}

impl ParsedObject {
    pub fn new(kind: ObjectKind, schema: String, name: String, definition: String) -> Self {
        Self {
            kind,
            schema,
            name,
            definition,
            sequences: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// `schema.name`, or the bare name for schema objects (which are not
    /// themselves schema-qualified).
    pub fn qualified_name(&self) -> String {
        match self.kind {
            ObjectKind::Schema => self.name.clone(),
            _ => format!("{}.{}", self.schema, self.name),
        }
    }
}

/// Statement kinds that never produce their own output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachableKind {
    Sequence,
    Constraint,
    Index,
}

/// A statement that is merged into its owning table or view.
///
/// `column` is set only for identity sequences; `name` is absent only for
/// unnamed indexes.
#[derive(Debug, Clone)]
pub struct AttachableStatement {
    pub kind: AttachableKind,
    pub owning_schema: String,
    pub owning_table: String,
    pub name: Option<String>,
    pub column: Option<String>,
    pub definition: String,
}

impl AttachableStatement {
    /// Qualified name of the table or view this statement belongs to
    pub fn owner_qualified_name(&self) -> String {
        format!("{}.{}", self.owning_schema, self.owning_table)
    }
}

/// The complete outcome of parsing one dump
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Terminal objects in discovery order
    pub objects: Vec<ParsedObject>,
    /// Source-ordered text that belonged to no recognized statement
    pub residual: String,
}
