//! Build the parse result from raw dump text
//!
//! This drives the whole pipeline: tokenize the dump on `;`, classify each
//! non-blank statement, route attachable statements into a side list, then
//! fold the side list into the owning tables and views. Everything that
//! matched no statement form ends up in the residual text, in source order.
//!
//! The function is pure: it holds no state between calls, so independent
//! dumps can be parsed concurrently by callers.

use crate::parser::{classify, split_statements, Classified};

use super::attach::attach_to_owners;
use super::elements::{AttachableStatement, ParseResult, ParsedObject};

/// Parse one complete schema dump into classified objects plus residual.
pub fn parse_dump(text: &str) -> ParseResult {
    let mut objects: Vec<ParsedObject> = Vec::new();
    let mut attachables: Vec<AttachableStatement> = Vec::new();
    let mut residual: Vec<String> = Vec::new();

    for statement in split_statements(text, ';') {
        if statement.trim().is_empty() {
            continue;
        }
        match classify(&statement) {
            Some(classification) => {
                if let Some(prefix) = classification.residual_prefix {
                    let prefix = prefix.trim();
                    if !prefix.is_empty() {
                        residual.push(prefix.to_string());
                    }
                }
                match classification.classified {
                    Classified::Object(object) => objects.push(object),
                    Classified::Attachable(attachable) => attachables.push(attachable),
                }
            }
            None => residual.push(statement.trim().to_string()),
        }
    }

    attach_to_owners(&mut objects, attachables);

    ParseResult {
        objects,
        residual: residual.join("\n").trim().to_string(),
    }
}
