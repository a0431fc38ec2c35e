//! Classified dump model

mod attach;
mod builder;
mod elements;

pub use builder::parse_dump;
pub use elements::{AttachableKind, AttachableStatement, ObjectKind, ParseResult, ParsedObject};
