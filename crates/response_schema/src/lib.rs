//! Compact field-list notation for structured-output schemas.
//!
//! A definition is one of:
//!
//! - empty: no schema;
//! - a literal JSON Schema starting with `{`, passed through verbatim;
//! - `name:type[:description]|...`, optionally prefixed with `[]` to request an
//!   array of such objects.
//!
//! Compiled schemas are emitted by a canonical serializer with properties in
//! lexicographic name order, so identical input always yields identical bytes.

mod ast;
mod emit;
mod error;
mod parse;

pub use ast::{Field, SchemaNode};
pub use emit::to_canonical_json;
pub use error::SchemaError;
pub use parse::{parse_definition, ARRAY_PREFIX, ATTRIBUTE_DELIMITER, FIELD_DELIMITER};

/// Compiles a definition into a JSON Schema string.
///
/// Returns `Ok(None)` for an empty definition.
pub fn compile(definition: &str) -> Result<Option<String>, SchemaError> {
    let trimmed = definition.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') {
        return Ok(Some(definition.to_owned()));
    }

    let node = parse_definition(trimmed)?;
    Ok(Some(to_canonical_json(&node)))
}
