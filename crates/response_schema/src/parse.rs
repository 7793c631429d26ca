use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::ast::{Field, SchemaNode};
use crate::error::SchemaError;

/// Leading marker that wraps the object schema in an array.
pub const ARRAY_PREFIX: &str = "[]";
/// Separates field specs.
pub const FIELD_DELIMITER: char = '|';
/// Separates name, type and description within one field spec.
pub const ATTRIBUTE_DELIMITER: char = ':';

/// Parses `[]?name:type[:description]|...` into a schema tree.
///
/// Any malformed field aborts the whole parse.
pub fn parse_definition(definition: &str) -> Result<SchemaNode, SchemaError> {
    let trimmed = definition.trim();
    let (is_array, fields) = match trimmed.strip_prefix(ARRAY_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut properties = BTreeMap::new();

    for raw in fields.split(FIELD_DELIMITER) {
        let field = raw.trim();
        if field.is_empty() {
            return Err(SchemaError::EmptyField {
                definition: definition.to_owned(),
            });
        }

        let (name, parsed) = parse_field(field)?;
        match properties.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(parsed);
            }
            Entry::Occupied(slot) => {
                return Err(SchemaError::DuplicateField {
                    name: slot.key().clone(),
                });
            }
        }
    }

    let object = SchemaNode::object(properties);
    Ok(if is_array {
        SchemaNode::array_of(object)
    } else {
        object
    })
}

fn parse_field(field: &str) -> Result<(String, Field), SchemaError> {
    let attributes = field.split(ATTRIBUTE_DELIMITER).collect::<Vec<_>>();
    if !matches!(attributes.len(), 2 | 3) {
        return Err(SchemaError::InvalidFieldFormat {
            field: field.to_owned(),
            parts: attributes.len(),
        });
    }

    let name = attributes[0].trim();
    let data_type = attributes[1].trim();
    let description = attributes.get(2).map(|value| value.trim()).unwrap_or("");

    if name.is_empty() || data_type.is_empty() {
        return Err(SchemaError::MissingNameOrType {
            field: field.to_owned(),
        });
    }

    Ok((
        name.to_owned(),
        Field {
            data_type: data_type.to_owned(),
            description: description.to_owned(),
        },
    ))
}
