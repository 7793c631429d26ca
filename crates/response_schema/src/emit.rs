use serde_json::Value;

use crate::ast::{Field, SchemaNode};

/// Serializes a schema tree with a fixed key order and no whitespace.
///
/// Objects emit `type` then `properties`; properties appear in lexicographic
/// name order and each emits `type` then `description`. Arrays emit `type`
/// then `items`.
#[must_use]
pub fn to_canonical_json(node: &SchemaNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &SchemaNode) {
    match node {
        SchemaNode::Object { properties } => {
            out.push_str(r#"{"type":"object","properties":{"#);
            for (index, (name, field)) in properties.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_string(out, name);
                out.push(':');
                write_field(out, field);
            }
            out.push_str("}}");
        }
        SchemaNode::Array { items } => {
            out.push_str(r#"{"type":"array","items":"#);
            write_node(out, items);
            out.push('}');
        }
    }
}

fn write_field(out: &mut String, field: &Field) {
    out.push_str(r#"{"type":"#);
    write_string(out, &field.data_type);
    out.push_str(r#","description":"#);
    write_string(out, &field.description);
    out.push('}');
}

fn write_string(out: &mut String, value: &str) {
    out.push_str(&Value::String(value.to_owned()).to_string());
}
