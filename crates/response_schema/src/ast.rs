use std::collections::BTreeMap;

/// One named property of an object schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub data_type: String,
    pub description: String,
}

/// Typed schema tree produced from the field-list notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Object with properties keyed (and therefore ordered) by name.
    Object { properties: BTreeMap<String, Field> },
    /// Array whose items all share one schema.
    Array { items: Box<SchemaNode> },
}

impl SchemaNode {
    #[must_use]
    pub fn object(properties: BTreeMap<String, Field>) -> Self {
        Self::Object { properties }
    }

    #[must_use]
    pub fn array_of(items: SchemaNode) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Property names of the outermost object, looking through array wrappers.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            Self::Object { properties } => properties.keys().map(String::as_str).collect(),
            Self::Array { items } => items.property_names(),
        }
    }
}
