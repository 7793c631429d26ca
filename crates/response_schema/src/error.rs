use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing field definition in {definition:?}; expected 'name:type' or 'name:type:description'")]
    EmptyField { definition: String },

    #[error("invalid field definition '{field}'; expected 'name:type' or 'name:type:description', got {parts} part(s)")]
    InvalidFieldFormat { field: String, parts: usize },

    #[error("name and type cannot be empty in field definition '{field}'")]
    MissingNameOrType { field: String },

    #[error("field '{name}' is defined more than once")]
    DuplicateField { name: String },
}
