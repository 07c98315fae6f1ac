use crate::error::{Result, TranslateError};

/// GraphQL built-in scalars an OpenAPI primitive can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarTag {
    String,
    Float,
    Int,
    Boolean,
}

impl ScalarTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarTag::String => "String",
            ScalarTag::Float => "Float",
            ScalarTag::Int => "Int",
            ScalarTag::Boolean => "Boolean",
        }
    }
}

impl std::fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn translate_base_type(tag: &str) -> Result<ScalarTag> {
    match tag {
        "string" => Ok(ScalarTag::String),
        "number" => Ok(ScalarTag::Float),
        "integer" => Ok(ScalarTag::Int),
        "boolean" => Ok(ScalarTag::Boolean),
        other => Err(TranslateError::UnknownBaseType { tag: other.to_string() }),
    }
}
