// GraphQL-side IR for codegen. No OpenAPI types here.
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GqlType {
    pub name: String,
    /// Base scalar tag, `object`, or a bracketed `[...]` expression.
    pub kind: String,
    pub attributes: Vec<GqlAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GqlAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GqlScalar {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlOperation {
    pub origin: String,   // e.g. "GET /users/{id}"
    pub name: String,
    pub parameters: Vec<GqlAttribute>,
    pub return_type: String, // empty for no-content responses
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlSpec {
    pub generation_time: DateTime<Utc>,
    pub types: Vec<GqlType>,
    pub scalars: Vec<GqlScalar>,
    pub queries: Vec<GqlOperation>,
    pub mutations: Vec<GqlOperation>,
}

pub const DEPRECATED_HINT: &str = "@deprecated";

impl GqlType {
    /// No fields means it gets declared as a `scalar`.
    pub fn is_scalar(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl GqlAttribute {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, required: bool) -> Self {
        Self { name: name.into(), ty: ty.into(), required, hints: Vec::new() }
    }

    pub fn with_deprecation(mut self, deprecated: bool) -> Self {
        if deprecated {
            self.hints.push(DEPRECATED_HINT.to_string());
        }
        self
    }
}
