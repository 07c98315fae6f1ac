//! Typed view of the OpenAPI 3.x subset the translator consumes.
//!
//! All maps are `IndexMap`s so declaration order survives deserialization
//! (`serde_json` is built with `preserve_order`, `serde_yaml` keeps mapping order).
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

const SCHEMAS_PREFIX: &str = "#/components/schemas/";
const PARAMETERS_PREFIX: &str = "#/components/parameters/";
const RESPONSES_PREFIX: &str = "#/components/responses/";

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "deserialize_version")]
    pub openapi: String,
    #[serde(default)]
    pub info: Option<Info>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Option<Components>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "string_keyed")]
    pub schemas: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// Either a `$ref` pointer or an inline value.
#[derive(Debug, Clone)]
pub enum RefOr<T> {
    Ref { reference: String },
    Item(T),
}

/// Nodes that may stand in for a `$ref`. The pointer is read as an ordinary
/// field, so the node streams straight into `T` and parse errors keep their path.
pub trait Referable {
    fn take_reference(&mut self) -> Option<String>;
}

impl<T: Referable> Referable for Box<T> {
    fn take_reference(&mut self) -> Option<String> {
        (**self).take_reference()
    }
}

impl<'de, T> Deserialize<'de> for RefOr<T>
where
    T: Deserialize<'de> + Referable,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut item = T::deserialize(deserializer)?;
        Ok(match item.take_reference() {
            Some(reference) => RefOr::Ref { reference },
            None => RefOr::Item(item),
        })
    }
}

pub type SchemaOrRef = RefOr<Box<Schema>>;
pub type ParameterOrRef = RefOr<Parameter>;
pub type ResponseOrRef = RefOr<Response>;

/// Unquoted `openapi: 3.0` is a YAML float.
fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(f64),
    }
    Ok(match Version::deserialize(deserializer)? {
        Version::Text(text) => text,
        Version::Number(number) => format!("{number:?}"),
    })
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS & OPERATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub head: Option<Operation>,
    pub options: Option<Operation>,
    pub trace: Option<Operation>,
}

/// The HTTP methods that map onto GraphQL operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// GET reads, everything else writes.
    pub fn is_query(self) -> bool {
        matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PathItem {
    /// Supported operations in a fixed GET, POST, PUT, DELETE order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        [
            (Method::Get, self.get.as_ref()),
            (Method::Post, self.post.as_ref()),
            (Method::Put, self.put.as_ref()),
            (Method::Delete, self.delete.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }

    /// Names of declared methods that have no GraphQL counterpart.
    pub fn ignored_methods(&self) -> Vec<&'static str> {
        [
            ("PATCH", self.patch.is_some()),
            ("HEAD", self.head.is_some()),
            ("OPTIONS", self.options.is_some()),
            ("TRACE", self.trace.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub responses: IndexMap<String, ResponseOrRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    /// Missing only on malformed documents; `validate` reports it.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub deprecated: bool,
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}

impl Referable for Parameter {
    fn take_reference(&mut self) -> Option<String> {
        self.reference.take()
    }
}

impl Referable for Response {
    fn take_reference(&mut self) -> Option<String> {
        self.reference.take()
    }
}

/// A mapping key. YAML reads unquoted `200:` or `404:` as integers, JSON only
/// ever has strings.
#[derive(PartialEq, Eq, Hash)]
struct Key(String);

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or integer key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Key, E> {
                Ok(Key(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Key, E> {
                Ok(Key(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Key, E> {
                Ok(Key(v.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

fn string_keyed<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = IndexMap::<Key, V>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(Key(key), value)| (key, value)).collect())
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMAS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub properties: IndexMap<String, SchemaOrRef>,
    pub items: Option<SchemaOrRef>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub deprecated: bool,
}

impl Referable for Schema {
    fn take_reference(&mut self) -> Option<String> {
        self.reference.take()
    }
}

/// `type: string` (3.0) or `type: [string, "null"]` (3.1).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Closed set of shapes a schema can take once references are peeled off.
#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    Object(&'a IndexMap<String, SchemaOrRef>),
    Array(Option<&'a SchemaOrRef>),
    Primitive(&'a str),
}

impl Schema {
    pub fn type_tag(&self) -> Option<&str> {
        match self.schema_type.as_ref()? {
            SchemaType::Single(tag) => Some(tag.as_str()),
            SchemaType::Multiple(tags) => tags.iter().map(String::as_str).find(|tag| *tag != "null"),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
            || matches!(&self.schema_type, Some(SchemaType::Multiple(tags)) if tags.iter().any(|tag| tag == "null"))
    }

    /// An explicit `type` wins; otherwise the shape is guessed from `properties`/`items`.
    pub fn node(&self) -> SchemaNode<'_> {
        match self.type_tag() {
            Some("object") => SchemaNode::Object(&self.properties),
            Some("array") => SchemaNode::Array(self.items.as_ref()),
            Some(tag) => SchemaNode::Primitive(tag),
            None if !self.properties.is_empty() => SchemaNode::Object(&self.properties),
            None if self.items.is_some() => SchemaNode::Array(self.items.as_ref()),
            None => SchemaNode::Primitive(""),
        }
    }
}

/// `#/components/schemas/User` -> `User`
pub fn reference_name(reference: &str) -> &str {
    reference.rsplit_once('/').map_or(reference, |(_, name)| name)
}

// ————————————————————————————————————————————————————————————————————————————
// LOOKUPS
// ————————————————————————————————————————————————————————————————————————————

impl Document {
    pub fn schemas(&self) -> Option<&IndexMap<String, SchemaOrRef>> {
        self.components.as_ref().map(|c| &c.schemas)
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaOrRef> {
        self.schemas()?.get(name)
    }

    pub fn resolve_parameter<'a>(&'a self, parameter: &'a ParameterOrRef) -> Option<&'a Parameter> {
        match parameter {
            RefOr::Item(parameter) => Some(parameter),
            RefOr::Ref { reference } => {
                let name = reference.strip_prefix(PARAMETERS_PREFIX)?;
                self.components.as_ref()?.parameters.get(name)
            }
        }
    }

    pub fn resolve_response<'a>(&'a self, response: &'a ResponseOrRef) -> Option<&'a Response> {
        match response {
            RefOr::Item(response) => Some(response),
            RefOr::Ref { reference } => {
                let name = reference.strip_prefix(RESPONSES_PREFIX)?;
                self.components.as_ref()?.responses.get(name)
            }
        }
    }

    /// Structural checks the translator relies on. All problems are collected.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if !self.openapi.starts_with("3.") {
            problems.push(format!("unsupported openapi version \"{}\", expected 3.x", self.openapi));
        }
        if let Some(components) = &self.components {
            for (name, schema) in &components.schemas {
                self.validate_schema(&format!("components.schemas.{name}"), schema, &mut problems);
            }
            for (name, parameter) in &components.parameters {
                self.validate_parameter(&format!("components.parameters.{name}"), parameter, &mut problems);
            }
            for (name, response) in &components.responses {
                self.validate_response(&format!("components.responses.{name}"), response, &mut problems);
            }
        }
        for (path, item) in &self.paths {
            for (method, op) in item.operations() {
                let at = format!("paths.{path}.{}", method.as_str().to_lowercase());
                for (idx, parameter) in op.parameters.iter().enumerate() {
                    let at = format!("{at}.parameters[{idx}]");
                    match (parameter, self.resolve_parameter(parameter)) {
                        (RefOr::Item(parameter), _) => self.validate_parameter(&at, parameter, &mut problems),
                        (RefOr::Ref { .. }, Some(_)) => {}
                        (RefOr::Ref { reference }, None) => {
                            problems.push(format!("{at}: unresolved parameter reference {reference}"))
                        }
                    }
                }
                for (label, response) in &op.responses {
                    let at = format!("{at}.responses.{label}");
                    match (response, self.resolve_response(response)) {
                        (RefOr::Item(response), _) => self.validate_response(&at, response, &mut problems),
                        (RefOr::Ref { .. }, Some(_)) => {}
                        (RefOr::Ref { reference }, None) => {
                            problems.push(format!("{at}: unresolved response reference {reference}"))
                        }
                    }
                }
            }
        }
        if problems.is_empty() { Ok(()) } else { Err(problems) }
    }

    fn validate_parameter(&self, at: &str, parameter: &Parameter, problems: &mut Vec<String>) {
        if parameter.name.is_empty() {
            problems.push(format!("{at}: parameter without name"));
        }
        if let Some(schema) = &parameter.schema {
            self.validate_schema(&format!("{at}.schema"), schema, problems);
        }
    }

    fn validate_response(&self, at: &str, response: &Response, problems: &mut Vec<String>) {
        for (mime, media) in &response.content {
            if let Some(schema) = &media.schema {
                self.validate_schema(&format!("{at}.content.{mime}.schema"), schema, problems);
            }
        }
    }

    fn validate_schema(&self, at: &str, schema: &SchemaOrRef, problems: &mut Vec<String>) {
        let schema = match schema {
            RefOr::Ref { reference } => {
                match reference.strip_prefix(SCHEMAS_PREFIX) {
                    Some(name) if self.schema(name).is_some() => {}
                    Some(_) => problems.push(format!("{at}: unresolved schema reference {reference}")),
                    None => problems.push(format!("{at}: unsupported reference {reference}")),
                }
                return;
            }
            RefOr::Item(schema) => schema,
        };
        match schema.node() {
            SchemaNode::Object(properties) => {
                for (name, property) in properties {
                    self.validate_schema(&format!("{at}.properties.{name}"), property, problems);
                }
            }
            SchemaNode::Array(Some(items)) => self.validate_schema(&format!("{at}.items"), items, problems),
            SchemaNode::Array(None) => problems.push(format!("{at}: array schema without items")),
            SchemaNode::Primitive(_) => {}
        }
    }
}
