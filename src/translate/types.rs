//! Schema -> GraphQL type expressions.
//!
//! Two entry points share one recursion:
//! - [`TypeTranslator::named_type`] for component schemas, which become declarations;
//! - [`TypeTranslator::type_expression`] for inline schemas, which become a type
//!   expression string wherever they are used. Inline objects are rendered as a
//!   `{field: Type!\n...}` block and never hoisted into their own declaration.
//!
//! References always stop the recursion by name, so cyclic component graphs terminate.
use indexmap::IndexMap;

use super::base::translate_base_type;
use crate::error::{Result, TranslateError};
use crate::ir::{GqlAttribute, GqlScalar, GqlType};
use crate::openapi::{Document, RefOr, Schema, SchemaNode, SchemaOrRef, reference_name};

pub const OBJECT_KIND: &str = "object";

#[derive(Clone, Copy)]
pub struct TypeTranslator<'a> {
    schemas: Option<&'a IndexMap<String, SchemaOrRef>>,
}

impl<'a> TypeTranslator<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { schemas: doc.schemas() }
    }

    /// Component schema -> declaration.
    pub fn named_type(&self, name: &str, schema: &SchemaOrRef) -> Result<GqlType> {
        let (kind, attributes) = match schema {
            // alias of another component; declared as a scalar later on
            RefOr::Ref { reference } => (reference_name(reference).to_string(), Vec::new()),
            RefOr::Item(schema) => match schema.node() {
                SchemaNode::Object(properties) => (OBJECT_KIND.to_string(), self.attributes(properties)?),
                SchemaNode::Array(items) => (self.array(items)?, Vec::new()),
                SchemaNode::Primitive(tag) => (translate_base_type(tag)?.to_string(), Vec::new()),
            },
        };
        Ok(GqlType { name: name.to_string(), kind, attributes })
    }

    /// Inline schema or reference -> type expression.
    pub fn type_expression(&self, schema: &SchemaOrRef) -> Result<String> {
        match schema {
            RefOr::Ref { reference } => Ok(reference_name(reference).to_string()),
            RefOr::Item(schema) => self.inline(schema),
        }
    }

    fn inline(&self, schema: &Schema) -> Result<String> {
        match schema.node() {
            SchemaNode::Object(properties) => Ok(inline_object(&self.attributes(properties)?)),
            SchemaNode::Array(items) => self.array(items),
            SchemaNode::Primitive(tag) => Ok(translate_base_type(tag)?.to_string()),
        }
    }

    fn array(&self, items: Option<&SchemaOrRef>) -> Result<String> {
        let items = items.ok_or(TranslateError::ArrayWithoutItems)?;
        Ok(format!("[{}]", self.type_expression(items)?))
    }

    /// Properties in declaration order. `required` is `!nullable`; the object's
    /// own `required` list is not consulted.
    pub fn attributes(&self, properties: &IndexMap<String, SchemaOrRef>) -> Result<Vec<GqlAttribute>> {
        properties
            .iter()
            .map(|(name, property)| self.attribute(name, property))
            .collect()
    }

    fn attribute(&self, name: &str, property: &SchemaOrRef) -> Result<GqlAttribute> {
        match property {
            RefOr::Ref { reference } => {
                let required = !self.is_nullable_reference(reference);
                Ok(GqlAttribute::new(name, reference_name(reference), required))
            }
            RefOr::Item(schema) => {
                let ty = self.inline(schema)?;
                Ok(GqlAttribute::new(name, ty, !schema.is_nullable()).with_deprecation(schema.deprecated))
            }
        }
    }

    // one hop only; unknown targets count as non-nullable
    fn is_nullable_reference(&self, reference: &str) -> bool {
        match self.schemas.and_then(|schemas| schemas.get(reference_name(reference))) {
            Some(RefOr::Item(schema)) => schema.is_nullable(),
            _ => false,
        }
    }
}

fn inline_object(attributes: &[GqlAttribute]) -> String {
    let mut out = String::from("{");
    for attr in attributes {
        out.push_str(&attr.name);
        out.push_str(": ");
        out.push_str(&attr.ty);
        if attr.required {
            out.push('!');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

/// Types without attributes are scalars; everything else keeps its relative order.
pub fn partition(types: Vec<GqlType>) -> (Vec<GqlType>, Vec<GqlScalar>) {
    let (scalars, types): (Vec<_>, Vec<_>) = types.into_iter().partition(GqlType::is_scalar);
    let scalars = scalars.into_iter().map(|t| GqlScalar { name: t.name }).collect();
    (types, scalars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(schemas: serde_json::Value) -> Document {
        serde_json::from_value(json!({
            "openapi": "3.0.3",
            "paths": {},
            "components": { "schemas": schemas }
        }))
        .unwrap()
    }

    fn schema(value: serde_json::Value) -> SchemaOrRef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn arrays_wrap_in_brackets() {
        let doc = document(json!({}));
        let tr = TypeTranslator::new(&doc);
        let users = schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/User" } }));
        assert_eq!(tr.type_expression(&users).unwrap(), "[User]");

        let nested = schema(json!({ "type": "array", "items": { "type": "array", "items": { "type": "string" } } }));
        assert_eq!(tr.type_expression(&nested).unwrap(), "[[String]]");
    }

    #[test]
    fn inline_objects_become_literal_blocks() {
        let doc = document(json!({}));
        let tr = TypeTranslator::new(&doc);
        let obj = schema(json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "tag": { "type": "string", "nullable": true },
                "owner": { "type": "object", "properties": { "name": { "type": "string" } } }
            }
        }));
        assert_eq!(tr.type_expression(&obj).unwrap(), "{id: Int!\ntag: String\nowner: {name: String!\n}!\n}");
    }

    #[test]
    fn named_object_keeps_declaration_order() {
        let doc = document(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer", "deprecated": true },
                    "owner": { "$ref": "#/components/schemas/Owner" },
                    "vet": { "$ref": "#/components/schemas/Vet" }
                }
            },
            "Owner": { "type": "object", "properties": { "pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } } },
            "Vet": { "type": "object", "nullable": true, "properties": { "name": { "type": "string" } } }
        }));
        let tr = TypeTranslator::new(&doc);
        let pet = tr.named_type("Pet", doc.schema("Pet").unwrap()).unwrap();
        assert_eq!(pet.kind, "object");
        let names: Vec<_> = pet.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "owner", "vet"]);
        assert_eq!(pet.attributes[1].hints, vec!["@deprecated".to_string()]);
        assert_eq!(pet.attributes[2], GqlAttribute::new("owner", "Owner", true));
        assert_eq!(pet.attributes[3], GqlAttribute::new("vet", "Vet", false));

        // Pet -> Owner -> [Pet] terminates on the reference
        let owner = tr.named_type("Owner", doc.schema("Owner").unwrap()).unwrap();
        assert_eq!(owner.attributes[0].ty, "[Pet]");
    }

    #[test]
    fn unknown_primitive_is_fatal() {
        let doc = document(json!({}));
        let tr = TypeTranslator::new(&doc);
        let obj = schema(json!({ "type": "object", "properties": { "blob": { "type": "file" } } }));
        let err = tr.type_expression(&obj).unwrap_err();
        assert!(matches!(err, TranslateError::UnknownBaseType { tag } if tag == "file"));
    }

    #[test]
    fn array_without_items_is_fatal() {
        let doc = document(json!({}));
        let tr = TypeTranslator::new(&doc);
        let err = tr.type_expression(&schema(json!({ "type": "array" }))).unwrap_err();
        assert!(matches!(err, TranslateError::ArrayWithoutItems));
    }

    #[test]
    fn fieldless_types_partition_into_scalars() {
        let doc = document(json!({
            "Empty": { "type": "object" },
            "Id": { "type": "string" },
            "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
            "Pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } },
            "Alias": { "$ref": "#/components/schemas/Pet" }
        }));
        let tr = TypeTranslator::new(&doc);
        let types = doc
            .schemas()
            .unwrap()
            .iter()
            .map(|(name, schema)| tr.named_type(name, schema))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(types[3].kind, "[Pet]");

        let (types, scalars) = partition(types);
        assert_eq!(types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Pet"]);
        assert_eq!(
            scalars.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["Empty", "Id", "Pets", "Alias"]
        );
    }
}
