//! OpenAPI document -> GraphQL IR.
//!
//! One pass, no I/O:
//! - every component schema becomes a [`GqlType`]; field-less ones are split off as scalars;
//! - every GET becomes a query, every POST/PUT/DELETE a mutation.
//!
//! Output order is fixed by [`Ordering`], never by completion order, so the
//! `parallel` setting changes nothing but wall time. When several items fail,
//! the error reported is the first one in output order.
pub mod base;
pub mod naming;
pub mod operation;
pub mod response;
pub mod types;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{Config, Ordering};
use crate::error::Result;
use crate::ir::{GqlOperation, GqlScalar, GqlSpec, GqlType};
use crate::openapi::{Document, Method, Operation, SchemaOrRef};

pub use base::{ScalarTag, translate_base_type};
pub use naming::sanitize_identifier;
pub use operation::translate_operation;
pub use response::select_response;
pub use types::{TypeTranslator, partition};

// ------------------------------- Front API -------------------------------- //

pub fn translate_document(doc: &Document, config: &Config) -> Result<GqlSpec> {
    let (types, scalars) = translate_schemas(doc, config)?;
    let (queries, mutations) = translate_paths(doc, config)?;
    info!(
        types = types.len(),
        scalars = scalars.len(),
        queries = queries.len(),
        mutations = mutations.len(),
        "translated document"
    );
    Ok(GqlSpec {
        generation_time: Utc::now(),
        types,
        scalars,
        queries,
        mutations,
    })
}

// ------------------------------- Schemas ---------------------------------- //

pub fn translate_schemas(doc: &Document, config: &Config) -> Result<(Vec<GqlType>, Vec<GqlScalar>)> {
    let mut named: Vec<(&String, &SchemaOrRef)> = doc.schemas().map(|s| s.iter().collect()).unwrap_or_default();
    if config.ordering == Ordering::Lexicographic {
        named.sort_by(|a, b| a.0.cmp(b.0));
    }
    debug!("translating {} named schemas", named.len());

    let translator = TypeTranslator::new(doc);
    let types = run_all(&named, config.parallel, |(name, schema)| {
        translator.named_type(name, schema).map_err(|err| err.in_schema(name))
    })
    .into_iter()
    .collect::<Result<Vec<_>>>()?;

    Ok(partition(types))
}

// -------------------------------- Paths ----------------------------------- //

struct Job<'a> {
    path: &'a str,
    method: Method,
    op: &'a Operation,
}

pub fn translate_paths(doc: &Document, config: &Config) -> Result<(Vec<GqlOperation>, Vec<GqlOperation>)> {
    let mut paths: Vec<_> = doc.paths.iter().collect();
    if config.ordering == Ordering::Lexicographic {
        paths.sort_by(|a, b| a.0.cmp(b.0));
    }

    let mut jobs = Vec::new();
    for (path, item) in paths {
        for ignored in item.ignored_methods() {
            debug!("{ignored} {path} - method has no GraphQL counterpart, skipping");
        }
        jobs.extend(item.operations().map(|(method, op)| Job { path: path.as_str(), method, op }));
    }

    let results = run_all(&jobs, config.parallel, |job| {
        translate_operation(doc, config, job.op, job.path, job.method)
    });

    let mut queries = Vec::new();
    let mut mutations = Vec::new();
    for (job, result) in jobs.iter().zip(results) {
        let operation = result?;
        if job.method.is_query() {
            queries.push(operation);
        } else {
            mutations.push(operation);
        }
    }
    Ok((queries, mutations))
}

// ------------------------------- Utilities -------------------------------- //

/// Maps in input order; on the rayon pool when `parallel` is set.
fn run_all<T, R, F>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::ir::GqlAttribute;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn petstore() -> Document {
        document(json!({
            "openapi": "3.0.3",
            "info": { "title": "Petstore", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": { "default": { "content": { "application/json": {
                            "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
                        } } } }
                    }
                }
            },
            "components": { "schemas": {
                "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
            } }
        }))
    }

    #[test]
    fn petstore_end_to_end() {
        let spec = translate_document(&petstore(), &Config::default()).unwrap();
        assert_eq!(spec.types, vec![GqlType {
            name: "Pet".into(),
            kind: "object".into(),
            attributes: vec![GqlAttribute::new("name", "String", true)],
        }]);
        assert!(spec.scalars.is_empty());
        assert!(spec.mutations.is_empty());
        assert_eq!(spec.queries.len(), 1);
        assert_eq!(spec.queries[0].name, "listPets");
        assert_eq!(spec.queries[0].return_type, "[Pet]");
        assert!(spec.queries[0].parameters.is_empty());
    }

    fn crud() -> Document {
        document(json!({
            "openapi": "3.0.3",
            "paths": {
                "/zoo": {
                    "delete": { "operationId": "clearZoo", "responses": { "204": {} } },
                    "get": { "operationId": "getZoo", "responses": { "200": { "content": { "text/plain": {} } } } },
                    "patch": { "operationId": "patchZoo", "responses": {} }
                },
                "/animals": {
                    "put": { "operationId": "putAnimal", "responses": {} },
                    "post": { "operationId": "addAnimal", "responses": {} },
                    "get": { "operationId": "listAnimals", "responses": {} }
                }
            },
            "components": { "schemas": {
                "Zebra": { "type": "string" },
                "Animal": { "type": "object", "properties": { "id": { "type": "integer" } } },
                "Id": { "type": "integer" }
            } }
        }))
    }

    fn names(ops: &[GqlOperation]) -> Vec<&str> {
        ops.iter().map(|op| op.name.as_str()).collect()
    }

    #[test]
    fn classifies_methods_in_source_order() {
        let spec = translate_document(&crud(), &Config::default()).unwrap();
        assert_eq!(names(&spec.queries), vec!["getZoo", "listAnimals"]);
        assert_eq!(names(&spec.mutations), vec!["clearZoo", "addAnimal", "putAnimal"]);
        let scalars: Vec<_> = spec.scalars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(scalars, vec!["Zebra", "Id"]);
    }

    #[test]
    fn lexicographic_ordering_sorts_schemas_and_paths() {
        let config = Config { ordering: Ordering::Lexicographic, ..Config::default() };
        let spec = translate_document(&crud(), &config).unwrap();
        assert_eq!(names(&spec.queries), vec!["listAnimals", "getZoo"]);
        assert_eq!(names(&spec.mutations), vec!["addAnimal", "putAnimal", "clearZoo"]);
        let scalars: Vec<_> = spec.scalars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(scalars, vec!["Id", "Zebra"]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let sequential = translate_document(&crud(), &Config::default()).unwrap();
        let parallel = translate_document(&crud(), &Config { parallel: true, ..Config::default() }).unwrap();
        assert_eq!(sequential.types, parallel.types);
        assert_eq!(sequential.scalars, parallel.scalars);
        assert_eq!(sequential.queries, parallel.queries);
        assert_eq!(sequential.mutations, parallel.mutations);
    }

    #[test]
    fn first_failure_in_order_aborts_the_run() {
        let doc = document(json!({
            "openapi": "3.0.3",
            "paths": {
                "/a": { "get": { "operationId": "a", "responses": { "200": { "content": { "application/json": { "schema": { "type": "blob" } } } } } } },
                "/b": { "get": { "operationId": "b", "responses": { "200": { "content": { "application/json": { "schema": { "type": "clob" } } } } } } }
            }
        }));
        for parallel in [false, true] {
            let err = translate_document(&doc, &Config { parallel, ..Config::default() }).unwrap_err();
            assert!(matches!(&err, TranslateError::OperationTranslationFailed { origin, .. } if origin == "GET /a"));
        }
    }

    #[test]
    fn broken_schema_aborts_with_its_name() {
        let doc = document(json!({
            "openapi": "3.0.3",
            "components": { "schemas": { "Bad": { "type": "object", "properties": { "x": { "type": "uuid" } } } } }
        }));
        let err = translate_document(&doc, &Config::default()).unwrap_err();
        assert!(matches!(&err, TranslateError::SchemaTranslationFailed { name, .. } if name == "Bad"));
    }
}
