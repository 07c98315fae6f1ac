use tracing::{debug, warn};

use super::base::ScalarTag;
use super::naming::identifier;
use super::response::{return_type, select_response};
use super::types::TypeTranslator;
use crate::config::Config;
use crate::error::{Result, TranslateError};
use crate::ir::{DEPRECATED_HINT, GqlAttribute, GqlOperation};
use crate::openapi::{Document, Method, Operation, ParameterOrRef, RefOr};

/// One REST operation -> one GraphQL field on `Query` or `Mutation`.
///
/// Failures come back wrapped with the `METHOD /path` origin.
pub fn translate_operation(
    doc: &Document,
    config: &Config,
    op: &Operation,
    path: &str,
    method: Method,
) -> Result<GqlOperation> {
    let origin = format!("{method} {path}");
    translate_operation_inner(doc, config, op, path, &origin).map_err(|err| err.in_operation(&origin))
}

fn translate_operation_inner(
    doc: &Document,
    config: &Config,
    op: &Operation,
    path: &str,
    origin: &str,
) -> Result<GqlOperation> {
    // operationId is optional upstream, the path is the fallback
    let raw_name = match op.operation_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("{origin} - has no operationId specified, using path");
            path
        }
    };
    let name = identifier(raw_name, &config.empty_identifier)?;

    let mut hints = Vec::new();
    if op.deprecated {
        hints.push(DEPRECATED_HINT.to_string());
    }

    let types = TypeTranslator::new(doc);
    let parameters = op
        .parameters
        .iter()
        .map(|parameter| translate_parameter(doc, config, &types, parameter))
        .collect::<Result<Vec<_>>>()?;

    let return_type = translate_return_type(doc, &types, op, origin).map_err(TranslateError::in_response)?;

    debug!("{origin} -> {name}: {return_type:?}");
    Ok(GqlOperation {
        origin: origin.to_string(),
        name,
        parameters,
        return_type,
        hints,
    })
}

fn translate_parameter(
    doc: &Document,
    config: &Config,
    types: &TypeTranslator<'_>,
    parameter: &ParameterOrRef,
) -> Result<GqlAttribute> {
    let parameter = match parameter {
        RefOr::Item(parameter) => parameter,
        RefOr::Ref { reference } => doc
            .resolve_parameter(parameter)
            .ok_or_else(|| TranslateError::UnresolvedReference { reference: reference.clone() })?,
    };

    let translate = || -> Result<GqlAttribute> {
        let name = identifier(&parameter.name, &config.empty_identifier)?;
        let ty = match &parameter.schema {
            Some(schema) => types.type_expression(schema)?,
            // content-based parameters carry no schema
            None => ScalarTag::String.to_string(),
        };
        // requiredness comes from the parameter, not from schema nullability
        Ok(GqlAttribute::new(name, ty, parameter.required).with_deprecation(parameter.deprecated))
    };
    translate().map_err(|err| err.in_parameter(&parameter.name))
}

fn translate_return_type(doc: &Document, types: &TypeTranslator<'_>, op: &Operation, origin: &str) -> Result<String> {
    let Some((label, response)) = select_response(&op.responses) else {
        warn!("{origin} - declares no responses, treating as no content");
        return Ok(String::new());
    };
    debug!("{origin} - using response {label}");
    let response = match response {
        RefOr::Item(response) => response,
        RefOr::Ref { reference } => doc
            .resolve_response(response)
            .ok_or_else(|| TranslateError::UnresolvedReference { reference: reference.clone() })?,
    };
    return_type(types, label, response)
}
