//! Picks the one response an operation returns in GraphQL and resolves its body type.
//!
//! Ranking while scanning labels in declaration order:
//! 1. `default` (any case) wins on the spot.
//! 2. Otherwise the lowest recognized HTTP status code in `200..300`.
//! 3. Otherwise whatever label came first.
use indexmap::IndexMap;
use reqwest::StatusCode;
use tracing::warn;

use super::base::ScalarTag;
use super::types::TypeTranslator;
use crate::error::{Result, TranslateError};
use crate::openapi::{MediaType, Response, ResponseOrRef};

const JSON_MIME: &str = "application/json";
const TEXT_MIME: &str = "text/plain";

/// A code with a registered reason phrase (`200 OK`, `418 I'm a teapot`, ...).
pub fn is_http_status(code: u16) -> bool {
    StatusCode::from_u16(code).ok().and_then(|status| status.canonical_reason()).is_some()
}

fn success_code(label: &str) -> Option<u16> {
    let code = label.parse::<u16>().ok()?;
    ((200..300).contains(&code) && is_http_status(code)).then_some(code)
}

/// `None` only when the operation declares no responses at all.
pub fn select_response(responses: &IndexMap<String, ResponseOrRef>) -> Option<(&str, &ResponseOrRef)> {
    let mut first = None;
    let mut best: Option<(u16, &str, &ResponseOrRef)> = None;
    for (label, response) in responses {
        if label.eq_ignore_ascii_case("default") {
            return Some((label.as_str(), response));
        }
        first.get_or_insert((label.as_str(), response));
        if let Some(code) = success_code(label) {
            if best.is_none_or(|(current, _, _)| code < current) {
                best = Some((code, label.as_str(), response));
            }
        }
    }
    best.map(|(_, label, response)| (label, response)).or(first)
}

/// Body type of the chosen response. Empty string means no content.
pub fn return_type(types: &TypeTranslator<'_>, label: &str, response: &Response) -> Result<String> {
    if response.content.is_empty() {
        return Ok(String::new());
    }

    if let Some(json) = media_type(&response.content, JSON_MIME) {
        match json_return_type(types, label, json) {
            Ok(ty) => return Ok(ty),
            Err(TranslateError::MissingSchema { .. }) => {
                warn!("{label} response has no schema in {JSON_MIME}, trying another mime type");
            }
            Err(err) => return Err(err),
        }
    }

    if media_type(&response.content, TEXT_MIME).is_some() {
        return Ok(ScalarTag::String.to_string());
    }

    warn!("{label} response has no supported content format, defaulting to String");
    Ok(ScalarTag::String.to_string())
}

fn json_return_type(types: &TypeTranslator<'_>, label: &str, json: &MediaType) -> Result<String> {
    let schema = json
        .schema
        .as_ref()
        .ok_or_else(|| TranslateError::MissingSchema { label: label.to_string() })?;
    types.type_expression(schema)
}

/// Exact key first, then ignoring case and parameters (`application/json; charset=utf-8`).
fn media_type<'r>(content: &'r IndexMap<String, MediaType>, mime: &str) -> Option<&'r MediaType> {
    content.get(mime).or_else(|| {
        content
            .iter()
            .find(|(key, _)| key.split(';').next().is_some_and(|essence| essence.trim().eq_ignore_ascii_case(mime)))
            .map(|(_, media)| media)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::Document;
    use serde_json::json;

    fn responses(value: serde_json::Value) -> IndexMap<String, ResponseOrRef> {
        serde_json::from_value(value).unwrap()
    }

    fn selected(value: serde_json::Value) -> String {
        let responses = responses(value);
        select_response(&responses).unwrap().0.to_string()
    }

    fn empty_doc() -> Document {
        serde_json::from_value(json!({ "openapi": "3.0.0" })).unwrap()
    }

    fn response(value: serde_json::Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn default_wins_regardless_of_position() {
        assert_eq!(selected(json!({ "201": {}, "404": {}, "default": {} })), "default");
        assert_eq!(selected(json!({ "DEFAULT": {}, "200": {} })), "DEFAULT");
    }

    #[test]
    fn lowest_success_code_wins() {
        assert_eq!(selected(json!({ "201": {}, "200": {} })), "200");
        assert_eq!(selected(json!({ "200": {}, "201": {} })), "200");
        assert_eq!(selected(json!({ "404": {}, "204": {}, "202": {} })), "202");
    }

    #[test]
    fn unrecognized_codes_do_not_qualify() {
        assert_eq!(selected(json!({ "404": {}, "299": {} })), "404");
        assert_eq!(selected(json!({ "2XX": {}, "203": {} })), "203");
    }

    #[test]
    fn falls_back_to_first_label() {
        assert_eq!(selected(json!({ "404": {}, "503": {} })), "404");
        assert_eq!(selected(json!({ "weird": {}, "500": {} })), "weird");
        assert!(select_response(&IndexMap::new()).is_none());
    }

    #[test]
    fn body_resolution() {
        let doc = empty_doc();
        let types = TypeTranslator::new(&doc);

        let no_content = response(json!({ "description": "gone" }));
        assert_eq!(return_type(&types, "204", &no_content).unwrap(), "");

        let by_ref = response(json!({ "content": { "application/json": {
            "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
        } } }));
        assert_eq!(return_type(&types, "200", &by_ref).unwrap(), "[Pet]");

        let charset = response(json!({ "content": { "Application/JSON; charset=utf-8": {
            "schema": { "type": "integer" }
        } } }));
        assert_eq!(return_type(&types, "200", &charset).unwrap(), "Int");
    }

    #[test]
    fn json_without_schema_falls_through() {
        let doc = empty_doc();
        let types = TypeTranslator::new(&doc);
        let r = response(json!({ "content": { "application/json": {}, "text/plain": {} } }));
        assert_eq!(return_type(&types, "200", &r).unwrap(), "String");

        let r = response(json!({ "content": { "application/xml": { "schema": { "type": "object" } } } }));
        assert_eq!(return_type(&types, "200", &r).unwrap(), "String");

        // nothing left to fall through to
        let r = response(json!({ "content": { "application/json": {} } }));
        assert_eq!(return_type(&types, "200", &r).unwrap(), "String");
    }

    #[test]
    fn registered_status_codes() {
        for code in [100, 200, 204, 226, 308, 418, 451, 511] {
            assert!(is_http_status(code), "{code}");
        }
        for code in [0, 199, 209, 299, 306, 420, 509, 600] {
            assert!(!is_http_status(code), "{code}");
        }
    }

    #[test]
    fn broken_json_schema_is_fatal() {
        let doc = empty_doc();
        let types = TypeTranslator::new(&doc);
        let r = response(json!({ "content": { "application/json": { "schema": { "type": "file" } } } }));
        assert!(matches!(
            return_type(&types, "200", &r).unwrap_err(),
            TranslateError::UnknownBaseType { .. }
        ));
    }
}
