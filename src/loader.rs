//! Getting an OpenAPI document into memory: local file or HTTP(S) URL,
//! JSON or YAML, then structural validation.
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::openapi::Document;
use crate::path_de::{PathError, from_str_with_path, from_yaml_str_with_path};

const ACCEPTED_CONTENT_TYPES: [&str; 5] = [
    "application/json",
    "application/vnd.oai.openapi+json",
    "application/yaml",
    "text/yaml",
    "application/vnd.oai.openapi",
];

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("GET {url} - could not fetch data: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} - server responded with {status}")]
    HttpStatus { url: String, status: reqwest::StatusCode },
    #[error("GET {url} - response has no accepted content-type (got \"{content_type}\")")]
    UnacceptedContentType { url: String, content_type: String },
    #[error("could not parse the OpenAPI document as JSON {0}")]
    Json(#[source] PathError),
    #[error("could not parse the OpenAPI document as YAML {0}")]
    Yaml(#[source] PathError),
    #[error("invalid OpenAPI document:\n  {}", .0.join("\n  "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    pub fn parse(identifier: &str) -> Self {
        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            Source::Remote(identifier.to_string())
        } else {
            Source::Local(PathBuf::from(identifier))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn guess(content_type: Option<&str>, location: &str) -> Self {
        if let Some(content_type) = content_type {
            if content_type.contains("json") {
                return Format::Json;
            }
            if content_type.contains("yaml") || content_type.contains("application/vnd.oai.openapi") {
                return Format::Yaml;
            }
        }
        if let Some(extension) = extract_extension(location) {
            if extension.eq_ignore_ascii_case("json") {
                return Format::Json;
            }
            if extension.eq_ignore_ascii_case("yml") || extension.eq_ignore_ascii_case("yaml") {
                return Format::Yaml;
            }
        }

        // YAML is a superset of JSON so lets just fallback to parsing as YAML.
        Format::Yaml
    }
}

fn extract_extension(location: &str) -> Option<&str> {
    let without_query = location.split(['?', '#']).next()?;
    Path::new(without_query).extension()?.to_str()
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

/// Fetch, parse and validate.
pub fn load(identifier: &str) -> Result<Document, LoadError> {
    let source = Source::parse(identifier);
    let (text, format) = match &source {
        Source::Local(path) => read_local(path)?,
        Source::Remote(url) => download(url)?,
    };
    let doc = parse(&text, format)?;
    doc.validate().map_err(LoadError::Invalid)?;
    info!(
        title = doc.info.as_ref().map(|i| i.title.as_str()).unwrap_or_default(),
        version = doc.info.as_ref().map(|i| i.version.as_str()).unwrap_or_default(),
        openapi = doc.openapi.as_str(),
        paths = doc.paths.len(),
        "loaded {identifier}"
    );
    Ok(doc)
}

pub fn parse(text: &str, format: Format) -> Result<Document, LoadError> {
    match format {
        Format::Json => from_str_with_path(text).map_err(LoadError::Json),
        Format::Yaml => from_yaml_str_with_path(text).map_err(LoadError::Yaml),
    }
}

fn read_local(path: &Path) -> Result<(String, Format), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = Format::guess(None, &path.to_string_lossy());
    debug!("read {} as {format:?}", path.display());
    Ok((text, format))
}

fn download(url: &str) -> Result<(String, Format), LoadError> {
    let http_err = |source| LoadError::Http { url: url.to_string(), source };

    let response = reqwest::blocking::get(url).map_err(http_err)?;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(LoadError::HttpStatus { url: url.to_string(), status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !ACCEPTED_CONTENT_TYPES.iter().any(|accepted| content_type.contains(accepted)) {
        return Err(LoadError::UnacceptedContentType { url: url.to_string(), content_type });
    }

    let text = response.text().map_err(http_err)?;
    let format = Format::guess(Some(&content_type), url);
    debug!("downloaded {url} ({content_type}) as {format:?}");
    Ok((text, format))
}
