//! Translation failures.
//!
//! Everything the translator can fail with lives in [`TranslateError`]. Wrapping
//! variants carry the context (schema name, parameter, `METHOD /path`) needed to
//! locate the offending construct in the source document.

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("could not convert \"{tag}\" to a GraphQL base type: not a valid OpenAPI base type")]
    UnknownBaseType { tag: String },

    /// Only ever raised inside response selection, where it triggers a fallback.
    #[error("{label} response has no schema")]
    MissingSchema { label: String },

    #[error("\"{raw}\" sanitizes to an empty GraphQL identifier")]
    EmptyIdentifier { raw: String },

    #[error("encountered an array without items")]
    ArrayWithoutItems,

    #[error("found a reference {reference} which didn't seem to exist in the document")]
    UnresolvedReference { reference: String },

    #[error("could not convert response: {source}")]
    ResponseTranslationFailed {
        #[source]
        source: Box<TranslateError>,
    },

    #[error("could not convert type in parameter {parameter}: {source}")]
    ParameterTranslationFailed {
        parameter: String,
        #[source]
        source: Box<TranslateError>,
    },

    #[error("{origin} - {source}")]
    OperationTranslationFailed {
        origin: String,
        #[source]
        source: Box<TranslateError>,
    },

    #[error("could not parse schema {name}: {source}")]
    SchemaTranslationFailed {
        name: String,
        #[source]
        source: Box<TranslateError>,
    },
}

impl TranslateError {
    pub(crate) fn in_response(self) -> Self {
        Self::ResponseTranslationFailed { source: Box::new(self) }
    }

    pub(crate) fn in_parameter(self, parameter: &str) -> Self {
        Self::ParameterTranslationFailed {
            parameter: parameter.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_operation(self, origin: &str) -> Self {
        Self::OperationTranslationFailed {
            origin: origin.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_schema(self, name: &str) -> Self {
        Self::SchemaTranslationFailed {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// Walks wrapping variants down to the error that started it all.
    pub fn root_cause(&self) -> &TranslateError {
        match self {
            Self::ResponseTranslationFailed { source }
            | Self::ParameterTranslationFailed { source, .. }
            | Self::OperationTranslationFailed { source, .. }
            | Self::SchemaTranslationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
