use serde::de::DeserializeOwned;

/// A deserialization failure together with where in the document it happened.
#[derive(thiserror::Error, Debug)]
#[error("at {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

/// Deserialize JSON with document-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| PathError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Same as [`from_str_with_path`] for YAML sources.
pub fn from_yaml_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = serde_yaml::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| PathError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
