//! Explicit translation settings, passed down instead of kept in process-wide state.
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub ordering: Ordering,
    pub empty_identifier: EmptyIdentifierPolicy,
    /// Translate schemas and paths on the rayon pool.
    pub parallel: bool,
    /// Write the generation time into the rendered SDL.
    pub timestamp: bool,
}

/// Output order for types, scalars and operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    /// Declaration order of the source document.
    #[default]
    Source,
    /// Schemas and paths sorted by name.
    Lexicographic,
}

/// What to do when a name sanitizes to nothing (e.g. `"/"` or `"--"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyIdentifierPolicy {
    #[default]
    Fail,
    Placeholder(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ordering: Ordering::Source,
            empty_identifier: EmptyIdentifierPolicy::Fail,
            parallel: false,
            timestamp: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        crate::path_de::from_str_with_path(&source)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "ordering": "lexicographic" }"#).unwrap();
        assert_eq!(config.ordering, Ordering::Lexicographic);
        assert_eq!(config.empty_identifier, EmptyIdentifierPolicy::Fail);
        assert!(config.timestamp);
        assert!(!config.parallel);
    }

    #[test]
    fn placeholder_policy_parses() {
        let config: Config = serde_json::from_str(r#"{ "empty_identifier": { "placeholder": "root" } }"#).unwrap();
        assert_eq!(config.empty_identifier, EmptyIdentifierPolicy::Placeholder("root".into()));
    }

    #[test]
    fn load_reports_json_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oas2gql.json");
        std::fs::write(&path, r#"{ "parallel": "yes" }"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parallel"), "{err:#}");
    }
}
