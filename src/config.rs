use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use crate::error::{Result, RosterError};
use crate::sanitize::SanitizeOptions;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sanitizer: SanitizeOptions,
    pub static_data: StaticDataConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaticDataConfig {
    /// Static override file applied to every sanitized person
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            RosterError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&config_content)
    }

    /// Load from `explicit`, else the path in `COUNCIL_ROLES_CONFIG`, else
    /// `config.toml` when it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load_from(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from(default_path);
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sanitizer.chair_patterns, vec!["chair", "pres"]);
        assert_eq!(config.sanitizer.default_primary_bodies, vec!["city council", "council briefing"]);
    }

    #[test]
    fn test_partial_sanitizer_section() {
        let config = Config::from_toml_str(
            r#"
            [sanitizer]
            chair_patterns = ["chair", "lead"]

            [static_data]
            path = "data/static.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.sanitizer.chair_patterns, vec!["chair", "lead"]);
        assert_eq!(config.sanitizer.council_president_patterns, vec!["chair", "pres", "super"]);
        assert_eq!(config.static_data.path, Some(PathBuf::from("data/static.json")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sanitizer]\ndefault_primary_bodies = [\"board of supervisors\"]").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.sanitizer.default_primary_bodies, vec!["board of supervisors"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/council_roles.toml")));
        assert!(matches!(result, Err(RosterError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[sanitizer\nchair_patterns = 1"),
            Err(RosterError::Toml(_))
        ));
    }
}
