//! Runtime settings, read once at startup and handed to the components that
//! need them.

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_STORAGE_PATH: &str = "data/movies.csv";
pub const TEMPLATE_PATH: &str = "index_template.html";
pub const WEBSITE_PATH: &str = "index.html";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Key for the movie lookup service. Lookups are skipped without one.
    pub api_key: Option<String>,
    pub api_url: String,
    pub api_timeout: Duration,
    /// Backing file; its extension picks the storage encoding.
    pub storage_path: PathBuf,
    pub template_path: PathBuf,
    pub website_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout: Duration::from_secs(10),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            template_path: PathBuf::from(TEMPLATE_PATH),
            website_path: PathBuf::from(WEBSITE_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Config {
            api_key: var("OMDB_API_KEY").or_else(|| var("API_KEY")),
            api_url: var("OMDB_API_URL").unwrap_or(defaults.api_url),
            storage_path: var("MOVIES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_explicit_settings() {
        let config = config_from(&[
            ("OMDB_API_KEY", "secret"),
            ("OMDB_API_URL", "http://localhost:8080/"),
            ("MOVIES_FILE", "movies.json"),
        ]);

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_url, "http://localhost:8080/");
        assert_eq!(config.storage_path, PathBuf::from("movies.json"));
        assert_eq!(config.website_path, PathBuf::from(WEBSITE_PATH));
    }

    #[test]
    fn falls_back_to_generic_api_key() {
        let config = config_from(&[("API_KEY", "legacy")]);
        assert_eq!(config.api_key.as_deref(), Some("legacy"));

        let config = config_from(&[("OMDB_API_KEY", "  "), ("API_KEY", "legacy")]);
        assert_eq!(config.api_key.as_deref(), Some("legacy"));
    }
}
