// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{QueryError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "ModelConfig::default_config")]
    pub model: ModelConfig,
    #[serde(default = "LauncherConfig::default_config")]
    pub launcher: LauncherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub api_base: String,
    pub name: String,
    pub api_key_env: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LauncherConfig {
    pub search_url: String,
    pub query_param: String,
    pub open_urls_directly: bool,
    #[serde(default)]
    pub browser_command: Option<String>,
}

impl ModelConfig {
    pub fn default_config() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            name: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.2,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Inline key first, then the environment variable named by `api_key_env`.
    pub fn resolve_api_key(&self) -> Result<String> {
        let key = match &self.api_key {
            Some(key) => Some(key.clone()),
            None => std::env::var(&self.api_key_env).ok(),
        };

        match key {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(QueryError::Authentication(format!(
                "no API key found, set {} or model.api_key",
                self.api_key_env
            ))),
        }
    }
}

impl LauncherConfig {
    pub fn default_config() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            query_param: "q".to_string(),
            open_urls_directly: false,
            browser_command: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = Self::defaults_builder()?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QUERYSMITH")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// Parse a TOML document layered over the defaults, without touching the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let builder = Self::defaults_builder()?
            .add_source(config::File::from_str(contents, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    pub fn default_config() -> Self {
        Self {
            model: ModelConfig::default_config(),
            launcher: LauncherConfig::default_config(),
        }
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| QueryError::Config(e.to_string()))?;
        Ok(config::Config::builder().add_source(defaults))
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .build()
            .map_err(|e| QueryError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| QueryError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.timeout_secs == 0 {
            return Err(QueryError::Config(
                "model.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(QueryError::Config(
                "model.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.model.name.trim().is_empty() {
            return Err(QueryError::Config("model.name must not be empty".to_string()));
        }

        if !is_http_url(&self.model.api_base) {
            return Err(QueryError::Config(format!(
                "model.api_base must be an http(s) URL: {}",
                self.model.api_base
            )));
        }

        if !is_http_url(&self.launcher.search_url) {
            return Err(QueryError::Config(format!(
                "launcher.search_url must be an http(s) URL: {}",
                self.launcher.search_url
            )));
        }

        if self.launcher.query_param.trim().is_empty() {
            return Err(QueryError::Config(
                "launcher.query_param must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.launcher.search_url, "https://www.google.com/search");
        assert_eq!(config.model.timeout(), Duration::from_secs(30));
        assert!(!config.launcher.open_urls_directly);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [model]
            name = "gpt-4o"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.model.name, "gpt-4o");
        assert_eq!(config.model.timeout_secs, 5);
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.launcher.query_param, "q");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = Config::from_toml_str("[model]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));

        let err = Config::from_toml_str("[launcher]\nsearch_url = \"ftp://example.com\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("search_url"));

        let err = Config::from_toml_str("[model]\ntemperature = 3.5\n").unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[launcher]\nsearch_url = \"https://duckduckgo.com/\"\nopen_urls_directly = true"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.launcher.search_url, "https://duckduckgo.com/");
        assert!(config.launcher.open_urls_directly);
    }

    #[test]
    fn test_resolve_inline_api_key() {
        let mut model = ModelConfig::default_config();
        model.api_key = Some("  sk-test  ".to_string());
        assert_eq!(model.resolve_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_missing_api_key_is_authentication_error() {
        let mut model = ModelConfig::default_config();
        model.api_key_env = "QUERYSMITH_TEST_UNSET_KEY_VARIABLE".to_string();
        let err = model.resolve_api_key().unwrap_err();
        assert!(matches!(err, QueryError::Authentication(_)));

        model.api_key = Some("   ".to_string());
        assert!(matches!(
            model.resolve_api_key().unwrap_err(),
            QueryError::Authentication(_)
        ));
    }
}
