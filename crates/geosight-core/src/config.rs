//! Gemini client configuration.
//!
//! Values are resolved in layers: built-in defaults, an optional TOML file,
//! then environment variables. Front ends apply their own flag overrides on
//! top of the returned [`GeminiConfig`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{GeoError, GeoResult};

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default multimodal reasoning model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Language the model is asked to answer in.
pub const DEFAULT_LANGUAGE: &str = "Simplified Chinese";

/// Config file looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "geosight.toml";

/// Resolved settings for talking to the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub language: String,
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// On-disk representation; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Parse a config file from TOML text.
    pub fn parse(text: &str) -> GeoResult<Self> {
        toml::from_str(text).map_err(|e| GeoError::config(format!("invalid config file: {}", e)))
    }

    /// Read a config file from disk.
    pub fn read(path: &Path) -> GeoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

impl GeminiConfig {
    /// Create a config with the given key and default settings.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: None,
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Use a different model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Ask for answers in a different language.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Load configuration from the process environment only.
    pub fn from_env() -> GeoResult<Self> {
        Self::resolve(ConfigFile::default(), |key| std::env::var(key).ok())
    }

    /// Load configuration from an optional file, then the environment.
    ///
    /// With `path == None` the file `geosight.toml` in the working directory
    /// is used when it exists. An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> GeoResult<Self> {
        let file = match path {
            Some(path) => ConfigFile::read(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    ConfigFile::read(default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with variables looked up through `env`.
    ///
    /// Environment values win over file values.
    pub fn resolve<F>(file: ConfigFile, env: F) -> GeoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| env(key).filter(|v| !v.trim().is_empty()))
        };

        let api_key = lookup(&["GEMINI_API_KEY", "API_KEY"])
            .or(file.api_key)
            .ok_or_else(|| {
                GeoError::config(
                    "GEMINI_API_KEY environment variable not set.\n\
                     Set it with: export GEMINI_API_KEY=your-key",
                )
            })?;

        let mut config = Self::new(&api_key);

        if let Some(base_url) = lookup(&["GEMINI_BASE_URL", "API_BASE_URL"]).or(file.base_url) {
            config = config.with_base_url(&base_url);
        }
        if let Some(model) = lookup(&["GEOSIGHT_MODEL"]).or(file.model) {
            config = config.with_model(&model);
        }
        if let Some(language) = lookup(&["GEOSIGHT_LANGUAGE"]).or(file.language) {
            config = config.with_language(&language);
        }
        config.request_timeout = file.request_timeout_secs.map(Duration::from_secs);

        debug!(base_url = %config.base_url, model = %config.model, "Gemini config resolved");
        Ok(config)
    }
}
