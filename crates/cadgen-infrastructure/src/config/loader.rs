//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables
//! and default values through Figment.

use std::env;
use std::path::{Path, PathBuf};

use cadgen_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    EMBEDDING_PROVIDERS, GENERATION_PROVIDERS, SANDBOX_PROVIDERS,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, else the first default location found)
    /// 3. Environment variables with prefix (e.g., `CADGEN__STRATEGY__DIRECT_ADAPTATION`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context(format!(
            "Failed to write config file {}",
            path.as_ref().display()
        ))?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_providers(config)?;
    config.strategy.validate()?;
    validate_retrieval(config)?;
    validate_sandbox(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_providers(config: &AppConfig) -> Result<()> {
    check_known("embedding", &config.embedding.provider, &EMBEDDING_PROVIDERS)?;
    check_known("generation", &config.generation.provider, &GENERATION_PROVIDERS)?;
    check_known("sandbox", &config.sandbox.provider, &SANDBOX_PROVIDERS)?;

    if config.embedding.provider == "openai"
        && config
            .embedding
            .api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
    {
        return Err(Error::config(
            "embedding.api_key is required for the openai provider",
        ));
    }
    Ok(())
}

fn check_known(section: &str, provider: &str, known: &[&str]) -> Result<()> {
    if known.contains(&provider) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "Unknown {section} provider '{provider}'. Expected one of: {}",
            known.join(", ")
        )))
    }
}

fn validate_retrieval(config: &AppConfig) -> Result<()> {
    if config.retrieval.top_k == 0 {
        return Err(Error::config("retrieval.top_k must be at least 1"));
    }
    if config.retrieval.attempts == 0 {
        return Err(Error::config("retrieval.attempts must be at least 1"));
    }
    Ok(())
}

fn validate_sandbox(config: &AppConfig) -> Result<()> {
    if config.sandbox.timeout_secs == 0 {
        return Err(Error::config("sandbox.timeout_secs cannot be 0"));
    }
    if config.sandbox.provider == "python" && config.sandbox.interpreter.trim().is_empty() {
        return Err(Error::config(
            "sandbox.interpreter is required for the python sandbox",
        ));
    }
    Ok(())
}
