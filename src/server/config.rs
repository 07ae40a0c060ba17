use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chatbot::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML from config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Allowed CORS origin. Any origin is accepted when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Directory with the built site bundle served for non-API paths.
    #[serde(default)]
    pub static_dir: Option<String>,

    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_locale")]
    pub default_locale: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    bind_address: Option<String>,
    frontend_url: Option<String>,
    log_dir: Option<String>,
    static_dir: Option<String>,
    admin_username: Option<String>,
    admin_password: Option<String>,
    openai_api_key: Option<String>,
    openai_base_url: Option<String>,
    openai_model: Option<String>,
    default_locale: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_openai_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_locale() -> String {
    "ru".to_string()
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path.map(Path::new) {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config = envy::from_env::<PartialServerConfig>()?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    fn merge(env: PartialServerConfig, file: PartialServerConfig) -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            database_url: env
                .database_url
                .or(file.database_url)
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            jwt_secret: env
                .jwt_secret
                .or(file.jwt_secret)
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            bind_address: env
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(default_bind_address),
            frontend_url: env.frontend_url.or(file.frontend_url),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
            static_dir: env.static_dir.or(file.static_dir),
            admin_username: env.admin_username.or(file.admin_username),
            admin_password: env.admin_password.or(file.admin_password),
            openai_api_key: env
                .openai_api_key
                .or(file.openai_api_key)
                .filter(|key| !key.trim().is_empty()),
            openai_base_url: env
                .openai_base_url
                .or(file.openai_base_url)
                .unwrap_or_else(default_openai_base_url),
            openai_model: env
                .openai_model
                .or(file.openai_model)
                .unwrap_or_else(default_openai_model),
            default_locale: env
                .default_locale
                .or(file.default_locale)
                .unwrap_or_else(default_locale),
        })
    }
}
