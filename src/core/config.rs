//! Configuration management

use crate::auth::password::{MAX_COST, MIN_COST};
use clap::Parser;
use config::builder::DefaultState;
use config::{
    Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError as BuilderError, Environment,
    File,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Shortest signing secret accepted, in bytes (HS256 key size)
pub const MIN_SECRET_LEN: usize = 32;

/// Longest session lifetime accepted, in seconds (one year)
pub const MAX_TOKEN_TTL: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid store configuration: {0}")]
    InvalidStore(String),

    #[error("Invalid auth configuration: {0}")]
    InvalidAuth(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_with(&cli_args)
    }

    /// Load configuration for already-parsed CLI arguments
    pub fn load_with(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        // 1. Defaults (lowest priority)
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        // 2. Config file (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // 3. Environment variables, e.g. INKWELL_AUTH__JWT_SECRET=...
        builder = builder.add_source(
            Environment::with_prefix("INKWELL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins"),
        );

        // 4. CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(backend) = &cli_args.store {
            builder = builder.set_override("store.backend", backend.clone())?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("store.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.request_timeout", 30)?
        .set_default("server.allowed_origins", vec!["*"])?
        .set_default("store.backend", "sqlite")?
        .set_default("store.path", "./data/inkwell.db")?
        .set_default("store.connection_pool_size", 8)?
        .set_default("store.busy_timeout", 5000)?
        // No usable default: the secret must come from the environment or a file
        .set_default("auth.jwt_secret", "")?
        .set_default("auth.token_ttl", 3600)?
        .set_default("auth.bcrypt_cost", 10)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "json")?
        .set_default("logging.output", "stdout")?
        .set_default("logging.log_dir", "./logs")?
        .set_default("logging.rotation", "daily")?)
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Parser)]
#[command(name = "inkwell")]
#[command(about = "Inkwell blog backend", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Store backend (sqlite, memory)
    #[arg(long, value_name = "BACKEND")]
    pub store: Option<String>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be greater than 0".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidServer("allowed_origins cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Which store implementation backs users and blogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub connection_pool_size: u32,
    pub busy_timeout: u64, // milliseconds
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StoreBackend::Memory {
            return Ok(());
        }

        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStore("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidStore(
                "connection_pool_size must be greater than 0".to_string(),
            ));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidStore(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: u64, // seconds
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidAuth(
                "jwt_secret must be supplied (set INKWELL_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidAuth(format!(
                "jwt_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if self.token_ttl == 0 {
            return Err(ConfigError::InvalidAuth("token_ttl must be greater than 0".to_string()));
        }

        if self.token_ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::InvalidAuth(format!(
                "token_ttl must be at most {} seconds",
                MAX_TOKEN_TTL
            )));
        }

        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidAuth(format!(
                "bcrypt_cost must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }

        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl)
    }
}

// Keeps the secret out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_dir: PathBuf,
    pub rotation: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.rotation.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "rotation must be one of: {:?}",
                valid_rotations
            )));
        }

        if self.output == "file" && self.log_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidLogging(
                "log_dir must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}
