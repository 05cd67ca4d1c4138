use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use persistence::DocumentPaths;
use shared::id::{IdFormat, DEFAULT_SHORT_ID_LENGTH};

/// Legacy environment variable holding the shared secret.
pub const LEGACY_SECRET_ENV: &str = "SLEEPY_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Shared-secret authentication for mutating endpoints
    #[serde(default)]
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound for request bodies buffered during authentication
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Empty means unconfigured: every authenticated request fails with 500.
    #[serde(default)]
    pub secret: String,
}

impl AuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_status_file")]
    pub status_file: String,

    #[serde(default = "default_devices_file")]
    pub devices_file: String,

    #[serde(default = "default_status_list_file")]
    pub status_list_file: String,

    /// Create missing documents with default content at startup
    #[serde(default = "default_true")]
    pub seed_missing: bool,

    /// Serialize read-modify-write cycles per document
    #[serde(default = "default_true")]
    pub serialize_writes: bool,
}

impl StorageConfig {
    pub fn document_paths(&self) -> DocumentPaths {
        DocumentPaths {
            data_dir: self.data_dir.clone(),
            status_file: self.status_file.clone(),
            devices_file: self.devices_file.clone(),
            status_list_file: self.status_list_file.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesConfig {
    #[serde(default)]
    pub id_format: IdFormat,

    #[serde(default = "default_short_id_length")]
    pub short_id_length: usize,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            id_format: IdFormat::default(),
            short_id_length: default_short_id_length(),
        }
    }
}

/// Static page metadata served by `/api/meta`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub background: String,

    #[serde(default = "default_favicon")]
    pub favicon: String,

    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: String::new(),
            timezone: default_timezone(),
            background: String::new(),
            favicon: default_favicon(),
            theme: default_theme(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("_data")
}
fn default_status_file() -> String {
    "data.json".to_string()
}
fn default_devices_file() -> String {
    "devices.json".to_string()
}
fn default_status_list_file() -> String {
    "status.json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_short_id_length() -> usize {
    DEFAULT_SHORT_ID_LENGTH
}
fn default_site_name() -> String {
    "Sleepy".to_string()
}
fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}
fn default_favicon() -> String {
    "/static/favicon.ico".to_string()
}
fn default_theme() -> String {
    "default".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SLEEPY__ prefix
    /// 4. SLEEPY_SECRET, only if no secret was configured above
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SLEEPY").separator("__"))
            .build()?;

        let mut cfg: Self = config.try_deserialize()?;
        cfg.apply_legacy_secret(std::env::var(LEGACY_SECRET_ENV).ok());
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// This method creates a config entirely from defaults and overrides,
    /// without relying on config files or the process environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        // Embed defaults directly to avoid file system dependency in tests
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 3000
            request_timeout_secs = 30
            max_body_size = 1048576

            [logging]
            level = "debug"
            format = "pretty"

            [auth]
            secret = ""

            [storage]
            data_dir = "_data"
            status_file = "data.json"
            devices_file = "devices.json"
            status_list_file = "status.json"
            seed_missing = true
            serialize_writes = true

            [devices]
            id_format = "uuid"
            short_id_length = 8

            [site]
            name = "Sleepy"
            description = "Test deployment"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Falls back to the legacy secret variable when no secret is configured.
    fn apply_legacy_secret(&mut self, legacy: Option<String>) {
        if self.auth.secret.is_empty() {
            if let Some(secret) = legacy.filter(|s| !s.is_empty()) {
                self.auth.secret = secret;
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Validate port range
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        for (key, value) in [
            ("storage.status_file", &self.storage.status_file),
            ("storage.devices_file", &self.storage.devices_file),
            ("storage.status_list_file", &self.storage.status_list_file),
        ] {
            if value.is_empty() {
                return Err(ConfigValidationError::MissingRequired(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }

        if !(4..=64).contains(&self.devices.short_id_length) {
            return Err(ConfigValidationError::InvalidValue(
                "devices.short_id_length must be between 4 and 64".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
