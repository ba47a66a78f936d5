use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub crime_api: CrimeApiSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub charting: ChartingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrimeApiSettings {
    #[serde(default = "default_crime_api_url")]
    pub base_url: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    pub timeout_secs: Option<u64>,
}

impl Default for CrimeApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_crime_api_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timeout_secs: None,
        }
    }
}

fn default_crime_api_url() -> String { "https://data.police.uk/api".to_string() }
fn default_latitude() -> f64 { 51.509865 }
fn default_longitude() -> f64 { -0.118092 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Optional shared tier; the in-memory tier is always on
    pub redis_url: Option<String>,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: default_cache_ttl(),
            l1_cache_size: None,
        }
    }
}

fn default_cache_ttl() -> u64 { 36_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Token signing key, also the legacy admin path key
    pub secret_key: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    #[serde(default)]
    pub admin_usernames: Vec<String>,
    /// Mount the `/{adminKey}` routes. Off unless explicitly enabled.
    #[serde(default)]
    pub allow_path_key: bool,
    /// Initial password for admin accounts created at startup
    pub admin_password: Option<String>,
}

fn default_token_ttl() -> i64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct ChartingSettings {
    #[serde(default = "default_charting_endpoint")]
    pub endpoint: String,
    pub username: Option<String>,
    pub api_key: Option<String>,
}

impl Default for ChartingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_charting_endpoint(),
            username: None,
            api_key: None,
        }
    }
}

fn default_charting_endpoint() -> String { "https://plot.ly/clientresp".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with CRIMESTATS__)
    /// 4. Well-known variables such as DATABASE_URL and SECRET_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CRIMESTATS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CRIMESTATS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_usernames")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_well_known_env(settings, |var| std::env::var(var).ok())?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CRIMESTATS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Overlay conventional unprefixed variables on top of the loaded config
fn apply_well_known_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("SECRET_KEY", "auth.secret_key"),
        ("ADMIN_PASSWORD", "auth.admin_password"),
        ("REDIS_URL", "cache.redis_url"),
        ("PLOTLY_USERNAME", "charting.username"),
        ("PLOTLY_API_KEY", "charting.api_key"),
        ("LOG_LEVEL", "logging.level"),
        ("LOG_FORMAT", "logging.format"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
