use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{ListingSource, ScoringRules};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
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
pub struct BackendSettings {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_properties_table")]
    pub properties: String,
    #[serde(default = "default_businesses_table")]
    pub businesses: String,
    #[serde(default = "default_profiles_table")]
    pub profiles: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            properties: default_properties_table(),
            businesses: default_businesses_table(),
            profiles: default_profiles_table(),
        }
    }
}

fn default_properties_table() -> String { "properties".to_string() }
fn default_businesses_table() -> String { "businesses".to_string() }
fn default_profiles_table() -> String { "investor_profiles".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
    /// Refuse to start without Redis
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    #[serde(default = "default_listing_status")]
    pub listing_status: String,
    #[serde(default)]
    pub default_source: ListingSource,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            listing_status: default_listing_status(),
            default_source: ListingSource::default(),
        }
    }
}

fn default_fetch_limit() -> usize { 20 }
fn default_listing_status() -> String { "active".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_budget_in_range")]
    pub budget_in_range: f64,
    #[serde(default = "default_budget_near_range")]
    pub budget_near_range: f64,
    #[serde(default = "default_budget_near_tolerance")]
    pub budget_near_tolerance: f64,
    #[serde(default = "default_location")]
    pub location: f64,
    #[serde(default = "default_category")]
    pub category: f64,
    #[serde(default = "default_bedrooms")]
    pub bedrooms: f64,
    #[serde(default = "default_recency")]
    pub recency: f64,
    #[serde(default = "default_recency_days")]
    pub recency_days: i64,
    #[serde(default = "default_new_listing_days")]
    pub new_listing_days: i64,
    #[serde(default = "default_max_jitter")]
    pub max_jitter: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            budget_in_range: default_budget_in_range(),
            budget_near_range: default_budget_near_range(),
            budget_near_tolerance: default_budget_near_tolerance(),
            location: default_location(),
            category: default_category(),
            bedrooms: default_bedrooms(),
            recency: default_recency(),
            recency_days: default_recency_days(),
            new_listing_days: default_new_listing_days(),
            max_jitter: default_max_jitter(),
            max_results: default_max_results(),
        }
    }
}

impl From<&RulesConfig> for ScoringRules {
    fn from(config: &RulesConfig) -> Self {
        Self {
            budget_in_range: config.budget_in_range,
            budget_near_range: config.budget_near_range,
            budget_near_tolerance: config.budget_near_tolerance,
            location: config.location,
            category: config.category,
            bedrooms: config.bedrooms,
            recency: config.recency,
            recency_days: config.recency_days,
            new_listing_days: config.new_listing_days,
            max_jitter: config.max_jitter,
            max_results: config.max_results,
        }
    }
}

fn default_budget_in_range() -> f64 { 30.0 }
fn default_budget_near_range() -> f64 { 15.0 }
fn default_budget_near_tolerance() -> f64 { 50_000.0 }
fn default_location() -> f64 { 25.0 }
fn default_category() -> f64 { 20.0 }
fn default_bedrooms() -> f64 { 10.0 }
fn default_recency() -> f64 { 15.0 }
fn default_recency_days() -> i64 { 7 }
fn default_new_listing_days() -> i64 { 3 }
fn default_max_jitter() -> f64 { 10.0 }
fn default_max_results() -> usize { 12 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ESTATE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ESTATE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ESTATE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known deployment variables on top of the loaded config
///
/// `DATABASE_URL`, `REDIS_URL`, `BACKEND_URL` and `BACKEND_API_KEY` win
/// over file values.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("REDIS_URL", "cache.redis_url"),
        ("BACKEND_URL", "backend.endpoint"),
        ("BACKEND_API_KEY", "backend.api_key"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_match_scorer() {
        let rules = ScoringRules::from(&RulesConfig::default());
        assert_eq!(rules, ScoringRules::default());
    }

    #[test]
    fn test_default_recommendation_settings() {
        let settings = RecommendationSettings::default();
        assert_eq!(settings.fetch_limit, 20);
        assert_eq!(settings.listing_status, "active");
        assert_eq!(settings.default_source, ListingSource::Properties);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Pretty);
        let parsed: Wrapper = serde_json::from_str(r#"{"format": "compact"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Compact);
        assert!(serde_json::from_str::<Wrapper>(r#"{"format": "xml"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("estate-recs-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[backend]
endpoint = "https://backend.test"
api_key = "key"

[database]
url = "postgres://localhost/test"

[cache]
redis_url = "redis://localhost"

[scoring.rules]
location = 40.0

[logging]
format = "pretty"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.tables.properties, "properties");
        assert!(!settings.cache.required);
        assert_eq!(settings.scoring.rules.location, 40.0);
        assert_eq!(settings.scoring.rules.bedrooms, 10.0);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }
}
