use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::{MatchError, MatchOptions};
use crate::services::CatalogLimits;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub listing_source: ListingSourceSettings,
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
pub struct MatchingSettings {
    #[serde(default = "default_max_matches_per_lead")]
    pub max_matches_per_lead: i64,
    #[serde(default = "default_min_score")]
    pub min_score: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_matches_per_lead: default_max_matches_per_lead(),
            min_score: default_min_score(),
        }
    }
}

impl MatchingSettings {
    /// Validate the configured defaults the same way request options are
    pub fn options(&self) -> Result<MatchOptions, MatchError> {
        MatchOptions::new(self.max_matches_per_lead, self.min_score)
    }
}

fn default_max_matches_per_lead() -> i64 { 5 }
fn default_min_score() -> i64 { 25 }

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSourceSettings {
    /// Base URL of a RESO Web API (OData) endpoint
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    /// JSON file with a listing array, used when no endpoint is set
    pub catalog_path: Option<String>,
    #[serde(default = "default_max_areas")]
    pub max_areas: usize,
    #[serde(default = "default_per_area_limit")]
    pub per_area_limit: usize,
    #[serde(default = "default_fallback_limit")]
    pub fallback_limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ListingSourceSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            catalog_path: None,
            max_areas: default_max_areas(),
            per_area_limit: default_per_area_limit(),
            fallback_limit: default_fallback_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ListingSourceSettings {
    pub fn limits(&self) -> CatalogLimits {
        CatalogLimits {
            max_areas: self.max_areas,
            per_area_limit: self.per_area_limit,
            fallback_limit: self.fallback_limit,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_max_areas() -> usize { 5 }
fn default_per_area_limit() -> usize { 50 }
fn default_fallback_limit() -> usize { 100 }
fn default_timeout_secs() -> u64 { 30 }

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

/// Output layout for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unrecognized names fall back to the compact formatter
    pub fn parse(format: &str) -> Self {
        match format.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LEADMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., LEADMATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("LEADMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.max_matches_per_lead, 5);
        assert_eq!(matching.min_score, 25);
        assert_eq!(matching.options().unwrap(), MatchOptions::default());
    }

    #[test]
    fn test_invalid_matching_rejected() {
        let matching = MatchingSettings {
            max_matches_per_lead: 5,
            min_score: 120,
        };
        assert_eq!(matching.options(), Err(MatchError::MinScoreOutOfRange(120)));
    }

    #[test]
    fn test_default_listing_source() {
        let source = ListingSourceSettings::default();
        assert!(source.endpoint.is_none());
        let limits = source.limits();
        assert_eq!(limits.max_areas, 5);
        assert_eq!(limits.per_area_limit, 50);
        assert_eq!(limits.fallback_limit, 100);
        assert_eq!(source.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
        assert_eq!(LogFormat::parse(&format), LogFormat::Json);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("plain"), LogFormat::Compact);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lead-matcher-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nhost = \"127.0.0.1\"\nport = 9000\n\n[matching]\nmin_score = 40\n\n[listing_source]\nendpoint = \"https://mls.example.com/odata\"\nper_area_limit = 25"
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.matching.min_score, 40);
        assert_eq!(settings.matching.max_matches_per_lead, 5);
        assert_eq!(settings.listing_source.per_area_limit, 25);
        assert_eq!(settings.logging.level, "info");
    }
}
