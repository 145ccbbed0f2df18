//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use jobgate_engine::EngineClientConfig;

/// Placeholder secret that marks the server as not configured.
pub const UNCONFIGURED_TOKEN: &str = "default-token-for-development";

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parse a level name, case-insensitively. Unknown names fall back to `Info`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Also write records to `file_path`
    pub to_file: bool,
    pub file_path: PathBuf,
    /// JSON lines on stdout
    pub json: bool,
}

/// Shared-secret settings read by the auth gate.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    access_token: String,
}

impl AccessConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.access_token
    }

    /// False when the secret is empty or still the placeholder.
    pub fn is_configured(&self) -> bool {
        !self.access_token.is_empty() && self.access_token != UNCONFIGURED_TOKEN
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::new(UNCONFIGURED_TOKEN)
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Mount `/metrics`
    pub metrics_enabled: bool,
    /// Development mode
    pub debug_mode: bool,
    pub access: AccessConfig,
    pub log: LogSettings,
    /// Scraping engine endpoint
    pub engine: EngineClientConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            metrics_enabled: false,
            debug_mode: false,
            access: AccessConfig::default(),
            log: LogSettings {
                level: LogLevel::Info,
                to_file: false,
                file_path: PathBuf::from("app.log"),
                json: true,
            },
            engine: EngineClientConfig::default(),
        }
    }
}

fn flag(value: Option<String>) -> bool {
    value.map(|v| v.trim().to_lowercase() == "true").unwrap_or(false)
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug_mode = flag(get("DEBUG_MODE"));
        let json = match get("LOG_FORMAT") {
            Some(format) => format.to_lowercase() == "json",
            None => !debug_mode,
        };

        Self {
            host: get("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: get("API_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            cors_origins: get("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| vec!["*".to_string()]),
            max_body_size: get("MAX_BODY_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            metrics_enabled: get("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            debug_mode,
            access: AccessConfig::new(
                get("API_ACCESS_TOKEN").unwrap_or_else(|| UNCONFIGURED_TOKEN.to_string()),
            ),
            log: LogSettings {
                level: get("LOG_LEVEL")
                    .map(|v| LogLevel::parse(&v))
                    .unwrap_or(LogLevel::Info),
                to_file: flag(get("LOG_TO_FILE")),
                file_path: get("LOG_FILE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("app.log")),
                json,
            },
            engine: EngineClientConfig {
                base_url: get("ENGINE_URL")
                    .unwrap_or_else(|| EngineClientConfig::default().base_url),
                timeout: get("ENGINE_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs),
            },
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        !self.debug_mode
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.access.secret(), UNCONFIGURED_TOKEN);
        assert!(!config.access.is_configured());
        assert_eq!(config.log.level, LogLevel::Info);
        assert!(!config.log.to_file);
        assert_eq!(config.log.file_path, PathBuf::from("app.log"));
        assert!(!config.debug_mode);
        assert!(config.is_production());
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_access_token_from_env() {
        let config = config_from(&[("API_ACCESS_TOKEN", "my-secret-token-123")]);
        assert_eq!(config.access.secret(), "my-secret-token-123");
        assert!(config.access.is_configured());
    }

    #[test]
    fn test_empty_token_is_not_configured() {
        let config = config_from(&[("API_ACCESS_TOKEN", "")]);
        assert!(!config.access.is_configured());
    }

    #[test]
    fn test_log_levels() {
        let cases = [
            ("DEBUG", LogLevel::Debug),
            ("debug", LogLevel::Debug),
            ("INFO", LogLevel::Info),
            ("WARNING", LogLevel::Warning),
            ("warning", LogLevel::Warning),
            ("ERROR", LogLevel::Error),
            ("INVALID", LogLevel::Info),
            ("", LogLevel::Info),
        ];
        for (raw, expected) in cases {
            let config = config_from(&[("LOG_LEVEL", raw)]);
            assert_eq!(config.log.level, expected, "LOG_LEVEL={raw}");
        }
    }

    #[test]
    fn test_boolean_flags() {
        let cases = [
            ("true", true),
            ("True", true),
            ("TRUE", true),
            ("false", false),
            ("False", false),
            ("yes", false),
            ("1", false),
        ];
        for (raw, expected) in cases {
            let config = config_from(&[("LOG_TO_FILE", raw), ("DEBUG_MODE", raw)]);
            assert_eq!(config.log.to_file, expected, "LOG_TO_FILE={raw}");
            assert_eq!(config.debug_mode, expected, "DEBUG_MODE={raw}");
        }
    }

    #[test]
    fn test_log_file_path_from_env() {
        let config = config_from(&[("LOG_FILE_PATH", "/var/log/jobgate.log")]);
        assert_eq!(config.log.file_path, PathBuf::from("/var/log/jobgate.log"));
    }

    #[test]
    fn test_log_format_follows_mode() {
        assert!(config_from(&[]).log.json);
        assert!(!config_from(&[("DEBUG_MODE", "true")]).log.json);
        assert!(config_from(&[("DEBUG_MODE", "true"), ("LOG_FORMAT", "json")]).log.json);
        assert!(!config_from(&[("LOG_FORMAT", "pretty")]).log.json);
    }

    #[test]
    fn test_server_settings() {
        let config = config_from(&[
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", "9000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("METRICS_ENABLED", "1"),
        ]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_engine_settings() {
        let config = config_from(&[]);
        assert_eq!(config.engine.base_url, "http://127.0.0.1:8001");
        assert!(config.engine.timeout.is_none());

        let config = config_from(&[
            ("ENGINE_URL", "http://engine.internal:9100"),
            ("ENGINE_TIMEOUT", "45"),
        ]);
        assert_eq!(config.engine.base_url, "http://engine.internal:9100");
        assert_eq!(config.engine.timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_invalid_engine_timeout_is_ignored() {
        assert!(config_from(&[("ENGINE_TIMEOUT", "soon")]).engine.timeout.is_none());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        assert_eq!(config_from(&[("API_PORT", "http")]).port, 8080);
    }
}
