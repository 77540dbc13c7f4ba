//! Configuration module
//!
//! Server, CORS, logging and compression limits, read from the process
//! environment (and an optional `.env` file).

use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const MAX_FILE_SIZE_MB: usize = 50;
const MAX_BATCH_FILES: usize = 50;
const ALLOWED_EXTENSIONS: &str = "jpeg,jpg,png,gif,webp,bmp,tiff";
const STATIC_DIR: &str = "public";
const INDEX_FILE: &str = "index.html";

/// Log output style for the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Server-level settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

/// Compression service configuration
#[derive(Clone, Debug)]
pub struct CompressorConfig {
    pub base: BaseConfig,
    pub max_file_size_bytes: usize,
    pub max_batch_files: usize,
    pub allowed_extensions: Vec<String>,
    pub static_dir: String,
    pub index_file: String,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_host: DEFAULT_HOST.to_string(),
                server_port: DEFAULT_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
                log_format: LogFormat::Text,
            },
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_batch_files: MAX_BATCH_FILES,
            allowed_extensions: split_list(ALLOWED_EXTENSIONS),
            static_dir: STATIC_DIR.to_string(),
            index_file: INDEX_FILE.to_string(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl CompressorConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Absent or unparsable values fall back
    /// to defaults, except `PORT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.base.environment);

        let server_port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.base.cors_origins);

        let http_concurrency_limit = lookup("HTTP_CONCURRENCY_LIMIT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT);

        let max_file_size_bytes = match lookup("MAX_FILE_SIZE_MB")
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            Some(mb) => mb.checked_mul(1024 * 1024).unwrap_or_else(|| {
                tracing::warn!(
                    max_file_size_mb = mb,
                    "MAX_FILE_SIZE_MB is out of range, using default"
                );
                MAX_FILE_SIZE_MB * 1024 * 1024
            }),
            None => MAX_FILE_SIZE_MB * 1024 * 1024,
        };

        let max_batch_files = lookup("MAX_BATCH_FILES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(MAX_BATCH_FILES);

        let allowed_extensions = lookup("ALLOWED_EXTENSIONS")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.allowed_extensions);

        Ok(Self {
            base: BaseConfig {
                server_host: lookup("HOST").unwrap_or(defaults.base.server_host),
                server_port,
                cors_origins,
                environment,
                http_concurrency_limit,
                log_format: lookup("LOG_FORMAT")
                    .map(|v| LogFormat::parse(&v))
                    .unwrap_or_default(),
            },
            max_file_size_bytes,
            max_batch_files,
            allowed_extensions,
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
            index_file: lookup("INDEX_FILE").unwrap_or(defaults.index_file),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_batch_files == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_FILES must be greater than 0"));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than 0"
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<CompressorConfig>);

impl Config {
    fn inner(&self) -> &CompressorConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = CompressorConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_host(&self) -> &str {
        &self.inner().base.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins().iter().any(|o| o == "*")
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().base.log_format
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_batch_files(&self) -> usize {
        self.inner().max_batch_files
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn static_dir(&self) -> &str {
        &self.inner().static_dir
    }

    pub fn index_file(&self) -> &str {
        &self.inner().index_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CompressorConfig, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CompressorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config(Box::new(config_from(&[]).unwrap()));
        assert_eq!(config.server_host(), "0.0.0.0");
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_file_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.max_batch_files(), 50);
        assert_eq!(config.allowed_extensions().len(), 7);
        assert!(config.allows_any_origin());
        assert!(!config.is_production());
        assert_eq!(config.log_format(), LogFormat::Text);
        assert_eq!(config.static_dir(), "public");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("APP_ENV", "prod"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("MAX_FILE_SIZE_MB", "5"),
            ("ALLOWED_EXTENSIONS", "PNG, jpg"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        let config = Config(Box::new(config));
        assert_eq!(config.server_port(), 8080);
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
        assert!(!config.allows_any_origin());
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.allowed_extensions(), ["png", "jpg"]);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_environment_takes_precedence_over_app_env() {
        let config = config_from(&[("ENVIRONMENT", "staging"), ("APP_ENV", "production")]).unwrap();
        assert_eq!(config.base.environment, "staging");
    }

    #[test]
    fn test_unparsable_limits_fall_back() {
        let config = config_from(&[("MAX_BATCH_FILES", "many"), ("MAX_FILE_SIZE_MB", "")]).unwrap();
        assert_eq!(config.max_batch_files, 50);
        assert_eq!(config.max_file_size_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_oversized_file_limit_falls_back() {
        let huge = usize::MAX.to_string();
        let config = config_from(&[("MAX_FILE_SIZE_MB", huge.as_str())]).unwrap();
        assert_eq!(config.max_file_size_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(config_from(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        assert!(config_from(&[("PORT", "0")]).unwrap().validate().is_err());
        assert!(config_from(&[("MAX_BATCH_FILES", "0")])
            .unwrap()
            .validate()
            .is_err());
        assert!(config_from(&[("HTTP_CONCURRENCY_LIMIT", "0")])
            .unwrap()
            .validate()
            .is_err());
    }
}
