//! Configuration management for semsearch.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults
//! - A YAML config file (`semsearch.yaml`, or `SEMSEARCH_CONFIG`)
//! - Environment variables
//! - Command-line flags (see [`AppConfig::with_overrides`])

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "semsearch.yaml";

/// Embedding providers the service knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Address the HTTP server binds to
    pub bind: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Result count used when a search does not specify one
    pub default_top_k: usize,

    /// Embedding provider settings
    pub embedding: EmbeddingConfig,

    /// Log filter override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Provider endpoint (ollama only)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (ollama only)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
            timeout_secs: None,
        }
    }
}

/// Full configuration file structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    search: Option<SearchSection>,
    embedding: Option<EmbeddingSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSection {
    default_top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            bind: "127.0.0.1".to_string(),
            port: 8000,
            default_top_k: 5,
            embedding: EmbeddingConfig::default(),
            log_level: None,
            log_format: LogFormat::Text,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `SEMSEARCH_CONFIG`: Path to config file
    /// - `SEMSEARCH_BIND`: Bind address
    /// - `SEMSEARCH_PORT`: Listen port
    /// - `SEMSEARCH_EMBEDDING_PROVIDER`: Embedding provider
    /// - `SEMSEARCH_EMBEDDING_MODEL`: Embedding model
    /// - `OLLAMA_URL`: Ollama endpoint
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// `explicit_file` (from `--config`) wins over `SEMSEARCH_CONFIG`. An
    /// explicitly named file must exist; the default file is optional.
    pub fn load(explicit_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        let env_file = std::env::var("SEMSEARCH_CONFIG").ok().map(PathBuf::from);
        let named_file = explicit_file.map(Path::to_path_buf).or(env_file);

        match named_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        if let Ok(bind) = std::env::var("SEMSEARCH_BIND") {
            config.bind = bind;
        }

        if let Ok(port) = std::env::var("SEMSEARCH_PORT") {
            config.port = port
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid SEMSEARCH_PORT '{}': {}", port, e)))?;
        }

        if let Ok(provider) = std::env::var("SEMSEARCH_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("SEMSEARCH_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }

        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.embedding.endpoint = Some(url);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut merged = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        merged.config_file = Some(path.to_path_buf());

        tracing::debug!("Merged config file {:?}", path);
        Ok(merged)
    }

    /// Merge YAML configuration text into this config.
    pub fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(server) = file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
            if let Some(port) = server.port {
                result.port = port;
            }
        }

        if let Some(search) = file.search {
            if let Some(top_k) = search.default_top_k {
                result.default_top_k = top_k;
            }
        }

        if let Some(embedding) = file.embedding {
            let target = &mut result.embedding;
            if let Some(provider) = embedding.provider {
                target.provider = provider;
            }
            if let Some(model) = embedding.model {
                target.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                target.dimensions = dimensions;
            }
            if embedding.endpoint.is_some() {
                target.endpoint = embedding.endpoint;
            }
            if embedding.timeout_secs.is_some() {
                target.timeout_secs = embedding.timeout_secs;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the file and environment.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        log_format: Option<LogFormat>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.embedding.provider = provider;
        }

        if let Some(model) = model {
            self.embedding.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Socket address for the HTTP server.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| {
                AppError::Config(format!(
                    "Invalid bind address '{}:{}': {}",
                    self.bind, self.port, e
                ))
            })
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.embedding.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.default_top_k == 0 {
            return Err(AppError::Config(
                "search.defaultTopK must be at least 1".to_string(),
            ));
        }

        self.socket_addr()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.default_top_k, 5);
        assert_eq!(config.embedding.provider, "trigram");
        assert_eq!(config.embedding.dimensions, 384);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_yaml_str_partial() {
        let yaml = r#"
server:
  port: 9100
embedding:
  provider: ollama
  model: nomic-embed-text
  dimensions: 768
  endpoint: http://gpu-box:11434
  timeoutSecs: 10
logging:
  color: false
  format: json
"#;
        let config = AppConfig::default().merge_yaml_str(yaml).unwrap();

        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 9100);
        assert_eq!(config.default_top_k, 5);
        assert_eq!(config.embedding.provider, "ollama");
        assert_eq!(config.embedding.dimensions, 768);
        assert_eq!(
            config.embedding.endpoint.as_deref(),
            Some("http://gpu-box:11434")
        );
        assert_eq!(config.embedding.timeout_secs, Some(10));
        assert!(config.no_color);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_merge_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  defaultTopK: 12").unwrap();

        let config = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(config.default_top_k, 12);
        assert_eq!(config.config_file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_merge_yaml_invalid() {
        let result = AppConfig::default().merge_yaml_str("server: [1, 2");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("ollama".to_string()),
            Some("mxbai-embed-large".to_string()),
            None,
            Some(LogFormat::Json),
            true,
            false,
        );

        assert_eq!(config.embedding.provider, "ollama");
        assert_eq!(config.embedding.model, "mxbai-embed-large");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.embedding.provider = "word2vec".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = AppConfig::default();
        config.embedding.dimensions = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.default_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let mut config = AppConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8000);

        config.bind = "not an address".to_string();
        assert!(config.socket_addr().is_err());
        assert!(config.validate().is_err());
    }
}
