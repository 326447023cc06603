use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_INGEST_BODY_LIMIT, DEFAULT_PORT,
    SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CHECKPOINT_INTERVAL_SECS, SQLITE_MAX_CONNECTIONS,
};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub max_connections: Option<u32>,
    pub busy_timeout_secs: Option<u64>,
    pub checkpoint_interval_secs: Option<u64>,
}

/// Span ingestion configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IngestFileConfig {
    pub max_body_bytes: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub ingest: Option<IngestFileConfig>,
    pub data_dir: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.max_connections.is_some() {
                tracing::trace!(
                    max_connections = ?database.max_connections,
                    "Merging database.max_connections"
                );
                current.max_connections = database.max_connections;
            }
            if database.busy_timeout_secs.is_some() {
                tracing::trace!(
                    busy_timeout_secs = ?database.busy_timeout_secs,
                    "Merging database.busy_timeout_secs"
                );
                current.busy_timeout_secs = database.busy_timeout_secs;
            }
            if database.checkpoint_interval_secs.is_some() {
                tracing::trace!(
                    checkpoint_interval_secs = ?database.checkpoint_interval_secs,
                    "Merging database.checkpoint_interval_secs"
                );
                current.checkpoint_interval_secs = database.checkpoint_interval_secs;
            }
        }

        // Ingest
        if let Some(ingest) = other.ingest {
            let current = self.ingest.get_or_insert_with(IngestFileConfig::default);
            if ingest.max_body_bytes.is_some() {
                tracing::trace!(
                    max_body_bytes = ?ingest.max_body_bytes,
                    "Merging ingest.max_body_bytes"
                );
                current.max_body_bytes = ingest.max_body_bytes;
            }
        }

        if other.data_dir.is_some() {
            tracing::trace!(data_dir = ?other.data_dir, "Merging data_dir");
            self.data_dir = other.data_dir;
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// SQLite pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub checkpoint_interval_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: SQLITE_MAX_CONNECTIONS,
            busy_timeout_secs: SQLITE_BUSY_TIMEOUT_SECS,
            checkpoint_interval_secs: SQLITE_CHECKPOINT_INTERVAL_SECS,
        }
    }
}

/// Span ingestion configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Largest accepted request body after decompression
    pub max_body_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_INGEST_BODY_LIMIT,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    /// Explicit data directory; the platform data directory is used when unset
    pub data_dir: Option<PathBuf>,
    /// Set from `--debug`; raises the default log filter to debug
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tracekeep/tracekeep.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            max_connections = config.database.max_connections,
            busy_timeout_secs = config.database.busy_timeout_secs,
            checkpoint_interval_secs = config.database.checkpoint_interval_secs,
            max_body_bytes = config.ingest.max_body_bytes,
            data_dir = ?config.data_dir,
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_ingest = file_config.ingest.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            max_connections: cli
                .db_max_connections
                .or(file_database.max_connections)
                .unwrap_or(SQLITE_MAX_CONNECTIONS),
            busy_timeout_secs: file_database
                .busy_timeout_secs
                .unwrap_or(SQLITE_BUSY_TIMEOUT_SECS),
            checkpoint_interval_secs: file_database
                .checkpoint_interval_secs
                .unwrap_or(SQLITE_CHECKPOINT_INTERVAL_SECS),
        };

        let ingest = IngestConfig {
            max_body_bytes: cli
                .max_body_bytes
                .or(file_ingest.max_body_bytes)
                .unwrap_or(DEFAULT_INGEST_BODY_LIMIT),
        };

        // Relative paths in a config file resolve against the cwd, like --data-dir
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| file_config.data_dir.map(|d| expand_path(&d)));

        Self {
            server,
            database,
            ingest,
            data_dir,
            debug: cli.debug,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind to a random port nobody can find
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }

        if self.database.checkpoint_interval_secs == 0 {
            anyhow::bail!(
                "Configuration error: database.checkpoint_interval_secs must be greater than 0"
            );
        }

        if self.ingest.max_body_bytes == 0 {
            anyhow::bail!("Configuration error: ingest.max_body_bytes must be greater than 0");
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Server binds to all network interfaces; span ingestion is unauthenticated"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.tracekeep/tracekeep.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("custom.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "database": { "max_connections": 8, "busy_timeout_secs": 10, "checkpoint_interval_secs": 60 },
            "ingest": { "max_body_bytes": 1048576 },
            "data_dir": "/var/lib/tracekeep"
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.max_connections, Some(8));
        assert_eq!(database.busy_timeout_secs, Some(10));
        assert_eq!(database.checkpoint_interval_secs, Some(60));

        assert_eq!(
            config.ingest.as_ref().unwrap().max_body_bytes,
            Some(1_048_576)
        );
        assert_eq!(config.data_dir.as_deref(), Some("/var/lib/tracekeep"));
    }

    #[test]
    fn test_file_config_parse_partial() {
        let json = r#"{ "server": { "port": 9000 } }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert!(config.server.as_ref().unwrap().host.is_none());
        assert_eq!(config.server.as_ref().unwrap().port, Some(9000));
        assert!(config.database.is_none());
        assert!(config.ingest.is_none());
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();

        assert!(config.server.is_none());
        assert!(config.database.is_none());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "retention": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("retention").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            server: Some(ServerFileConfig {
                host: Some("base.host".to_string()),
                port: Some(1000),
            }),
            database: Some(DatabaseFileConfig {
                max_connections: Some(2),
                busy_timeout_secs: Some(5),
                checkpoint_interval_secs: None,
            }),
            ..Default::default()
        };

        let overlay = FileConfig {
            server: Some(ServerFileConfig {
                host: None,
                port: Some(2000),
            }),
            database: Some(DatabaseFileConfig {
                max_connections: Some(9),
                busy_timeout_secs: None,
                checkpoint_interval_secs: Some(30),
            }),
            ingest: Some(IngestFileConfig {
                max_body_bytes: Some(4096),
            }),
            data_dir: Some("/overlay".to_string()),
            ..Default::default()
        };

        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("base.host".to_string()));
        assert_eq!(server.port, Some(2000));

        let database = base.database.unwrap();
        assert_eq!(database.max_connections, Some(9));
        assert_eq!(database.busy_timeout_secs, Some(5));
        assert_eq!(database.checkpoint_interval_secs, Some(30));

        assert_eq!(base.ingest.unwrap().max_body_bytes, Some(4096));
        assert_eq!(base.data_dir.as_deref(), Some("/overlay"));
    }

    #[test]
    fn test_layer_defaults() {
        let config = AppConfig::layer(&CliConfig::default(), FileConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.max_connections, SQLITE_MAX_CONNECTIONS);
        assert_eq!(config.database.busy_timeout_secs, SQLITE_BUSY_TIMEOUT_SECS);
        assert_eq!(
            config.database.checkpoint_interval_secs,
            SQLITE_CHECKPOINT_INTERVAL_SECS
        );
        assert_eq!(config.ingest.max_body_bytes, DEFAULT_INGEST_BODY_LIMIT);
        assert!(config.data_dir.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_layer_cli_overrides_file() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "file.host", "port": 7000 },
                "database": { "max_connections": 3 },
                "ingest": { "max_body_bytes": 2048 },
                "data_dir": "/from/file"
            }"#,
        )
        .unwrap();
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            port: Some(3000),
            db_max_connections: Some(12),
            max_body_bytes: Some(8192),
            data_dir: Some(PathBuf::from("/from/cli")),
            debug: true,
            ..Default::default()
        };

        let config = AppConfig::layer(&cli, file_config);

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.ingest.max_body_bytes, 8192);
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/cli")));
        assert!(config.debug);
    }

    #[test]
    fn test_layer_file_overrides_defaults() {
        let file_config: FileConfig = serde_json::from_str(
            r#"{
                "server": { "port": 7000 },
                "database": { "busy_timeout_secs": 2, "checkpoint_interval_secs": 15 },
                "data_dir": "/from/file"
            }"#,
        )
        .unwrap();

        let config = AppConfig::layer(&CliConfig::default(), file_config);

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.database.busy_timeout_secs, 2);
        assert_eq!(config.database.checkpoint_interval_secs, 15);
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/file")));
        assert!(!config.debug);
    }

    #[test]
    fn test_load_from_cli_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{ "server": { "port": 6123 }, "ingest": { "max_body_bytes": 512 } }"#,
        );
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };

        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.port, 6123);
        assert_eq!(config.ingest.max_body_bytes, 512);
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/tracekeep.json")),
            ..Default::default()
        };

        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_malformed_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{ not json");
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };

        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = AppConfig::default();
        config.server.host = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.checkpoint_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ingest.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }

    #[test]
    fn test_profile_config_path() {
        if let Some(path) = get_profile_config_path() {
            assert!(path.ends_with(".tracekeep/tracekeep.json"));
        }
    }
}
