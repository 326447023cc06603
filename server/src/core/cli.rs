use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DATA_DIR, ENV_DB_MAX_CONNECTIONS, ENV_DEBUG, ENV_HOST, ENV_MAX_BODY_BYTES,
    ENV_PORT,
};

#[derive(Parser)]
#[command(name = "tracekeep")]
#[command(version, about = "Single-node span ingestion and trace query server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Maximum SQLite pool connections
    #[arg(long, global = true, env = ENV_DB_MAX_CONNECTIONS)]
    pub db_max_connections: Option<u32>,

    /// Maximum span ingestion request body in bytes (after decompression)
    #[arg(long, global = true, env = ENV_MAX_BODY_BYTES)]
    pub max_body_bytes: Option<usize>,

    /// Enable debug logging (unmatched requests are dumped in full)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub db_max_connections: Option<u32>,
    pub max_body_bytes: Option<usize>,
    pub debug: bool,
}

impl Cli {
    fn into_parts(self) -> (CliConfig, Option<Commands>) {
        let config = CliConfig {
            host: self.host,
            port: self.port,
            config: self.config,
            data_dir: self.data_dir,
            db_max_connections: self.db_max_connections,
            max_body_bytes: self.max_body_bytes,
            debug: self.debug,
        };
        (config, self.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    Cli::parse().into_parts()
}
