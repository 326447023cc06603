// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Tracekeep";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tracekeep";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tracekeep";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tracekeep.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACEKEEP_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "TRACEKEEP_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "TRACEKEEP_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACEKEEP_LOG";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "TRACEKEEP_DEBUG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "TRACEKEEP_DATA_DIR";

/// Environment variable for SQLite pool size
pub const ENV_DB_MAX_CONNECTIONS: &str = "TRACEKEEP_DB_MAX_CONNECTIONS";

/// Environment variable for the ingest request body limit
pub const ENV_MAX_BODY_BYTES: &str = "TRACEKEEP_MAX_BODY_BYTES";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "tracekeep.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default limit for ingest request bodies (decompressed)
pub const DEFAULT_INGEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Limit for everything that is not span ingestion
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
