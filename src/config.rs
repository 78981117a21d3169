// Configuration module
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use chirpdb_store::RocksDbSettings;

/// Main engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpConfig {
    pub storage: StorageSettings,
    #[serde(default)]
    pub keyspace: KeyspaceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory of the embedded store. This is the engine's
    /// "connection string": it is read once at startup, and failing to
    /// open it is fatal.
    pub path: String,
    #[serde(default)]
    pub rocksdb: RocksDbTuning,
}

/// RocksDB-specific tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbTuning {
    /// Write buffer size per column family in bytes (default: 64MB)
    #[serde(default = "default_write_buffer_size")]
    pub write_buffer_size: usize,

    /// Maximum number of write buffers (default: 3)
    #[serde(default = "default_max_write_buffers")]
    pub max_write_buffers: i32,

    /// Block cache size shared across column families (default: 256MB)
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of background jobs (default: 4)
    #[serde(default = "default_max_background_jobs")]
    pub max_background_jobs: i32,
}

impl RocksDbTuning {
    pub fn to_settings(&self) -> RocksDbSettings {
        RocksDbSettings {
            write_buffer_size: self.write_buffer_size,
            max_write_buffers: self.max_write_buffers,
            block_cache_size: self.block_cache_size,
            max_background_jobs: self.max_background_jobs,
        }
    }
}

impl Default for RocksDbTuning {
    fn default() -> Self {
        Self {
            write_buffer_size: default_write_buffer_size(),
            max_write_buffers: default_max_write_buffers(),
            block_cache_size: default_block_cache_size(),
            max_background_jobs: default_max_background_jobs(),
        }
    }
}

/// Keyspace settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyspaceSettings {
    /// Keyspace name; qualifies every table name (default: "tweet")
    #[serde(default = "default_keyspace_name")]
    pub name: String,

    /// Replication factor recorded for the keyspace (default: 1).
    /// The embedded engine stores a single replica regardless; the factor
    /// is validated non-zero and logged at schema setup.
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u32,

    /// Write/read acknowledgment level (default and only supported value:
    /// "one"). Single-replica acknowledgment trades consistency for write
    /// latency; callers must tolerate stale reads after a write.
    #[serde(default = "default_consistency")]
    pub consistency: String,
}

impl Default for KeyspaceSettings {
    fn default() -> Self {
        Self {
            name: default_keyspace_name(),
            replication_factor: default_replication_factor(),
            consistency: default_consistency(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: default_true(),
            format: default_log_format(),
        }
    }
}

// Default value functions

fn default_write_buffer_size() -> usize {
    64 * 1024 * 1024 // 64MB
}

fn default_max_write_buffers() -> i32 {
    3
}

fn default_block_cache_size() -> usize {
    256 * 1024 * 1024 // 256MB
}

fn default_max_background_jobs() -> i32 {
    4
}

fn default_keyspace_name() -> String {
    "tweet".to_string()
}

fn default_replication_factor() -> u32 {
    1
}

fn default_consistency() -> String {
    "one".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "./logs/chirpdb.log".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

impl ChirpConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ChirpConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported variables (take precedence over file values):
    /// - CHIRPDB_DATA_DIR: overrides storage.path
    /// - CHIRPDB_KEYSPACE: overrides keyspace.name
    /// - CHIRPDB_LOG_LEVEL: overrides logging.level
    /// - CHIRPDB_LOG_TO_CONSOLE: overrides logging.log_to_console
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        use std::env;

        if let Ok(path) = env::var("CHIRPDB_DATA_DIR") {
            self.storage.path = path;
        }
        if let Ok(name) = env::var("CHIRPDB_KEYSPACE") {
            self.keyspace.name = name;
        }
        if let Ok(level) = env::var("CHIRPDB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(val) = env::var("CHIRPDB_LOG_TO_CONSOLE") {
            self.logging.log_to_console =
                val.to_lowercase() == "true" || val == "1" || val.to_lowercase() == "yes";
        }

        Ok(())
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.path.is_empty() {
            return Err(anyhow::anyhow!("storage.path cannot be empty"));
        }

        if self.keyspace.name.is_empty() {
            return Err(anyhow::anyhow!("keyspace.name cannot be empty"));
        }
        // ':' separates keyspace from table in qualified names.
        if self.keyspace.name.contains(':') {
            return Err(anyhow::anyhow!(
                "keyspace.name cannot contain ':' (got '{}')",
                self.keyspace.name
            ));
        }

        if self.keyspace.replication_factor == 0 {
            return Err(anyhow::anyhow!("keyspace.replication_factor cannot be 0"));
        }

        if self.keyspace.consistency != "one" {
            return Err(anyhow::anyhow!(
                "Unsupported consistency level '{}'. The engine acknowledges at a single replica; only \"one\" is supported",
                self.keyspace.consistency
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }

    /// Get default configuration (useful for testing).
    pub fn default() -> Self {
        ChirpConfig {
            storage: StorageSettings {
                path: "./data/chirpdb".to_string(),
                rocksdb: RocksDbTuning::default(),
            },
            keyspace: KeyspaceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
