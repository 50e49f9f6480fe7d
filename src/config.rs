//! Configuration management for Keyscan Diagnostics
//!
//! Engine parameters and the scan-matrix topology are read from a TOML file
//! at a platform-specific location.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keyscan-diagnostics/config.toml` |
//! | macOS | `~/Library/Application Support/keyscan-diagnostics/config.toml` |
//! | Windows | `%APPDATA%\keyscan-diagnostics\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keyscan_diagnostics::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Modify settings
//! config.engine.chatter_window_ms = 25;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use crate::matrix::{KeyShape, LineInfo, MatrixKind, Topology};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Most scan lines a topology may declare
pub const MAX_LINES: usize = 256;

/// Most key positions a topology may declare
pub const MAX_KEYS: usize = 65_536;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Values that the engine cannot run with
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("keyscan-diagnostics");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine sizing and chatter detection
    #[serde(default)]
    pub engine: EngineConfig,
    /// Scan-matrix wiring
    #[serde(default)]
    pub topology: TopologyConfig,
}

/// Engine sizing and chatter detection defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Events kept for recent-history queries
    pub event_buffer_capacity: usize,
    /// Burst window for chatter detection in ms
    pub chatter_window_ms: u64,
    /// Transitions within one window that count as chattering
    pub chatter_burst_threshold: u32,
    /// Begin monitoring without waiting for a start request
    pub start_active: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_buffer_capacity: 64,
            chatter_window_ms: 30,
            chatter_burst_threshold: 3,
            start_active: false,
        }
    }
}

/// Scan-matrix topology as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopologyConfig {
    /// Wiring scheme: `charlieplex`, `row-column` or `none`
    pub kind: MatrixKind,
    /// Number of lines of a charlieplexed matrix
    pub line_count: usize,
    /// Drive lines of a row/column matrix
    pub rows: usize,
    /// Sense lines of a row/column matrix
    pub cols: usize,
    /// Logical key count, when it differs from the number of line pairs
    pub key_count: Option<usize>,
    /// Port/pin identity per line, in line order
    pub lines: Vec<LineInfo>,
    /// Physical key shapes, in position order
    pub layout: Vec<KeyShape>,
}

impl TopologyConfig {
    fn expected_lines(&self) -> usize {
        match self.kind {
            MatrixKind::Charlieplex => self.line_count,
            MatrixKind::RowColumn => self.rows + self.cols,
            MatrixKind::Unknown => 0,
        }
    }

    /// Build the topology descriptor
    pub fn topology(&self) -> Topology {
        let topology = match self.kind {
            MatrixKind::Charlieplex => Topology::charlieplex(self.line_count),
            MatrixKind::RowColumn => Topology::row_column(self.rows, self.cols),
            MatrixKind::Unknown => return Topology::unavailable(),
        };
        let topology = topology
            .with_lines(self.lines.clone())
            .with_layout(self.layout.clone());
        match self.key_count {
            Some(count) => topology.with_key_count(count),
            None => topology,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.chatter_burst_threshold == 0 {
            return Err(ConfigError::Invalid(
                "chatter_burst_threshold must be at least 1".to_string(),
            ));
        }
        if self.engine.event_buffer_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_buffer_capacity must be at least 1".to_string(),
            ));
        }

        let topo = &self.topology;
        match topo.kind {
            MatrixKind::Charlieplex if topo.line_count < 2 => {
                return Err(ConfigError::Invalid(format!(
                    "charlieplex matrix needs at least 2 lines, got {}",
                    topo.line_count
                )));
            }
            MatrixKind::RowColumn if topo.rows == 0 || topo.cols == 0 => {
                return Err(ConfigError::Invalid(format!(
                    "row-column matrix needs rows and cols, got {}x{}",
                    topo.rows, topo.cols
                )));
            }
            _ => {}
        }

        if topo.expected_lines() > MAX_LINES {
            return Err(ConfigError::Invalid(format!(
                "{} lines exceeds the limit of {}",
                topo.expected_lines(),
                MAX_LINES
            )));
        }
        if let Some(count) = topo.key_count.filter(|&count| count > MAX_KEYS) {
            return Err(ConfigError::Invalid(format!(
                "key_count {} exceeds the limit of {}",
                count, MAX_KEYS
            )));
        }

        if !topo.lines.is_empty() && topo.lines.len() != topo.expected_lines() {
            return Err(ConfigError::Invalid(format!(
                "{} line identities given for {} lines",
                topo.lines.len(),
                topo.expected_lines()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!(
            "keyscan-diagnostics-test-{}.toml",
            std::process::id()
        ))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.engine.event_buffer_capacity, 64);
        assert_eq!(config.engine.chatter_window_ms, 30);
        assert_eq!(config.engine.chatter_burst_threshold, 3);
        assert!(!config.engine.start_active);
        assert_eq!(config.topology.kind, MatrixKind::Unknown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.engine.chatter_window_ms = 45;
        config.topology.kind = MatrixKind::Charlieplex;
        config.topology.line_count = 5;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.engine.chatter_window_ms, 45);
        assert_eq!(loaded.topology.kind, MatrixKind::Charlieplex);
        assert_eq!(loaded.topology.line_count, 5);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[engine]
event_buffer_capacity = 128
chatter_window_ms = 20
chatter_burst_threshold = 4
start_active = true

[topology]
kind = "charlieplex"
line_count = 3
lines = [
    { port = "gpio1", pin = 2 },
    { port = "gpio1", pin = 3 },
    { port = "gpio0", pin = 28 },
]
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.engine.event_buffer_capacity, 128);
        assert_eq!(config.engine.chatter_window_ms, 20);
        assert_eq!(config.engine.chatter_burst_threshold, 4);
        assert!(config.engine.start_active);
        assert_eq!(config.topology.kind, MatrixKind::Charlieplex);
        assert_eq!(config.topology.lines[2], LineInfo::new("gpio0", 28));
        assert!(config.validate().is_ok());

        let topology = config.topology.topology();
        assert_eq!(topology.line_count(), 3);
        assert_eq!(topology.lines()[0], LineInfo::new("gpio1", 2));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
[topology]
kind = "row-column"
rows = 2
cols = 3
"#;
        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.engine.chatter_burst_threshold, 3);
        assert_eq!(config.topology.topology().line_count(), 5);
    }

    #[test]
    fn none_kind_builds_unavailable_topology() {
        let config: Config = toml::from_str("[topology]\nkind = \"none\"\n").expect("parse");
        assert_eq!(config.topology.topology(), Topology::unavailable());
    }

    #[test]
    fn key_count_is_carried_into_topology() {
        let mut config = Config::default();
        config.topology.kind = MatrixKind::Charlieplex;
        config.topology.line_count = 4;
        config.topology.key_count = Some(10);
        assert_eq!(config.topology.topology().declared_key_count(), Some(10));
    }

    #[test]
    fn layout_table_reaches_topology() {
        let toml_str = r#"
[topology]
kind = "charlieplex"
line_count = 2

[[topology.layout]]
x = 0
y = 0
width = 100
height = 100

[[topology.layout]]
x = 100
y = 0
width = 100
height = 100
"#;
        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        let topology = config.topology.topology();
        assert_eq!(topology.layout().len(), 2);
        assert_eq!(topology.layout()[1], KeyShape::new(100, 0, 100, 100));
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let mut config = Config::default();
        config.engine.chatter_burst_threshold = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_zero_buffer() {
        let mut config = Config::default();
        config.engine.event_buffer_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_single_line_charlieplex() {
        let mut config = Config::default();
        config.topology.kind = MatrixKind::Charlieplex;
        config.topology.line_count = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_line_identity_mismatch() {
        let mut config = Config::default();
        config.topology.kind = MatrixKind::RowColumn;
        config.topology.rows = 2;
        config.topology.cols = 2;
        config.topology.lines = vec![LineInfo::new("gpio0", 1)];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_huge_key_count() {
        let mut config = Config::default();
        config.topology.kind = MatrixKind::Charlieplex;
        config.topology.line_count = 4;
        config.topology.key_count = Some(10_000_000_000_000);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.topology.key_count = Some(MAX_KEYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_too_many_lines() {
        let mut config = Config::default();
        config.topology.kind = MatrixKind::RowColumn;
        config.topology.rows = MAX_LINES;
        config.topology.cols = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
        assert!(toml_str.contains("[engine]"));
        assert!(toml_str.contains("[topology]"));
        assert!(toml_str.contains("chatter_window_ms = 30"));
        assert!(toml_str.contains("kind = \"unknown\""));
    }
}
