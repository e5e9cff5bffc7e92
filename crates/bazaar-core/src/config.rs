//! Configuration loading and typed config structures for the Bazaar
//! simulation.
//!
//! The canonical configuration lives in `bazaar-config.yaml` at the project
//! root. Every field has a default, so an empty document (or a missing
//! section) yields a runnable configuration.

use std::path::Path;
use std::time::Duration;

use bazaar_trader::TraderConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `bazaar-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing, bounds).
    #[serde(default)]
    pub world: WorldConfig,

    /// Trader behaviour parameters.
    #[serde(default)]
    pub trader: TraderSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the RNG that picks trader speech.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulated milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Whether ticks are paced in wall-clock time. When `false` the loop
    /// runs as fast as it can.
    #[serde(default = "default_real_time")]
    pub real_time: bool,

    /// Stop after this many ticks. `0` runs until interrupted.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl WorldConfig {
    /// Tick step as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            real_time: default_real_time(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// Trader parameters as they appear in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TraderSettings {
    /// Seconds between two restock ticks of one trader.
    #[serde(default = "default_trader_tick_secs")]
    pub tick_interval_secs: u64,

    /// Radius searched for loose payment items around a trader.
    #[serde(default = "default_search_radius")]
    pub search_radius: f32,

    /// Maximum container nesting explored when looking for payment.
    #[serde(default = "default_max_container_depth")]
    pub max_container_depth: u32,
}

impl TraderSettings {
    /// Convert into the runtime [`TraderConfig`].
    pub const fn to_trader_config(&self) -> TraderConfig {
        TraderConfig {
            tick_interval: Duration::from_secs(self.tick_interval_secs),
            search_radius: self.search_radius,
            max_container_depth: self.max_container_depth,
        }
    }
}

impl Default for TraderSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_trader_tick_secs(),
            search_radius: default_search_radius(),
            max_container_depth: default_max_container_depth(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Bazaar".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_real_time() -> bool {
    true
}

const fn default_max_ticks() -> u64 {
    120
}

const fn default_trader_tick_secs() -> u64 {
    5
}

const fn default_search_radius() -> f32 {
    1.0
}

const fn default_max_container_depth() -> u32 {
    16
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.trader.to_trader_config(), TraderConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r"
world:
  name: Harbour Market
  max_ticks: 10
trader:
  search_radius: 2.5
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Harbour Market");
        assert_eq!(config.world.max_ticks, 10);
        assert_eq!(config.world.tick_interval_ms, 1_000);
        assert!((config.trader.search_radius - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.trader.max_container_depth, 16);
    }

    #[test]
    fn trader_settings_convert_to_runtime_config() {
        let settings = TraderSettings {
            tick_interval_secs: 30,
            search_radius: 0.5,
            max_container_depth: 4,
        };
        let config = settings.to_trader_config();
        assert_eq!(config.tick_interval, Duration::from_secs(30));
        assert_eq!(config.max_container_depth, 4);
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = SimulationConfig::parse("world: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/bazaar.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
