//! Configuration management for mineguard
//!
//! Config stored at: ~/.config/mineguard/config.json

use mineguard_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,

    /// Simulated seconds per tick
    #[serde(default = "default_delta_time")]
    pub delta_time: f64,

    /// Backend host
    #[serde(default = "default_host")]
    pub host: String,

    /// Backend port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Ticks between reconnection attempts while disconnected
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_ticks: u32,

    /// Scenario file; the built-in pit when absent
    #[serde(default)]
    pub scenario_path: Option<PathBuf>,
}

fn default_tick_rate() -> f64 {
    1.0
}

fn default_delta_time() -> f64 {
    1.0
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_reconnect_interval() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            delta_time: default_delta_time(),
            host: default_host(),
            port: default_port(),
            output_format: default_output_format(),
            reconnect_interval_ticks: default_reconnect_interval(),
            scenario_path: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("mineguard");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path; defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MineGuard Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Tick rate:          {} Hz", self.tick_rate_hz)?;
        writeln!(f, "Delta time:         {} s", self.delta_time)?;
        writeln!(f, "Backend:            {}:{}", self.host, self.port)?;
        writeln!(f, "Output format:      {}", self.output_format)?;
        writeln!(f, "Reconnect interval: {} ticks", self.reconnect_interval_ticks)?;
        writeln!(
            f,
            "Scenario:           {}",
            self.scenario_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in pit)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mineguard_types::Error;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"port": 6000, "output_format": "json"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.reconnect_interval_ticks, 5);
        assert!((config.tick_rate_hz - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            host: "10.0.0.7".to_string(),
            scenario_path: Some(PathBuf::from("pit.toml")),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_display_mentions_backend() {
        let text = Config::default().to_string();
        assert!(text.contains("localhost:5000"));
        assert!(text.contains("(built-in pit)"));
    }
}
