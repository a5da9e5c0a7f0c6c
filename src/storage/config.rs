use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::records::{CorruptPolicy, DEFAULT_RECORDS_KEY};
use crate::models::IdStrategy;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// General configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Built-in theme name ("mocha" or "latte")
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Minimum level written to the log file
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Minimum level shown as flash messages in the TUI
    #[serde(default = "default_flash_level")]
    pub flash_level: String,

    /// How long flash messages stay visible
    #[serde(default = "default_flash_message_duration_ms")]
    pub flash_message_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            theme: default_theme(),
            log_level: default_log_level(),
            flash_level: default_flash_level(),
            flash_message_duration_ms: default_flash_message_duration_ms(),
        }
    }
}

/// Record persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the record collection is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// Behaviour when the stored blob cannot be parsed
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,

    /// How new record ids are generated
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_key(),
            on_corrupt: CorruptPolicy::default(),
            id_strategy: IdStrategy::default(),
        }
    }
}

// Default value functions for serde
fn default_theme() -> String {
    "mocha".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flash_level() -> String {
    "warn".to_string()
}

fn default_flash_message_duration_ms() -> u64 {
    4000
}

fn default_key() -> String {
    DEFAULT_RECORDS_KEY.to_string()
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: theme={}, key={:?}, on_corrupt={:?}, id_strategy={:?}",
            config.general.theme,
            config.storage.key,
            config.storage.on_corrupt,
            config.storage.id_strategy
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        let toml_str = toml::to_string_pretty(config)
            .with_context(|| "Failed to serialize configuration")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../../periodr.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.general.theme, "mocha");
        assert_eq!(config.general.flash_message_duration_ms, 4000);
        assert_eq!(config.storage.key, "alunos");
        assert_eq!(config.storage.on_corrupt, CorruptPolicy::Backup);
        assert_eq!(config.storage.id_strategy, IdStrategy::Monotonic);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
        [storage]
        on_corrupt = "fail"
        id_strategy = "timestamp"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.key, "alunos");
        assert_eq!(config.storage.on_corrupt, CorruptPolicy::Fail);
        assert_eq!(config.storage.id_strategy, IdStrategy::Timestamp);
        assert_eq!(config.general, GeneralConfig::default());
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: Config = toml::from_str(include_str!("../../periodr.toml.example")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(dir.path().join("periodr.toml"));
        let config = storage.load().unwrap();
        assert_eq!(config, Config::default());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(dir.path().join("periodr.toml"));
        let mut config = Config::default();
        config.general.theme = "latte".to_string();
        config.storage.key = "periodos".to_string();
        storage.save(&config).unwrap();
        assert_eq!(storage.load().unwrap(), config);
    }
}
