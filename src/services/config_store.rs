// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BACKUPS_KEPT: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    pub default_provider: Option<String>,
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub humanizer: HumanizerConfig,
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub enabled: bool,
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerConfig {
    /// Per-submission word limit.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,
    /// Simulated fallback latency is drawn from [min, max).
    #[serde(default = "default_delay_min")]
    pub fallback_delay_min_ms: u64,
    #[serde(default = "default_delay_max")]
    pub fallback_delay_max_ms: u64,
    #[serde(default = "default_monthly_limit")]
    pub monthly_word_limit: u64,
    /// Round-trip the provider before each session submission.
    #[serde(default = "default_true")]
    pub probe_health: bool,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            max_words: 300,
            request_timeout_secs: 30,
            health_timeout_secs: 10,
            fallback_delay_min_ms: 2000,
            fallback_delay_max_ms: 5000,
            monthly_word_limit: 150_000,
            probe_health: true,
        }
    }
}

impl HumanizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_words == 0 {
            return Err(ConfigError::Invalid("maxWords must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 || self.health_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".to_string()));
        }
        if self.fallback_delay_min_ms > self.fallback_delay_max_ms {
            return Err(ConfigError::Invalid(format!(
                "fallbackDelayMinMs ({}) exceeds fallbackDelayMaxMs ({})",
                self.fallback_delay_min_ms, self.fallback_delay_max_ms
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

fn default_max_words() -> usize { 300 }
fn default_request_timeout() -> u64 { 30 }
fn default_health_timeout() -> u64 { 10 }
fn default_delay_min() -> u64 { 2000 }
fn default_delay_max() -> u64 { 5000 }
fn default_monthly_limit() -> u64 { 150_000 }
fn default_true() -> bool { true }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("venba"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err(&self.config_dir))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err(&self.config_file))?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.humanizer.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config.humanizer.validate()?;
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let mut config = config.clone();
        if config.version.is_empty() {
            config.version = env!("CARGO_PKG_VERSION").to_string();
        }

        let content = serde_json::to_string_pretty(&config)?;
        fs::write(&self.config_file, content).map_err(io_err(&self.config_file))
    }

    fn backup_dir(&self) -> PathBuf {
        self.config_dir.join("backups")
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(io_err(&backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err(&backup_file))?;

        self.cleanup_old_backups(&backup_dir, BACKUPS_KEPT)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err(backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // File names carry the timestamp, so name order is age order.
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Get provider API key from config file
    pub fn get_api_key(&self, provider: &str) -> Result<Option<String>, ConfigError> {
        let config = self.load()?;
        Ok(config.api_keys.get(provider).cloned())
    }

    /// Store provider API key in config file
    pub fn set_api_key(&self, provider: &str, key: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_keys.insert(provider.to_string(), key.to_string());
        self.save(&config)
    }

    /// Delete provider API key from config file
    pub fn delete_api_key(&self, provider: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_keys.remove(provider);
        self.save(&config)
    }

    /// Set provider base URL in config file
    pub fn set_provider_url(&self, provider: &str, url: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        let provider_config = config.providers.entry(provider.to_string()).or_default();
        provider_config.base_url = Some(url.to_string());
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.humanizer.max_words, 300);
        assert_eq!(config.humanizer.fallback_delay_min_ms, 2000);
        assert!(config.humanizer.probe_health);
        assert!(config.humanizer.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"defaultProvider": "deepseek", "humanizer": {"maxWords": 50}}"#)
                .unwrap();
        assert_eq!(parsed.default_provider.as_deref(), Some("deepseek"));
        assert_eq!(parsed.humanizer.max_words, 50);
        assert_eq!(parsed.humanizer.request_timeout_secs, 30);
        assert!(parsed.api_keys.is_empty());
    }

    #[test]
    fn test_invalid_delay_range_rejected() {
        let cfg = HumanizerConfig {
            fallback_delay_min_ms: 6000,
            ..HumanizerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("venba"));
        let config = store.load().unwrap();
        assert!(config.default_provider.is_none());
    }

    #[test]
    fn test_save_and_reload_api_key_and_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());

        store.set_api_key("openai", "sk-test").unwrap();
        store.set_provider_url("openai", "http://localhost:8080/v1/chat/completions").unwrap();

        assert_eq!(store.get_api_key("openai").unwrap().as_deref(), Some("sk-test"));
        let config = store.load().unwrap();
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            config.providers["openai"].base_url.as_deref(),
            Some("http://localhost:8080/v1/chat/completions")
        );

        store.delete_api_key("openai").unwrap();
        assert_eq!(store.get_api_key("openai").unwrap(), None);
    }

    #[test]
    fn test_backups_are_created_and_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        let backup_dir = dir.path().join("backups");

        store.save(&AppConfig::default()).unwrap();
        assert!(!backup_dir.exists());

        fs::create_dir_all(&backup_dir).unwrap();
        for i in 0..(BACKUPS_KEPT + 3) {
            fs::write(backup_dir.join(format!("config_0000_{:02}.json", i)), "{}").unwrap();
        }
        store.save(&AppConfig::default()).unwrap();

        let count = fs::read_dir(&backup_dir).unwrap().count();
        assert_eq!(count, BACKUPS_KEPT);
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        fs::write(store.config_file(), "not json").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Parse(_))));
    }
}
