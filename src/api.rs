// Command surface
// Operations a front-end calls: humanize, word counting, health, registries, config.

use crate::models::{HumanizationMode, Language, ModeInfo, UsageLedger, SUPPORTED_LANGUAGES};
use crate::services::{
    known_providers, text_processor, AppConfig, ChatCapability, ConfigStore, Humanizer,
    ProviderClient, Session, SessionOutcome,
};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Open the config store at `config_dir`, or the platform default.
pub fn open_store(config_dir: Option<PathBuf>) -> Result<ConfigStore> {
    let dir = match config_dir {
        Some(dir) => dir,
        None => ConfigStore::default_config_dir().context("no config directory on this platform")?,
    };
    Ok(ConfigStore::new(dir))
}

pub fn get_config(store: &ConfigStore) -> Result<AppConfig> {
    store
        .load()
        .with_context(|| format!("loading {}", store.config_file().display()))
}

pub fn save_config(store: &ConfigStore, config: &AppConfig) -> Result<()> {
    store
        .save(config)
        .with_context(|| format!("saving {}", store.config_file().display()))
}

pub fn store_api_key(store: &ConfigStore, provider: &str, key: &str) -> Result<()> {
    let provider = provider.trim().to_lowercase();
    if provider.is_empty() {
        bail!("provider name is empty");
    }
    if key.trim().is_empty() {
        bail!("API key is empty");
    }
    store.set_api_key(&provider, key.trim())?;
    info!(provider = %provider, "config.api_key_stored");
    Ok(())
}

pub fn delete_api_key(store: &ConfigStore, provider: &str) -> Result<()> {
    store.delete_api_key(&provider.trim().to_lowercase())?;
    Ok(())
}

pub fn set_provider_url(store: &ConfigStore, provider: &str, url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("provider URL must start with http:// or https://, got {:?}", url);
    }
    store.set_provider_url(&provider.trim().to_lowercase(), url)?;
    Ok(())
}

pub fn get_providers() -> &'static [&'static str] {
    known_providers()
}

pub fn list_modes() -> Vec<ModeInfo> {
    HumanizationMode::ALL.iter().copied().map(ModeInfo::from).collect()
}

pub fn list_languages() -> &'static [Language] {
    SUPPORTED_LANGUAGES
}

pub fn count_words(text: &str) -> usize {
    text_processor::count_words(text)
}

/// Starting ledger for a fresh session.
pub fn new_ledger(config: &AppConfig) -> UsageLedger {
    UsageLedger::new(config.humanizer.monthly_word_limit)
}

/// Build a session over `chat` using the humanizer settings in `config`.
pub fn session_with_chat(config: &AppConfig, chat: Arc<dyn ChatCapability>) -> Session {
    let humanizer = Arc::new(Humanizer::new(chat.clone(), &config.humanizer));
    let session = Session::new(humanizer, chat);
    if config.humanizer.probe_health {
        session.with_health_probe(Duration::from_secs(config.humanizer.health_timeout_secs))
    } else {
        session
    }
}

/// Build a session talking to `provider` (or the configured default).
pub fn build_session(config: &AppConfig, provider: Option<&str>) -> Result<Session> {
    let client = ProviderClient::from_config(config, provider).context("configuring chat provider")?;
    info!(
        provider = client.name(),
        model = client.model(),
        kind = ?client.kind(),
        url = client.url(),
        available = client.is_available(),
        "session.provider"
    );
    Ok(session_with_chat(config, Arc::new(client)))
}

pub async fn humanize(
    session: &Session,
    ledger: UsageLedger,
    text: &str,
    mode: &str,
    language: &str,
) -> Result<SessionOutcome> {
    Ok(session.submit(ledger, text, mode, language).await?)
}

pub async fn check_health(session: &Session) -> bool {
    session.check_health().await
}
