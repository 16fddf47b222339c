// AI Provider Service
// Chat calls against OpenAI-compatible and Anthropic endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use super::config_store::{AppConfig, ConfigStore};

const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEEPSEEK_DEFAULT_URL: &str = "https://api.deepseek.com/chat/completions";
const GLM_DEFAULT_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";
const ANTHROPIC_DEFAULT_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_PROVIDER: &str = "openai";
const HEALTH_PROMPT: &str = "Hello";
const DEFAULT_MAX_TOKENS: i32 = 2048;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("API key not configured")]
    MissingApiKey,
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,
    pub model: String,
}

pub fn parse_provider(spec: &str) -> ProviderSpec {
    let parts: Vec<&str> = spec.splitn(2, ':').collect();
    if parts.len() == 2 {
        ProviderSpec {
            name: parts[0].trim().to_lowercase(),
            model: parts[1].trim().to_string(),
        }
    } else {
        ProviderSpec {
            name: spec.trim().to_lowercase(),
            model: String::new(),
        }
    }
}

/// Wire protocol spoken by a provider.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProviderKind {
    OpenAiCompatible,
    Anthropic,
}

/// Protocol, default URL and default model for a known provider name.
fn provider_defaults(name: &str) -> Option<(ProviderKind, &'static str, &'static str)> {
    match name {
        "openai" => Some((ProviderKind::OpenAiCompatible, OPENAI_DEFAULT_URL, "gpt-4o-mini")),
        "deepseek" => Some((ProviderKind::OpenAiCompatible, DEEPSEEK_DEFAULT_URL, "deepseek-chat")),
        "glm" => Some((ProviderKind::OpenAiCompatible, GLM_DEFAULT_URL, "glm-4-flash")),
        "anthropic" | "claude" => Some((
            ProviderKind::Anthropic,
            ANTHROPIC_DEFAULT_URL,
            "claude-3-5-haiku-latest",
        )),
        _ => None,
    }
}

pub fn known_providers() -> &'static [&'static str] {
    &["openai", "deepseek", "glm", "anthropic"]
}

/// The external chat capability the humanizer depends on.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Cheap local probe: is the capability configured at all?
    fn is_available(&self) -> bool;

    /// Send one prompt and return the raw reply text.
    async fn chat(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Round-trip a trivial prompt; any failure counts as unhealthy.
    async fn check_health(&self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.chat(HEALTH_PROMPT).await.is_ok()
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: i32,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessageResponse {
    content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    pub content: String,
    pub latency_ms: i64,
}

pub struct ProviderClient {
    client: Client,
    name: String,
    kind: ProviderKind,
    url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: i32,
}

impl ProviderClient {
    /// Build a client for `spec` (`name[:model]`).
    ///
    /// URL precedence: explicit `base_url`, then `{NAME}_API_URL`, then the
    /// provider default. Unknown names are accepted when a URL is supplied and
    /// are assumed to speak the OpenAI-compatible protocol.
    pub fn new(
        spec: &ProviderSpec,
        base_url: Option<&str>,
        api_key: Option<String>,
        timeout: Duration,
        proxy_url: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let env_url = env::var(format!("{}_API_URL", spec.name.to_uppercase()))
            .ok()
            .filter(|u| !u.trim().is_empty());
        let url_override = base_url
            .map(|u| u.to_string())
            .filter(|u| !u.trim().is_empty())
            .or(env_url);

        let (kind, url, default_model) = match (provider_defaults(&spec.name), url_override) {
            (Some((kind, _, model)), Some(url)) => (kind, url, model),
            (Some((kind, url, model)), None) => (kind, url.to_string(), model),
            (None, Some(url)) => (ProviderKind::OpenAiCompatible, url, ""),
            (None, None) => return Err(ProviderError::UnknownProvider(spec.name.clone())),
        };

        let model = if spec.model.trim().is_empty() {
            default_model.to_string()
        } else {
            spec.model.clone()
        };

        let mut builder = Client::builder().timeout(timeout);
        if let Some(proxy_url) = proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            name: spec.name.clone(),
            kind,
            url,
            model,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Build the client for `provider` (or the configured default) from the app config.
    pub fn from_config(config: &AppConfig, provider: Option<&str>) -> Result<Self, ProviderError> {
        let spec_str = provider
            .map(|p| p.to_string())
            .or_else(|| config.default_provider.clone())
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
        let mut spec = parse_provider(&spec_str);

        let provider_config = config.providers.get(&spec.name);
        if spec.model.is_empty() {
            if let Some(model) = provider_config.and_then(|p| p.model.clone()) {
                spec.model = model;
            }
        }
        let base_url = provider_config.and_then(|p| p.base_url.as_deref());

        let proxy_url = config
            .proxy
            .as_ref()
            .filter(|p| p.enabled)
            .and_then(|p| p.https.as_deref().or(p.http.as_deref()));

        let api_key = env_api_key(&spec.name)
            .or_else(|| config.api_keys.get(&spec.name).cloned())
            .or_else(|| get_api_key(&spec.name));
        let timeout = Duration::from_secs(config.humanizer.request_timeout_secs.max(1));

        Self::new(&spec, base_url, api_key, timeout, proxy_url)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub async fn call(&self, prompt: &str) -> Result<ChatResult, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let result = match self.kind {
            ProviderKind::OpenAiCompatible => self.call_chat_api(api_key, prompt).await,
            ProviderKind::Anthropic => self.call_anthropic_api(api_key, prompt).await,
        }?;
        debug!(
            provider = %self.name,
            model = %self.model,
            latency_ms = result.latency_ms,
            "provider.chat.ok"
        );
        Ok(result)
    }

    async fn call_anthropic_api(&self, api_key: &str, prompt: &str) -> Result<ChatResult, ProviderError> {
        #[derive(Serialize)]
        struct AnthropicRequest {
            model: String,
            max_tokens: i32,
            messages: Vec<ChatMessage>,
        }

        #[derive(Deserialize)]
        struct AnthropicResponse {
            content: Option<Vec<AnthropicContent>>,
        }

        #[derive(Deserialize)]
        struct AnthropicContent {
            text: Option<String>,
        }

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        let content = data
            .content
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");
        if content.is_empty() {
            return Err(ProviderError::MissingContent);
        }

        Ok(ChatResult { content, latency_ms })
    }

    async fn call_chat_api(&self, api_key: &str, prompt: &str) -> Result<ChatResult, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        let content = data
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(content_to_string)
            .ok_or(ProviderError::MissingContent)?;

        Ok(ChatResult { content, latency_ms })
    }
}

/// Coerce a message `content` value to text. Some compatible servers return
/// an array of parts instead of a plain string.
fn content_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()).or_else(|| p.as_str()))
            .collect::<Vec<_>>()
            .join(""),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ChatCapability for ProviderClient {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(&self, prompt: &str) -> Result<String, ProviderError> {
        self.call(prompt).await.map(|r| r.content)
    }
}

fn env_api_key(provider: &str) -> Option<String> {
    let upper = provider.to_uppercase();
    let mut env_keys = vec![format!("{}_API_KEY", upper), format!("VENBA_{}_API_KEY", upper)];
    if provider == "claude" {
        env_keys.push("ANTHROPIC_API_KEY".to_string());
    }

    for key in env_keys {
        if let Ok(val) = env::var(&key) {
            let v = val.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

/// Get API key from environment or config file
pub fn get_api_key(provider: &str) -> Option<String> {
    if let Some(key) = env_api_key(provider) {
        return Some(key);
    }

    if let Some(config_dir) = ConfigStore::default_config_dir() {
        let store = ConfigStore::new(config_dir);
        if let Ok(Some(key)) = store.get_api_key(provider) {
            return Some(key);
        }
    }

    None
}
