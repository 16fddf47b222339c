// Text Rewriters
// Remote (LLM) and rule-based rewriting behind one trait, plus the decorator
// that tries the remote first and falls back to the rules on any failure.

use crate::models::{HumanizationRequest, RewriteSource};
use crate::services::providers::{ChatCapability, ProviderError};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::prompt_builder::build_prompt;
use super::transform_table::apply_rules;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("chat provider is not available")]
    Unavailable,
    #[error("chat provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("chat provider returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub source: RewriteSource,
}

#[async_trait]
pub trait TextRewriter: Send + Sync {
    async fn rewrite(&self, request: &HumanizationRequest) -> Result<Rewrite, RewriteError>;
}

/// Rewrites through the chat provider. One attempt, bounded by `timeout`.
///
/// The reply is trimmed. A reply that is empty after trimming counts as a
/// failure ([`RewriteError::EmptyResponse`]) rather than an empty result, so
/// a fallback decorator hands the request to the rules instead.
pub struct RemoteRewriter {
    chat: Arc<dyn ChatCapability>,
    timeout: Duration,
}

impl RemoteRewriter {
    pub fn new(chat: Arc<dyn ChatCapability>, timeout: Duration) -> Self {
        Self { chat, timeout }
    }
}

#[async_trait]
impl TextRewriter for RemoteRewriter {
    async fn rewrite(&self, request: &HumanizationRequest) -> Result<Rewrite, RewriteError> {
        if !self.chat.is_available() {
            return Err(RewriteError::Unavailable);
        }

        let prompt = build_prompt(request.text(), request.mode(), request.language());
        let reply = tokio::time::timeout(self.timeout, self.chat.chat(&prompt))
            .await
            .map_err(|_| RewriteError::Timeout(self.timeout))??;

        let text = reply.trim();
        if text.is_empty() {
            return Err(RewriteError::EmptyResponse);
        }

        Ok(Rewrite {
            text: text.to_string(),
            source: RewriteSource::Remote,
        })
    }
}

/// Bounds of the simulated processing delay, sampled uniformly from [min, max).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms.max(min_ms)),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if max_ms <= min_ms {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(min_ms..max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::from_millis(2000, 5000)
    }
}

/// Applies the transform table, then waits out a simulated processing delay.
#[derive(Debug, Copy, Clone, Default)]
pub struct RuleBasedRewriter {
    delay: DelayRange,
}

impl RuleBasedRewriter {
    pub fn new(delay: DelayRange) -> Self {
        Self { delay }
    }

    /// Infallible form of [`TextRewriter::rewrite`]. The delay is always awaited.
    pub async fn run(&self, request: &HumanizationRequest) -> Rewrite {
        let text = apply_rules(request.text(), request.mode());
        let delay = self.delay.sample(&mut rand::thread_rng());
        debug!(delay_ms = delay.as_millis() as u64, mode = request.mode(), "rules.applied");
        tokio::time::sleep(delay).await;

        Rewrite {
            text,
            source: RewriteSource::RuleBased,
        }
    }
}

#[async_trait]
impl TextRewriter for RuleBasedRewriter {
    async fn rewrite(&self, request: &HumanizationRequest) -> Result<Rewrite, RewriteError> {
        Ok(self.run(request).await)
    }
}

/// Tries `primary`; any error hands the request to `fallback`.
pub struct FallbackRewriter {
    primary: Box<dyn TextRewriter>,
    fallback: Box<dyn TextRewriter>,
}

impl FallbackRewriter {
    pub fn new(primary: Box<dyn TextRewriter>, fallback: Box<dyn TextRewriter>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TextRewriter for FallbackRewriter {
    async fn rewrite(&self, request: &HumanizationRequest) -> Result<Rewrite, RewriteError> {
        match self.primary.rewrite(request).await {
            Ok(rewrite) => Ok(rewrite),
            Err(e) => {
                warn!(error = %e, mode = request.mode(), "rewrite.fallback");
                self.fallback.rewrite(request).await
            }
        }
    }
}
