// Humanization Client
// Runs one request through the rewriter chain and packages the result.

use crate::models::{HumanizationRequest, HumanizationResult, HumanizeError, RewriteSource};
use crate::services::config_store::HumanizerConfig;
use crate::services::providers::ChatCapability;
use crate::services::text_processor::{count_words, preview};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use super::rewriter::{DelayRange, FallbackRewriter, RemoteRewriter, RuleBasedRewriter, TextRewriter};

/// Synthetic confidence ranges, [low, 100).
const REMOTE_CONFIDENCE_MIN: f64 = 90.0;
const RULE_CONFIDENCE_MIN: f64 = 85.0;
const CONFIDENCE_MAX: f64 = 100.0;

pub fn confidence_for<R: Rng + ?Sized>(source: RewriteSource, rng: &mut R) -> f64 {
    let min = match source {
        RewriteSource::Remote => REMOTE_CONFIDENCE_MIN,
        RewriteSource::RuleBased => RULE_CONFIDENCE_MIN,
    };
    rng.gen_range(min..CONFIDENCE_MAX)
}

pub struct Humanizer {
    rewriter: Box<dyn TextRewriter>,
    offline: RuleBasedRewriter,
    max_words: usize,
}

impl Humanizer {
    /// Remote rewriting over `chat`, falling back to the transform table.
    pub fn new(chat: Arc<dyn ChatCapability>, settings: &HumanizerConfig) -> Self {
        let remote = RemoteRewriter::new(chat, Duration::from_secs(settings.request_timeout_secs));
        let rules = RuleBasedRewriter::new(DelayRange::from_millis(
            settings.fallback_delay_min_ms,
            settings.fallback_delay_max_ms,
        ));
        Self {
            rewriter: Box::new(FallbackRewriter::new(Box::new(remote), Box::new(rules))),
            offline: rules,
            max_words: settings.max_words,
        }
    }

    /// Custom rewriter chain; offline runs use the default delay range.
    pub fn with_rewriter(rewriter: Box<dyn TextRewriter>, max_words: usize) -> Self {
        Self {
            rewriter,
            offline: RuleBasedRewriter::default(),
            max_words,
        }
    }

    /// Validate raw input into a request.
    pub fn request(
        &self,
        text: &str,
        mode: &str,
        language: &str,
    ) -> Result<HumanizationRequest, HumanizeError> {
        HumanizationRequest::new(text, mode, language, self.max_words)
    }

    /// Always produces a result; rewrite failures only change which path ran.
    pub async fn humanize(&self, request: &HumanizationRequest) -> HumanizationResult {
        self.run(request, true).await
    }

    /// Skip the backend and go straight to the rules, simulated delay included.
    pub async fn humanize_offline(&self, request: &HumanizationRequest) -> HumanizationResult {
        self.run(request, false).await
    }

    async fn run(&self, request: &HumanizationRequest, use_backend: bool) -> HumanizationResult {
        let started = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();

        info!(
            request_id = %request_id,
            mode = request.mode(),
            language = request.language(),
            use_backend,
            preview = %preview(request.text(), 60),
            "humanize.start"
        );

        let rewrite = if use_backend {
            match self.rewriter.rewrite(request).await {
                Ok(rewrite) => rewrite,
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, "humanize.rewriter_failed");
                    self.offline.run(request).await
                }
            }
        } else {
            self.offline.run(request).await
        };

        let confidence_score = confidence_for(rewrite.source, &mut rand::thread_rng());
        let processing_time_seconds = started.elapsed().as_secs_f64();

        info!(
            request_id = %request_id,
            source = ?rewrite.source,
            elapsed_ms = (processing_time_seconds * 1000.0) as u64,
            "humanize.done"
        );

        HumanizationResult {
            request_id,
            original_text: request.text().to_string(),
            humanized_text: rewrite.text,
            mode: request.mode().to_string(),
            language: request.language().to_string(),
            processing_time_seconds,
            word_count: count_words(request.text()),
            confidence_score,
            source: rewrite.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanization::rewriter::{Rewrite, RewriteError};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysFails;

    #[async_trait]
    impl TextRewriter for AlwaysFails {
        async fn rewrite(&self, _request: &HumanizationRequest) -> Result<Rewrite, RewriteError> {
            Err(RewriteError::Unavailable)
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl TextRewriter for Counting {
        async fn rewrite(&self, _request: &HumanizationRequest) -> Result<Rewrite, RewriteError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Rewrite {
                text: "remote".to_string(),
                source: RewriteSource::Remote,
            })
        }
    }

    #[test]
    fn test_confidence_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let remote = confidence_for(RewriteSource::Remote, &mut rng);
            assert!((90.0..100.0).contains(&remote));
            let rules = confidence_for(RewriteSource::RuleBased, &mut rng);
            assert!((85.0..100.0).contains(&rules));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_chain_still_yields_rule_result() {
        let humanizer = Humanizer::with_rewriter(Box::new(AlwaysFails), 300);
        let request = humanizer.request("use help", "academic", "en").unwrap();
        let result = humanizer.humanize(&request).await;
        assert_eq!(result.humanized_text, "utilize facilitate");
        assert_eq!(result.source, RewriteSource::RuleBased);
        assert_eq!(result.word_count, 2);
        assert!(!result.request_id.is_empty());
        // the last-resort rules still wait out the simulated delay
        assert!(result.processing_time_seconds >= 2.0);
        assert!(result.processing_time_seconds < 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_skips_the_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let humanizer = Humanizer::with_rewriter(Box::new(Counting(calls.clone())), 300);
        let request = humanizer.request("use help", "academic", "en").unwrap();

        let offline = humanizer.humanize_offline(&request).await;
        assert_eq!(offline.source, RewriteSource::RuleBased);
        assert_eq!(offline.humanized_text, "utilize facilitate");
        assert!(offline.processing_time_seconds >= 2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let online = humanizer.humanize(&request).await;
        assert_eq!(online.source, RewriteSource::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_uses_configured_limit() {
        let humanizer = Humanizer::with_rewriter(Box::new(AlwaysFails), 2);
        assert!(matches!(
            humanizer.request("one two three", "standard", "en"),
            Err(HumanizeError::TooManyWords { count: 3, limit: 2 })
        ));
        assert!(humanizer.request("one two", "standard", "en").is_ok());
    }
}
