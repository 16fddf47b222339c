// Humanization Session
// One caller's stream of submissions: serialised, last-request-wins,
// with the usage ledger threaded through by value.

use crate::models::{DetectionScore, HumanizationResult, HumanizeError, UsageLedger};
use crate::services::detection_simulator::simulate_detection;
use crate::services::providers::ChatCapability;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::client::Humanizer;

#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Completed {
        result: HumanizationResult,
        detection: DetectionScore,
        ledger: UsageLedger,
        backend_connected: bool,
    },
    /// A newer submission started before this one finished; its result was dropped.
    Superseded { ledger: UsageLedger },
}

impl SessionOutcome {
    pub fn ledger(&self) -> UsageLedger {
        match self {
            Self::Completed { ledger, .. } | Self::Superseded { ledger } => *ledger,
        }
    }
}

pub struct Session {
    humanizer: Arc<Humanizer>,
    chat: Arc<dyn ChatCapability>,
    probe_health: bool,
    health_timeout: Duration,
    generation: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
    in_flight: tokio::sync::Mutex<()>,
    connected: AtomicBool,
}

impl Session {
    pub fn new(humanizer: Arc<Humanizer>, chat: Arc<dyn ChatCapability>) -> Self {
        Self {
            humanizer,
            chat,
            probe_health: false,
            health_timeout: Duration::from_secs(10),
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
            connected: AtomicBool::new(true),
        }
    }

    /// Round-trip the provider before each submission and record the outcome.
    /// A failed probe sends that submission straight to the rules.
    pub fn with_health_probe(mut self, timeout: Duration) -> Self {
        self.probe_health = true;
        self.health_timeout = timeout;
        self
    }

    /// Result of the most recent health probe. `true` until one has run.
    pub fn backend_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Probe the provider with a bounded timeout.
    pub async fn check_health(&self) -> bool {
        let healthy = tokio::time::timeout(self.health_timeout, self.chat.check_health())
            .await
            .unwrap_or(false);
        self.connected.store(healthy, Ordering::SeqCst);
        debug!(healthy, "session.health");
        healthy
    }

    /// Submit one piece of text.
    ///
    /// Validation errors are returned before anything runs. A submission that
    /// is overtaken by a newer one resolves to [`SessionOutcome::Superseded`]
    /// with the ledger unchanged.
    pub async fn submit(
        &self,
        ledger: UsageLedger,
        text: &str,
        mode: &str,
        language: &str,
    ) -> Result<SessionOutcome, HumanizeError> {
        let request = self.humanizer.request(text, mode, language)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let run = async {
            let _guard = self.in_flight.lock().await;
            if self.probe_health && !self.check_health().await {
                info!(generation, "session.backend_down");
                return self.humanizer.humanize_offline(&request).await;
            }
            self.humanizer.humanize(&request).await
        };

        let result = tokio::select! {
            result = run => result,
            _ = token.cancelled() => {
                info!(generation, "session.cancelled");
                return Ok(SessionOutcome::Superseded { ledger });
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            info!(generation, "session.superseded");
            return Ok(SessionOutcome::Superseded { ledger });
        }

        let detection = simulate_detection(&result.humanized_text);
        let ledger = ledger.record(result.word_count);

        Ok(SessionOutcome::Completed {
            result,
            detection,
            ledger,
            backend_connected: self.backend_connected(),
        })
    }
}
