//! Single-agent execution
//!
//! A runner drives exactly one analyst persona through one streaming call:
//! compose prompts, accumulate deltas in arrival order, then extract the
//! structured verdict from the final text. Every state change is re-published
//! through the observer so callers can render progress live.

use std::sync::Arc;

use swarm_core::{AgentKind, AgentResult, Market};
use swarm_llm::{ChatMessage, CompletionBackend, CompletionOptions};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompts;

/// Observer invoked with every intermediate and final [`AgentResult`]
pub type ResultSink<'a> = dyn Fn(&AgentResult) + Send + Sync + 'a;

/// Executes one analyst persona against one ticker
pub struct AgentRunner {
    backend: Arc<dyn CompletionBackend>,
    kind: AgentKind,
}

impl AgentRunner {
    /// Create a runner for one agent kind
    pub fn new(backend: Arc<dyn CompletionBackend>, kind: AgentKind) -> Self {
        Self { backend, kind }
    }

    /// Run the agent to settlement
    ///
    /// The returned result is `Done` (meta extracted), `Error` (transport or
    /// HTTP failure), or still `Streaming` when `cancel` fired mid-run.
    /// Cancellation is not a failure: the run simply stops and the
    /// orchestrator excludes it from consensus.
    pub async fn run(
        &self,
        ticker: &str,
        market: Market,
        stock_context: &str,
        additional_context: Option<&str>,
        cancel: &CancellationToken,
        publish: &ResultSink<'_>,
    ) -> AgentResult {
        let mut result = AgentResult::streaming(self.kind);
        publish(&result);

        debug!(agent = %self.kind, ticker, "starting agent run");

        let messages = vec![
            ChatMessage::system(prompts::system_prompt(self.kind)),
            ChatMessage::user(prompts::build_user_prompt(
                ticker,
                market,
                stock_context,
                additional_context,
            )),
        ];
        let options = CompletionOptions::analysis();

        let outcome = {
            let mut sink = |chunk: &str| {
                result.text.push_str(chunk);
                publish(&result);
            };
            self.backend.stream_complete(&messages, &options, cancel, &mut sink).await
        };

        match outcome {
            Ok(_) => {
                if cancel.is_cancelled() {
                    debug!(agent = %self.kind, "run cancelled, discarding");
                    return result;
                }
                result.finish();
                info!(agent = %self.kind, signal = %result.meta.signal, confidence = result.meta.confidence, "agent run complete");
                publish(&result);
            }
            Err(err) => {
                if cancel.is_cancelled() {
                    debug!(agent = %self.kind, "run cancelled during failure, discarding");
                    return result;
                }
                warn!(agent = %self.kind, error = %err, "agent run failed");
                result.fail(err.to_string());
                publish(&result);
            }
        }

        result
    }
}
