//! Swarm orchestration
//!
//! [`AgentSwarm`] owns the shared state of one analysis board: the four
//! per-agent result slots, the latest consensus, and the running flag. One
//! run creates one [`CancellationToken`] borrowed by all four agent calls;
//! the consensus step strictly happens after every runner has settled and is
//! skipped entirely when the token fired.
//!
//! Locking discipline: each slot is written only by its own runner (through
//! `publish`), the aggregate fields only after the join barrier. Locks are
//! never held across await points.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use swarm_core::{AgentKind, AgentResult, Market, SwarmConsensus};
use swarm_llm::CompletionBackend;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::consensus::synthesize;
use crate::error::{Result, SwarmError};
use crate::runner::AgentRunner;

const LOCK_MSG: &str = "swarm state lock poisoned";
const EVENT_CAPACITY: usize = 256;

/// One swarm run's input: the ticker plus pre-formatted context blocks
///
/// The fundamentals block is routed to the fundamental agent only and the
/// indicator block to the technical agent only; macro and sentiment see just
/// the shared stock context.
#[derive(Debug, Clone)]
pub struct SwarmRequest {
    pub ticker: String,
    pub market: Market,
    pub stock_context: String,
    pub fundamentals_context: Option<String>,
    pub indicators_context: Option<String>,
}

impl SwarmRequest {
    /// Create a request with only the shared stock context
    pub fn new(ticker: impl Into<String>, market: Market, stock_context: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            market,
            stock_context: stock_context.into(),
            fundamentals_context: None,
            indicators_context: None,
        }
    }

    /// Attach the fundamentals context block
    pub fn with_fundamentals(mut self, context: impl Into<String>) -> Self {
        self.fundamentals_context = Some(context.into());
        self
    }

    /// Attach the technical indicator context block
    pub fn with_indicators(mut self, context: impl Into<String>) -> Self {
        self.indicators_context = Some(context.into());
        self
    }
}

/// Observable snapshot of the swarm's state
#[derive(Debug, Clone, Default)]
pub struct SwarmState {
    /// Per-agent result slots; absent until that agent's run starts
    pub results: BTreeMap<AgentKind, AgentResult>,
    /// Latest consensus; `None` until a run completes uncancelled
    pub consensus: Option<SwarmConsensus>,
    /// Whether a run is in flight
    pub running: bool,
}

/// Progress notification published while a swarm runs
#[derive(Debug, Clone)]
pub enum SwarmEvent {
    /// An agent's result changed (new chunk, done, or error)
    AgentUpdate(AgentResult),
    /// The run settled and a consensus was synthesized
    Completed(SwarmConsensus),
    /// The run was cancelled; no consensus was synthesized
    Cancelled,
}

/// Runs the four analyst agents concurrently and aggregates their verdicts
pub struct AgentSwarm {
    backend: Arc<dyn CompletionBackend>,
    state: RwLock<SwarmState>,
    cancel: Mutex<Option<CancellationToken>>,
    events: broadcast::Sender<SwarmEvent>,
}

impl AgentSwarm {
    /// Create a swarm over the given completion backend
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { backend, state: RwLock::new(SwarmState::default()), cancel: Mutex::new(None), events }
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<SwarmEvent> {
        self.events.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> SwarmState {
        self.state.read().expect(LOCK_MSG).clone()
    }

    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        self.state.read().expect(LOCK_MSG).running
    }

    /// Latest consensus, if any
    pub fn consensus(&self) -> Option<SwarmConsensus> {
        self.state.read().expect(LOCK_MSG).consensus.clone()
    }

    /// Run all four agents against one ticker and synthesize a consensus
    ///
    /// Returns `Ok(None)` when the run was cancelled. Individual agent
    /// failures do not abort their siblings; the consensus covers whatever
    /// reached `Done`.
    pub async fn run_swarm(&self, request: SwarmRequest) -> Result<Option<SwarmConsensus>> {
        let cancel = {
            let mut state = self.state.write().expect(LOCK_MSG);
            if state.running {
                return Err(SwarmError::AlreadyRunning);
            }
            state.running = true;
            state.results.clear();
            state.consensus = None;

            let token = CancellationToken::new();
            *self.cancel.lock().expect(LOCK_MSG) = Some(token.clone());
            token
        };

        info!(ticker = %request.ticker, market = %request.market, "starting swarm run");

        let runs = AgentKind::ALL.map(|kind| {
            let additional = match kind {
                AgentKind::Fundamental => request
                    .fundamentals_context
                    .as_deref()
                    .map(|c| format!("### Financial data\n{c}")),
                AgentKind::Technical => request
                    .indicators_context
                    .as_deref()
                    .map(|c| format!("### Technical indicators\n{c}")),
                AgentKind::Macro | AgentKind::Sentiment => None,
            };
            let runner = AgentRunner::new(Arc::clone(&self.backend), kind);
            let cancel = cancel.clone();
            let request = &request;

            async move {
                let publish = |result: &AgentResult| self.publish(result);
                runner
                    .run(
                        &request.ticker,
                        request.market,
                        &request.stock_context,
                        additional.as_deref(),
                        &cancel,
                        &publish,
                    )
                    .await
            }
        });

        // join barrier: every runner settles (done, error, or cancelled)
        futures::future::join_all(runs).await;

        if cancel.is_cancelled() {
            // `running` was already cleared by cancel_swarm
            self.cancel.lock().expect(LOCK_MSG).take();
            info!(ticker = %request.ticker, "swarm run cancelled, no consensus");
            let _ = self.events.send(SwarmEvent::Cancelled);
            return Ok(None);
        }

        let consensus = {
            let mut state = self.state.write().expect(LOCK_MSG);
            let results: Vec<AgentResult> = state.results.values().cloned().collect();
            let consensus = synthesize(&results, &request.ticker, request.market);
            state.consensus = Some(consensus.clone());
            state.running = false;
            consensus
        };
        self.cancel.lock().expect(LOCK_MSG).take();

        info!(
            ticker = %request.ticker,
            signal = %consensus.overall_signal,
            confidence = consensus.avg_confidence,
            "swarm run complete"
        );
        let _ = self.events.send(SwarmEvent::Completed(consensus.clone()));
        Ok(Some(consensus))
    }

    /// Cancel the in-flight run, if any
    ///
    /// Aborts all agent transports promptly and clears `running` without
    /// waiting for in-flight cleanup. Idempotent: cancelling twice or after
    /// natural completion is a no-op.
    pub fn cancel_swarm(&self) {
        if let Some(token) = self.cancel.lock().expect(LOCK_MSG).as_ref() {
            debug!("cancelling swarm run");
            token.cancel();
        }
        self.state.write().expect(LOCK_MSG).running = false;
    }

    /// Reset the result slots and consensus
    ///
    /// Does not touch an in-flight run; cancel first if one is active.
    pub fn clear_results(&self) {
        let mut state = self.state.write().expect(LOCK_MSG);
        state.results.clear();
        state.consensus = None;
    }

    fn publish(&self, result: &AgentResult) {
        {
            let mut state = self.state.write().expect(LOCK_MSG);
            state.results.insert(result.kind, result.clone());
        }
        let _ = self.events.send(SwarmEvent::AgentUpdate(result.clone()));
    }
}
