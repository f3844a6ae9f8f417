//! Chain execution engine.
//!
//! Runs a [`Chain`] one step at a time: resolve placeholders against the
//! previous response, send the request, decode the body, record the outcome
//! on the step. The first failure halts the run; later steps are left
//! untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde_json::{Map, Value};

use crate::chain::Chain;
use crate::context::Context;
use crate::error::{ChainError, StepError};
use crate::step::{RequestKind, Step, StepOutcome};

/// Endpoint for comment lookups. The effective URL is always this plus a
/// `postId` query parameter, regardless of any prior response.
pub const COMMENTS_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/comments";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every step succeeded.
    Completed,
    /// A step failed and the run stopped there.
    Halted {
        /// Zero-based index of the failing step.
        step: usize,
        /// Display form of the failure, mirroring the step's own record.
        error: String,
    },
}

impl RunStatus {
    /// Whether the run reached the end of the chain.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// Summary of a finished run.
///
/// Per-step results and failures live on the chain's steps; the report only
/// carries run-level facts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// How the run ended.
    pub status: RunStatus,

    /// Number of steps that were attempted, including a failing one.
    pub attempted: usize,

    /// Total run time in milliseconds.
    pub total_ms: f64,
}

/// Executes chains sequentially over a shared HTTP client.
///
/// One executor runs one chain at a time. Triggering a run while another is
/// in flight returns [`ChainError::Busy`] and leaves the running chain
/// undisturbed.
#[derive(Debug)]
pub struct Executor {
    client: reqwest::Client,
    running: AtomicBool,
}

impl Executor {
    /// Create an executor with a default HTTP client.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create an executor over an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run the chain, writing each step's outcome onto the step itself.
    ///
    /// Steps run strictly in order. A step's failure is recorded on that
    /// step and ends the run; steps after it keep whatever outcome they had
    /// from earlier runs. An empty chain completes immediately.
    pub async fn run(&self, chain: &mut Chain) -> Result<RunReport, ChainError> {
        self.run_with_progress(chain, |_, _| {}).await
    }

    /// Run the chain, invoking `progress` after each step's outcome is
    /// recorded.
    ///
    /// The callback receives the step's index and the step itself, outcome
    /// already written, so an editor can repaint incrementally instead of
    /// waiting for the report.
    pub async fn run_with_progress<F>(
        &self,
        chain: &mut Chain,
        mut progress: F,
    ) -> Result<RunReport, ChainError>
    where
        F: FnMut(usize, &Step),
    {
        if chain.is_empty() {
            return Ok(RunReport {
                status: RunStatus::Completed,
                attempted: 0,
                total_ms: 0.0,
            });
        }

        if self.running.swap(true, Ordering::Relaxed) {
            return Err(ChainError::Busy);
        }

        tracing::info!(chain = %chain.name, steps = chain.len(), "Starting chain run");
        let start = Instant::now();

        let mut ctx = Context::new();
        let mut status = RunStatus::Completed;
        let mut attempted = 0;

        for (index, step) in chain.steps.iter_mut().enumerate() {
            tracing::debug!(index, kind = step.request.kind_str(), "Executing step");
            attempted += 1;

            match self.attempt(step, &ctx).await {
                Ok(value) => {
                    ctx.record(value.clone());
                    step.record(StepOutcome::Success(value));
                    progress(index, step);
                }
                Err(err) => {
                    tracing::warn!(index, error = %err, "Step failed, halting chain");
                    status = RunStatus::Halted {
                        step: index,
                        error: err.to_string(),
                    };
                    step.record(StepOutcome::Failure(err));
                    progress(index, step);
                    break;
                }
            }
        }

        let total_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            chain = %chain.name,
            attempted,
            completed = status.is_completed(),
            total_ms,
            "Chain run finished"
        );

        self.running.store(false, Ordering::Relaxed);

        Ok(RunReport {
            status,
            attempted,
            total_ms,
        })
    }

    /// Send one step's request and decode the response.
    async fn attempt(&self, step: &Step, ctx: &Context) -> Result<Value, StepError> {
        let url = resolved_url(step, ctx);
        let body = resolved_body(step, ctx);

        let request = match &step.request {
            RequestKind::Post { .. } => self.client.post(&url),
            _ => self.client.get(&url),
        };
        let request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        let request = match &body {
            Some(map) => request.json(map),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| StepError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StepError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StepError::Decode(e.to_string()))
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// The URL a step will actually request.
///
/// Comments lookups ignore the substitution context entirely; their URL is a
/// function of `related_id` alone. Other kinds substitute URL tokens only
/// when the step opts in and a previous response exists.
fn resolved_url(step: &Step, ctx: &Context) -> String {
    match &step.request {
        RequestKind::GetComments { related_id } => {
            format!("{}?postId={}", COMMENTS_ENDPOINT, related_id)
        }
        RequestKind::Get { url } | RequestKind::Post { url, .. } => {
            if step.use_last_response && ctx.last().is_some() {
                ctx.resolve_url(url)
            } else {
                url.clone()
            }
        }
    }
}

/// The body a step will actually send, placeholders resolved.
fn resolved_body(step: &Step, ctx: &Context) -> Option<Map<String, Value>> {
    match &step.request {
        RequestKind::Post { body: Some(map), .. } => {
            if step.use_last_response && ctx.last().is_some() {
                Some(ctx.resolve_body(map))
            } else {
                Some(map.clone())
            }
        }
        _ => None,
    }
}

/// Run a chain on a fresh executor.
pub async fn execute(chain: &mut Chain) -> Result<RunReport, ChainError> {
    Executor::new().run(chain).await
}
