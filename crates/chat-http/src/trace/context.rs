//! Per-request tracing state
//!
//! Each request gets one [`TraceContext`]. The client installs it as a
//! task-local for the duration of the request so that components reached
//! from inside the request future (the DNS resolver and the connector
//! layer) report into the same context without it being threaded through
//! `reqwest`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::body::RequestBody;

pub type SharedTraceContext = Arc<Mutex<TraceContext>>;

tokio::task_local! {
    static CURRENT: SharedTraceContext;
}

/// State tracers attach to a request
#[derive(Debug, Default)]
pub struct TraceContext {
    /// Correlation id, `request_id:<uuid>`
    pub identifier: Option<String>,
    pub start_time: Option<Instant>,
    pub dns_start_time: Option<Instant>,
    /// Set once the connector opened a fresh connection for this request
    pub new_connection: bool,
    /// Body the request was built from, for tracers that log it
    pub request_body: Option<RequestBody>,
}

impl TraceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(body: RequestBody) -> Self {
        Self {
            request_body: Some(body),
            ..Self::default()
        }
    }

    pub fn into_shared(self) -> SharedTraceContext {
        Arc::new(Mutex::new(self))
    }

    /// Assign a fresh correlation id unless one is already set; returns it
    pub fn assign_identifier(&mut self) -> &str {
        self.identifier
            .get_or_insert_with(|| format!("request_id:{}", uuid::Uuid::new_v4()))
    }

    /// Correlation id for log lines, `-` before one is assigned
    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or("-")
    }

    /// Record the request start unless already recorded
    pub fn mark_start(&mut self) {
        self.start_time.get_or_insert_with(Instant::now);
    }

    /// Time since [`mark_start`](Self::mark_start)
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn dns_elapsed(&self) -> Option<Duration> {
        self.dns_start_time.map(|t| t.elapsed())
    }
}

/// Milliseconds as a float, for latency log lines
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

/// The context of the request currently being driven on this task
pub fn current() -> Option<SharedTraceContext> {
    CURRENT.try_with(Arc::clone).ok()
}

/// Run `future` with `ctx` installed as the current context
pub async fn scope<F: Future>(ctx: SharedTraceContext, future: F) -> F::Output {
    CURRENT.scope(ctx, future).await
}
