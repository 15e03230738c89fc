//! Tracer trait (port) - observers of the request lifecycle

use async_trait::async_trait;
use thiserror::Error;

use super::context::TraceContext;
use super::event::{TraceEvent, TraceSignal};

/// Failure inside a tracer; logged by the dispatcher, never returned to the caller
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace context is missing {0}")]
    MissingContext(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Observer invoked at the hook points it registers for
///
/// Handlers run inline on the request path, so they should be quick.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Name used when reporting tracer failures
    fn name(&self) -> &'static str;

    /// Events this tracer wants to see
    fn events(&self) -> &'static [TraceEvent];

    async fn on_event(
        &self,
        ctx: &mut TraceContext,
        signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError>;
}
