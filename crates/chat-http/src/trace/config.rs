//! Registry mapping hook points to tracers

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::context::SharedTraceContext;
use super::event::{TraceEvent, TraceSignal};
use super::tracer::Tracer;

/// Tracers grouped by the events they observe
///
/// Built once and shared by every request of a client.
#[derive(Clone, Default)]
pub struct TraceConfig {
    handlers: HashMap<TraceEvent, Vec<Arc<dyn Tracer>>>,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tracers<I>(tracers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tracer>>,
    {
        let mut config = Self::new();
        for tracer in tracers {
            config.register(tracer);
        }
        config
    }

    /// Subscribe `tracer` to every event it lists
    pub fn register(&mut self, tracer: Arc<dyn Tracer>) {
        for event in tracer.events() {
            self.handlers
                .entry(*event)
                .or_default()
                .push(Arc::clone(&tracer));
        }
    }

    #[must_use]
    pub fn with(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.register(tracer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }

    /// Tracers registered for `event`, in registration order
    pub fn handlers(&self, event: TraceEvent) -> &[Arc<dyn Tracer>] {
        self.handlers.get(&event).map_or(&[], Vec::as_slice)
    }

    pub fn wants(&self, event: TraceEvent) -> bool {
        !self.handlers(event).is_empty()
    }

    /// Run every tracer registered for the signal's event, in order
    ///
    /// A tracer that errors or panics is logged and skipped; the request
    /// carries on regardless.
    pub async fn dispatch(&self, ctx: &SharedTraceContext, signal: TraceSignal<'_>) {
        let event = signal.event();
        let handlers = self.handlers(event);
        if handlers.is_empty() {
            return;
        }

        let mut guard = ctx.lock().await;
        for tracer in handlers {
            let outcome = AssertUnwindSafe(tracer.on_event(&mut *guard, &signal))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        tracer = tracer.name(),
                        event = %event,
                        error = %e,
                        "Tracer failed"
                    );
                }
                Err(_) => {
                    tracing::warn!(tracer = tracer.name(), event = %event, "Tracer panicked");
                }
            }
        }
    }
}

impl fmt::Debug for TraceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in TraceEvent::ALL {
            let names: Vec<_> = self.handlers(event).iter().map(|t| t.name()).collect();
            if !names.is_empty() {
                map.entry(&event, &names);
            }
        }
        map.finish()
    }
}
