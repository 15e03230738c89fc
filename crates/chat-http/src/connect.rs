//! Connector layer that reports freshly opened connections to tracers
//!
//! Installed through `reqwest::ClientBuilder::connector_layer`. `reqwest`
//! only calls the connector when its pool has no idle connection for the
//! host, so every completed call is a new connection for the request that
//! triggered it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::trace::{context, TraceConfig, TraceSignal};

/// Wraps the connector in a [`ConnectionTrace`]
#[derive(Debug, Clone)]
pub struct ConnectionTraceLayer {
    tracing: Arc<TraceConfig>,
}

impl ConnectionTraceLayer {
    pub fn new(tracing: Arc<TraceConfig>) -> Self {
        Self { tracing }
    }
}

impl<S> Layer<S> for ConnectionTraceLayer {
    type Service = ConnectionTrace<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ConnectionTrace {
            inner,
            tracing: Arc::clone(&self.tracing),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionTrace<S> {
    inner: S,
    tracing: Arc<TraceConfig>,
}

impl<S, Req> Service<Req> for ConnectionTrace<S>
where
    S: Service<Req> + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: 'static,
    Req: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // same constraint as the resolver: read the task-local before boxing
        let ctx = context::current();
        let hooks = Arc::clone(&self.tracing);
        let connecting = self.inner.call(req);

        Box::pin(async move {
            let conn = connecting.await?;
            if let Some(ctx) = ctx {
                ctx.lock().await.new_connection = true;
                hooks
                    .dispatch(&ctx, TraceSignal::ConnectionCreateEnd)
                    .await;
            } else {
                tracing::trace!("Connection opened outside a request context");
            }
            Ok(conn)
        })
    }
}
