//! Caching DNS resolver that reports cache and lookup events to tracers
//!
//! Plugged into `reqwest` as its resolver. Lookups pick up the trace context
//! of the request that triggered them, so DNS events carry the same
//! correlation id as the request's own log lines.

use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tokio::time::Instant;

use crate::trace::{context, SharedTraceContext, TraceConfig, TraceContext, TraceSignal};

#[derive(Debug, Clone)]
struct CachedAddrs {
    addrs: Vec<SocketAddr>,
    expires_at: Instant,
}

#[derive(Debug)]
struct Inner {
    cache: DashMap<String, CachedAddrs>,
    ttl: Duration,
    tracing: Arc<TraceConfig>,
}

/// Host lookups cached for a fixed TTL; a zero TTL disables the cache
#[derive(Debug, Clone)]
pub struct TracingResolver {
    inner: Arc<Inner>,
}

impl TracingResolver {
    pub fn new(ttl: Duration, tracing: Arc<TraceConfig>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache: DashMap::new(),
                ttl,
                tracing,
            }),
        }
    }

    /// Resolve `host`, reporting into `ctx` or a detached context when `None`
    ///
    /// Returned addresses carry port 0; the caller supplies the port.
    pub async fn lookup(
        &self,
        host: &str,
        ctx: Option<SharedTraceContext>,
    ) -> io::Result<Vec<SocketAddr>> {
        let ctx = ctx.unwrap_or_else(|| TraceContext::new().into_shared());
        let hooks = &self.inner.tracing;

        if let Some(addrs) = self.cached(host) {
            hooks.dispatch(&ctx, TraceSignal::DnsCacheHit { host }).await;
            return Ok(addrs);
        }

        hooks.dispatch(&ctx, TraceSignal::DnsCacheMiss { host }).await;
        hooks
            .dispatch(&ctx, TraceSignal::DnsResolveHostStart { host })
            .await;
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0)).await?.collect();
        hooks
            .dispatch(&ctx, TraceSignal::DnsResolveHostEnd { host })
            .await;

        tracing::trace!(host = %host, count = addrs.len(), "Resolved host");

        if !self.inner.ttl.is_zero() {
            let now = Instant::now();
            // sweep expired hosts on every insert
            self.inner.cache.retain(|_, entry| entry.expires_at > now);
            self.inner.cache.insert(
                host.to_string(),
                CachedAddrs {
                    addrs: addrs.clone(),
                    expires_at: now + self.inner.ttl,
                },
            );
        }
        Ok(addrs)
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.inner.cache.clear();
    }

    pub fn cached_hosts(&self) -> usize {
        self.inner.cache.len()
    }

    fn cached(&self, host: &str) -> Option<Vec<SocketAddr>> {
        let now = Instant::now();
        self.inner.cache.remove_if(host, |_, entry| entry.expires_at <= now);
        self.inner.cache.get(host).map(|entry| entry.addrs.clone())
    }
}

impl Resolve for TracingResolver {
    fn resolve(&self, name: Name) -> Resolving {
        // the task-local is only visible here, not inside the boxed future
        let ctx = context::current();
        let resolver = self.clone();
        Box::pin(async move {
            let addrs: Addrs = Box::new(resolver.lookup(name.as_str(), ctx).await?.into_iter());
            Ok::<_, Box<dyn StdError + Send + Sync>>(addrs)
        })
    }
}
