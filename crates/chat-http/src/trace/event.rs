//! Hook points of a request's lifecycle and the data passed to each

use std::error::Error as StdError;
use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

use crate::client::ApiResponse;

/// A named hook a [`Tracer`](super::Tracer) can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    RequestStart,
    RequestEnd,
    RequestException,
    /// The request has to wait for a free connection slot
    ConnectionQueuedStart,
    ConnectionReuseconn,
    ConnectionCreateEnd,
    DnsCacheHit,
    DnsCacheMiss,
    DnsResolveHostStart,
    DnsResolveHostEnd,
}

impl TraceEvent {
    pub const ALL: [Self; 10] = [
        Self::RequestStart,
        Self::RequestEnd,
        Self::RequestException,
        Self::ConnectionQueuedStart,
        Self::ConnectionReuseconn,
        Self::ConnectionCreateEnd,
        Self::DnsCacheHit,
        Self::DnsCacheMiss,
        Self::DnsResolveHostStart,
        Self::DnsResolveHostEnd,
    ];

    /// Hook name, as it appears in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestStart => "on_request_start",
            Self::RequestEnd => "on_request_end",
            Self::RequestException => "on_request_exception",
            Self::ConnectionQueuedStart => "on_connection_queued_start",
            Self::ConnectionReuseconn => "on_connection_reuseconn",
            Self::ConnectionCreateEnd => "on_connection_create_end",
            Self::DnsCacheHit => "on_dns_cache_hit",
            Self::DnsCacheMiss => "on_dns_cache_miss",
            Self::DnsResolveHostStart => "on_dns_resolvehost_start",
            Self::DnsResolveHostEnd => "on_dns_resolvehost_end",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event together with its parameters
#[derive(Debug, Clone, Copy)]
pub enum TraceSignal<'a> {
    RequestStart {
        method: &'a Method,
        url: &'a Url,
        headers: &'a HeaderMap,
    },
    RequestEnd {
        method: &'a Method,
        url: &'a Url,
        response: &'a ApiResponse,
    },
    RequestException {
        method: &'a Method,
        url: &'a Url,
        error: &'a (dyn StdError + Send + Sync + 'static),
    },
    ConnectionQueuedStart,
    ConnectionReuseconn,
    ConnectionCreateEnd,
    DnsCacheHit {
        host: &'a str,
    },
    DnsCacheMiss {
        host: &'a str,
    },
    DnsResolveHostStart {
        host: &'a str,
    },
    DnsResolveHostEnd {
        host: &'a str,
    },
}

impl TraceSignal<'_> {
    pub fn event(&self) -> TraceEvent {
        match self {
            Self::RequestStart { .. } => TraceEvent::RequestStart,
            Self::RequestEnd { .. } => TraceEvent::RequestEnd,
            Self::RequestException { .. } => TraceEvent::RequestException,
            Self::ConnectionQueuedStart => TraceEvent::ConnectionQueuedStart,
            Self::ConnectionReuseconn => TraceEvent::ConnectionReuseconn,
            Self::ConnectionCreateEnd => TraceEvent::ConnectionCreateEnd,
            Self::DnsCacheHit { .. } => TraceEvent::DnsCacheHit,
            Self::DnsCacheMiss { .. } => TraceEvent::DnsCacheMiss,
            Self::DnsResolveHostStart { .. } => TraceEvent::DnsResolveHostStart,
            Self::DnsResolveHostEnd { .. } => TraceEvent::DnsResolveHostEnd,
        }
    }
}
