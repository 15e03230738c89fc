//! Verbose request logging

use std::error::Error as StdError;
use std::fmt::Write as _;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

use super::context::{millis, TraceContext};
use super::event::{TraceEvent, TraceSignal};
use super::tracer::{TraceError, Tracer};
use crate::client::ApiResponse;
use crate::headers::{self, CONTENT_TYPE};

/// Logs every hook point at DEBUG: full request and response headers and
/// bodies, connection pool waits and DNS cache activity.
///
/// Request headers include `Authorization`, so these logs contain the bot
/// token. Scrub them before sharing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugTracer;

#[async_trait]
impl Tracer for DebugTracer {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn events(&self) -> &'static [TraceEvent] {
        &TraceEvent::ALL
    }

    async fn on_event(
        &self,
        ctx: &mut TraceContext,
        signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError> {
        let line = match *signal {
            TraceSignal::RequestStart {
                method,
                url,
                headers,
            } => {
                ctx.assign_identifier();
                ctx.mark_start();
                format_request(method, url, headers, ctx)
            }
            TraceSignal::RequestEnd { response, .. } => {
                let latency = ctx
                    .elapsed()
                    .ok_or(TraceError::MissingContext("start_time"))?;
                format_response(response, millis(latency), ctx.identifier())
            }
            TraceSignal::RequestException { error, .. } => {
                format_exception(error, ctx.identifier())
            }
            TraceSignal::ConnectionQueuedStart => {
                format!("is waiting for a connection [{}]", ctx.identifier())
            }
            TraceSignal::ConnectionReuseconn => {
                format!("has acquired an existing connection [{}]", ctx.identifier())
            }
            TraceSignal::ConnectionCreateEnd => {
                format!("has created a new connection [{}]", ctx.identifier())
            }
            TraceSignal::DnsCacheHit { host } => format!(
                "has retrieved the IP of {host} from the DNS cache [{}]",
                ctx.identifier()
            ),
            TraceSignal::DnsCacheMiss { host } => format!(
                "will perform DNS lookup of new host {host} [{}]",
                ctx.identifier()
            ),
            TraceSignal::DnsResolveHostStart { .. } => {
                ctx.dns_start_time = Some(tokio::time::Instant::now());
                return Ok(());
            }
            TraceSignal::DnsResolveHostEnd { host } => {
                let latency = ctx
                    .dns_elapsed()
                    .ok_or(TraceError::MissingContext("dns_start_time"))?;
                format!(
                    "DNS lookup of host {host} took {:.2}ms [{}]",
                    millis(latency),
                    ctx.identifier()
                )
            }
        };

        tracing::debug!(target: "chat_http::trace", "{line}");
        Ok(())
    }
}

pub(crate) fn format_request(
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    ctx: &TraceContext,
) -> String {
    let body = ctx
        .request_body
        .as_ref()
        .map_or_else(|| "<???>".to_string(), ToString::to_string);
    format!(
        "{method} {url} [{}]\n  request headers: {}\n  request body: {body}",
        ctx.identifier(),
        headers::render(headers),
    )
}

pub(crate) fn format_response(response: &ApiResponse, latency_ms: f64, id: &str) -> String {
    let body = if response.headers.contains_key(CONTENT_TYPE) {
        format!("{:?}", response.body)
    } else {
        "no-content".to_string()
    };
    format!(
        "{} {} {} after {latency_ms:.2}ms [{id}]\n  response headers: {}\n  response body: {body}",
        response.url,
        response.status.as_u16(),
        response.reason(),
        headers::render(&response.headers),
    )
}

pub(crate) fn format_exception(error: &(dyn StdError + Send + Sync + 'static), id: &str) -> String {
    let mut line = format!("encountered exception [{id}]: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(line, "\n  caused by: {cause}");
        source = cause.source();
    }
    line
}
