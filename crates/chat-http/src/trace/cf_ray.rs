//! Summary request logging for Cloudflare-fronted APIs

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

use super::context::{millis, TraceContext};
use super::event::{TraceEvent, TraceSignal};
use super::tracer::{TraceError, Tracer};
use crate::client::ApiResponse;
use crate::headers::{self, ACCEPT, CF_RAY, CF_REQUEST_ID, CONTENT_LENGTH, CONTENT_TYPE};

/// Logs each request line, its status and latency, and the Cloudflare ray
/// ids of the response at DEBUG
#[derive(Debug, Clone, Copy, Default)]
pub struct CfRayTracer;

impl CfRayTracer {
    const EVENTS: &'static [TraceEvent] = &[TraceEvent::RequestStart, TraceEvent::RequestEnd];
}

#[async_trait]
impl Tracer for CfRayTracer {
    fn name(&self) -> &'static str {
        "cf_ray"
    }

    fn events(&self) -> &'static [TraceEvent] {
        Self::EVENTS
    }

    async fn on_event(
        &self,
        ctx: &mut TraceContext,
        signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError> {
        match *signal {
            TraceSignal::RequestStart {
                method,
                url,
                headers,
            } => {
                ctx.assign_identifier();
                ctx.mark_start();
                tracing::debug!(
                    target: "chat_http::trace",
                    "{}",
                    format_request(method, url, headers, ctx.identifier())
                );
            }
            TraceSignal::RequestEnd { response, .. } => {
                let latency = ctx
                    .elapsed()
                    .ok_or(TraceError::MissingContext("start_time"))?;
                tracing::debug!(
                    target: "chat_http::trace",
                    "{}",
                    format_response(response, millis(latency), ctx.identifier())
                );
            }
            _ => {}
        }
        Ok(())
    }
}

pub(crate) fn format_request(method: &Method, url: &Url, headers: &HeaderMap, id: &str) -> String {
    format!(
        "{method} {url} [{CONTENT_TYPE}:{}, {ACCEPT}:{}] [{id}]",
        headers::get(headers, CONTENT_TYPE).unwrap_or("None"),
        headers::get(headers, ACCEPT).unwrap_or("None"),
    )
}

pub(crate) fn format_response(response: &ApiResponse, latency_ms: f64, id: &str) -> String {
    let h = &response.headers;
    format!(
        "{} {} after {latency_ms:.1}ms [{CONTENT_TYPE}:{}, {CONTENT_LENGTH}:{}, {CF_RAY}:{}, {CF_REQUEST_ID}:{}] [{id}]",
        response.status.as_u16(),
        response.reason(),
        headers::get(h, CONTENT_TYPE).unwrap_or("None"),
        headers::get(h, CONTENT_LENGTH).unwrap_or("0"),
        headers::get(h, CF_RAY).unwrap_or("None"),
        headers::get(h, CF_REQUEST_ID).unwrap_or("None"),
    )
}
