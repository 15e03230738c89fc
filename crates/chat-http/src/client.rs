//! REST client
//!
//! Every request runs inside its own trace context and raises the tracer
//! hooks in order: request start, connection queued (only when the
//! connection limit is reached), DNS events from [`TracingResolver`], a new
//! connection from [`ConnectionTraceLayer`] or a reused one, then request
//! end or request exception.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tokio::sync::{Semaphore, TryAcquireError};

use chat_common::{ApiConfig, ClientConfig, HttpSettings, TraceMode};
use chat_core::{Ban, Guild, Message, ModelResolver, Payload, Snowflake};

use crate::body::RequestBody;
use crate::connect::ConnectionTraceLayer;
use crate::dns::TracingResolver;
use crate::error::{HttpError, HttpResult};
use crate::headers::{ACCEPT, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use crate::trace::{
    context, CfRayTracer, DebugTracer, SharedTraceContext, TraceConfig, TraceContext, TraceSignal,
};

/// A fully buffered response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Final URL, after redirects
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    /// Canonical reason phrase of the status code
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as a single JSON object
    pub fn payload(&self) -> HttpResult<Payload> {
        match serde_json::from_slice(&self.body)? {
            Value::Object(map) => Ok(map),
            _ => Err(HttpError::UnexpectedShape("a JSON object")),
        }
    }

    /// Decode the body as an array of JSON objects
    pub fn payloads(&self) -> HttpResult<Vec<Payload>> {
        let Value::Array(items) = serde_json::from_slice(&self.body)? else {
            return Err(HttpError::UnexpectedShape("a JSON array"));
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                _ => Err(HttpError::UnexpectedShape("an array of JSON objects")),
            })
            .collect()
    }
}

/// Client for the chat platform's REST API
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    authorization: Option<HeaderValue>,
    user_agent: HeaderValue,
    permits: Arc<Semaphore>,
    tracing: Arc<TraceConfig>,
    resolver: TracingResolver,
}

impl HttpClient {
    pub fn new(api: &ApiConfig, http: &HttpSettings, trace: TraceConfig) -> HttpResult<Self> {
        let hooks = Arc::new(trace);
        let resolver = TracingResolver::new(http.dns_cache_ttl, Arc::clone(&hooks));

        let inner = reqwest::Client::builder()
            .timeout(http.timeout)
            .dns_resolver(Arc::new(resolver.clone()))
            .connector_layer(ConnectionTraceLayer::new(Arc::clone(&hooks)))
            .build()?;

        let authorization = api
            .token
            .as_deref()
            .map(|token| {
                let mut value =
                    HeaderValue::from_str(token).map_err(|_| HttpError::InvalidHeader(AUTHORIZATION))?;
                value.set_sensitive(true);
                Ok::<_, HttpError>(value)
            })
            .transpose()?;
        let user_agent = HeaderValue::from_str(&api.user_agent)
            .map_err(|_| HttpError::InvalidHeader(USER_AGENT))?;

        tracing::debug!(
            base_url = %api.base_url,
            max_connections = http.max_connections,
            tracers = ?hooks,
            "HTTP client created"
        );

        Ok(Self {
            inner,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            authorization,
            user_agent,
            permits: Arc::new(Semaphore::new(http.max_connections)),
            tracing: hooks,
            resolver,
        })
    }

    /// Build a client with the tracers selected by `HTTP_TRACE`
    pub fn from_config(config: &ClientConfig) -> HttpResult<Self> {
        let trace = match config.http.trace {
            TraceMode::Off => TraceConfig::new(),
            TraceMode::Summary => TraceConfig::new().with(Arc::new(CfRayTracer)),
            TraceMode::Verbose => {
                tracing::warn!("Verbose HTTP tracing enabled, logs will contain the API token");
                TraceConfig::new().with(Arc::new(DebugTracer))
            }
        };
        Self::new(&config.api, &config.http, trace)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tracing(&self) -> &TraceConfig {
        &self.tracing
    }

    pub fn resolver(&self) -> &TracingResolver {
        &self.resolver
    }

    /// Absolute URL for an API path such as `guilds/1234`
    pub fn endpoint(&self, path: &str) -> HttpResult<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| HttpError::InvalidUrl(format!("{joined}: {e}")))
    }

    pub async fn get(&self, path: &str) -> HttpResult<ApiResponse> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    /// Send a request and buffer the response
    ///
    /// Any non-2xx status is returned as [`HttpError::Status`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: impl Into<RequestBody>,
    ) -> HttpResult<ApiResponse> {
        let body = body.into();
        let url = self.endpoint(path)?;
        let headers = self.headers(&body)?;
        let bytes = body.to_bytes()?;

        let ctx = if self.tracing.is_empty() {
            TraceContext::new()
        } else {
            TraceContext::with_body(body)
        }
        .into_shared();

        context::scope(
            Arc::clone(&ctx),
            self.send(&ctx, method, url, headers, bytes),
        )
        .await
    }

    async fn send(
        &self,
        ctx: &SharedTraceContext,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> HttpResult<ApiResponse> {
        self.tracing
            .dispatch(
                ctx,
                TraceSignal::RequestStart {
                    method: &method,
                    url: &url,
                    headers: &headers,
                },
            )
            .await;

        let _permit = match self.permits.try_acquire() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                self.tracing
                    .dispatch(ctx, TraceSignal::ConnectionQueuedStart)
                    .await;
                self.permits
                    .acquire()
                    .await
                    .map_err(|_| HttpError::LimiterClosed)?
            }
            Err(TryAcquireError::Closed) => return Err(HttpError::LimiterClosed),
        };

        let mut builder = self
            .inner
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }

        let response = match receive(builder).await {
            Ok(response) => response,
            Err(e) => {
                self.tracing
                    .dispatch(
                        ctx,
                        TraceSignal::RequestException {
                            method: &method,
                            url: &url,
                            error: &e,
                        },
                    )
                    .await;
                tracing::debug!(method = %method, url = %url, error = %e, "Request failed");
                return Err(e.into());
            }
        };

        // the connector only runs when the pool had nothing idle
        let reused = !ctx.lock().await.new_connection;
        if reused {
            self.tracing
                .dispatch(ctx, TraceSignal::ConnectionReuseconn)
                .await;
        }

        self.tracing
            .dispatch(
                ctx,
                TraceSignal::RequestEnd {
                    method: &method,
                    url: &url,
                    response: &response,
                },
            )
            .await;

        if !response.status.is_success() {
            tracing::debug!(
                method = %method,
                url = %url,
                status = %response.status,
                "API returned error status"
            );
            return Err(HttpError::Status {
                status: response.status,
                body: response.text().into_owned(),
            });
        }

        Ok(response)
    }

    fn headers(&self, body: &RequestBody) -> HttpResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.authorization {
            headers.insert(AUTHORIZATION, token.clone());
        }
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(content_type) = body.content_type() {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|_| HttpError::InvalidHeader(CONTENT_TYPE))?;
            headers.insert(CONTENT_TYPE, value);
        }
        Ok(headers)
    }

    // =========================================================================
    // Typed endpoints
    // =========================================================================

    /// `GET guilds/{guild_id}`
    pub async fn fetch_guild<R>(&self, resolver: &R, guild_id: Snowflake) -> HttpResult<Guild>
    where
        R: ModelResolver + ?Sized,
    {
        let payload = self.get(&format!("guilds/{guild_id}")).await?.payload()?;
        Ok(Guild::from_payload(resolver, &payload)?)
    }

    /// `GET guilds/{guild_id}/bans`
    pub async fn fetch_guild_bans<R>(&self, resolver: &R, guild_id: Snowflake) -> HttpResult<Vec<Ban>>
    where
        R: ModelResolver + ?Sized,
    {
        let payloads = self
            .get(&format!("guilds/{guild_id}/bans"))
            .await?
            .payloads()?;
        payloads
            .iter()
            .map(|payload| Ban::from_payload(resolver, payload).map_err(HttpError::from))
            .collect()
    }

    /// `GET channels/{channel_id}/messages/{message_id}`
    pub async fn fetch_message<R>(
        &self,
        resolver: &R,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> HttpResult<Message>
    where
        R: ModelResolver + ?Sized,
    {
        let payload = self
            .get(&format!("channels/{channel_id}/messages/{message_id}"))
            .await?
            .payload()?;
        Ok(Message::from_payload(resolver, &payload)?)
    }

    /// `GET channels/{channel_id}/messages`, newest first
    pub async fn fetch_messages<R>(
        &self,
        resolver: &R,
        channel_id: Snowflake,
        limit: Option<u8>,
    ) -> HttpResult<Vec<Message>>
    where
        R: ModelResolver + ?Sized,
    {
        let path = match limit {
            Some(limit) => format!("channels/{channel_id}/messages?limit={limit}"),
            None => format!("channels/{channel_id}/messages"),
        };
        let payloads = self.get(&path).await?.payloads()?;
        payloads
            .iter()
            .map(|payload| Message::from_payload(resolver, payload).map_err(HttpError::from))
            .collect()
    }
}

async fn receive(builder: reqwest::RequestBuilder) -> Result<ApiResponse, reqwest::Error> {
    let response = builder.send().await?;
    let status = response.status();
    let url = response.url().clone();
    let headers = response.headers().clone();
    let body = response.bytes().await?;
    Ok(ApiResponse {
        status,
        url,
        headers,
        body,
    })
}
