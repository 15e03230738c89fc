//! Test helpers: a mock API server, recording tracers and an in-memory resolver

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use chat_common::{ApiConfig, HttpSettings};
use chat_core::{Channel, Emoji, Guild, Member, ModelResolver, ModelResult, Payload, ResolveError};
use chat_core::{Role, Snowflake, User};
use chat_http::{HttpClient, TraceConfig, TraceContext, TraceError, TraceEvent, TraceSignal, Tracer};

pub const TOKEN: &str = "Bot test-token";
pub const CF_RAY: &str = "8a1b2c3d4e5f6789-AMS";

// ============================================================================
// Mock API
// ============================================================================

/// Mock API server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, mock_api()).await.ok();
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Base URL by IP, no DNS lookup involved
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v7", self.addr)
    }

    /// Base URL by host name, resolved through the client's resolver
    pub fn named_base_url(&self) -> String {
        format!("http://localhost:{}/api/v7", self.addr.port())
    }

    pub fn client(&self, tracers: Vec<Arc<dyn Tracer>>) -> HttpClient {
        client_for(&self.base_url(), &HttpSettings::default(), tracers)
    }
}

pub fn client_for(base_url: &str, http: &HttpSettings, tracers: Vec<Arc<dyn Tracer>>) -> HttpClient {
    let api = ApiConfig {
        base_url: base_url.to_string(),
        token: Some(TOKEN.to_string()),
        user_agent: "chat-client (tests)".to_string(),
    };
    HttpClient::new(&api, http, TraceConfig::from_tracers(tracers)).expect("client")
}

/// A base URL nothing listens on
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/api/v7")
}

fn mock_api() -> Router {
    let api = Router::new()
        .route("/guilds/:guild_id", get(guild))
        .route("/guilds/:guild_id/bans", get(guild_bans))
        .route("/channels/:channel_id/messages", get(messages))
        .route("/channels/:channel_id/messages/:message_id", get(message))
        .route("/echo", post(echo))
        .route("/slow", get(slow))
        .route("/empty", get(empty));

    Router::new()
        .nest("/api/v7", api)
        .layer(axum::middleware::map_response(add_cf_ray))
}

async fn add_cf_ray(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert("cf-ray", HeaderValue::from_static(CF_RAY));
    response
}

async fn guild(Path(guild_id): Path<String>) -> Response {
    match guild_id.as_str() {
        "404" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Unknown Guild", "code": 10004 })),
        )
            .into_response(),
        "9" => Json(json!({ "id": "9", "unavailable": true })).into_response(),
        _ => Json(guild_payload(&guild_id)).into_response(),
    }
}

async fn guild_bans(Path(_guild_id): Path<String>) -> Json<Value> {
    Json(json!([
        { "reason": "spam", "user": { "id": "501", "username": "spammer" } },
        { "reason": null, "user": { "id": "502", "username": "quiet", "discriminator": "0042" } },
    ]))
}

#[derive(Debug, Deserialize)]
struct Limit {
    limit: Option<usize>,
}

async fn messages(Path(channel_id): Path<String>, Query(query): Query<Limit>) -> Json<Value> {
    let count = query.limit.unwrap_or(2);
    let items: Vec<Value> = (0..count)
        .map(|i| message_payload(&(7000 + i).to_string(), &channel_id, None))
        .collect();
    Json(Value::Array(items))
}

async fn message(Path((channel_id, message_id)): Path<(String, String)>) -> Json<Value> {
    Json(message_payload(&message_id, &channel_id, Some("1000")))
}

async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "authorization": header("authorization"),
        "user_agent": header("user-agent"),
        "accept": header("accept"),
        "content_type": header("content-type"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_millis(200)).await;
    StatusCode::NO_CONTENT
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn guild_payload(guild_id: &str) -> Value {
    json!({
        "id": guild_id,
        "name": "Testing",
        "owner_id": "100",
        "afk_timeout": 300,
        "verification_level": 2,
        "default_message_notifications": 1,
        "explicit_content_filter": 0,
        "mfa_level": 0,
        "premium_tier": 1,
        "permissions": 2048,
        "features": ["BANNER", "SOME_NEW_THING"],
        "roles": [
            { "id": guild_id, "name": "@everyone", "permissions": 104324161 }
        ],
        "channels": [
            { "id": "2000", "type": 0, "name": "general", "position": 0 },
            { "id": "2001", "type": 2, "name": "voice", "position": 1 }
        ],
    })
}

pub fn message_payload(id: &str, channel_id: &str, guild_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "channel_id": channel_id,
        "guild_id": guild_id,
        "author": { "id": "300", "username": "potato" },
        "type": 0,
        "content": "hello there",
        "timestamp": "2020-03-21T21:20:16.510000+00:00",
        "edited_timestamp": null,
        "flags": 4,
    })
}

// ============================================================================
// Tracers
// ============================================================================

/// One hook invocation seen by [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub event: TraceEvent,
    pub identifier: String,
    pub detail: Option<String>,
}

/// Records every event with the request's correlation id
#[derive(Default)]
pub struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.seen.lock().iter().map(|s| s.event).collect()
    }

    pub fn count(&self, event: TraceEvent) -> usize {
        self.seen.lock().iter().filter(|s| s.event == event).count()
    }

    pub fn detail(&self, event: TraceEvent) -> Option<String> {
        self.seen
            .lock()
            .iter()
            .find(|s| s.event == event)
            .and_then(|s| s.detail.clone())
    }
}

#[async_trait]
impl Tracer for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn events(&self) -> &'static [TraceEvent] {
        &TraceEvent::ALL
    }

    async fn on_event(
        &self,
        ctx: &mut TraceContext,
        signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError> {
        let detail = match *signal {
            TraceSignal::RequestStart { .. } => {
                ctx.assign_identifier();
                ctx.request_body.as_ref().map(ToString::to_string)
            }
            TraceSignal::RequestEnd { response, .. } => Some(response.status.as_u16().to_string()),
            TraceSignal::RequestException { error, .. } => Some(error.to_string()),
            TraceSignal::DnsCacheHit { host }
            | TraceSignal::DnsCacheMiss { host }
            | TraceSignal::DnsResolveHostStart { host }
            | TraceSignal::DnsResolveHostEnd { host } => Some(host.to_string()),
            _ => None,
        };
        self.seen.lock().push(Seen {
            event: signal.event(),
            identifier: ctx.identifier().to_string(),
            detail,
        });
        Ok(())
    }
}

/// Fails on every event
pub struct Failing;

#[async_trait]
impl Tracer for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn events(&self) -> &'static [TraceEvent] {
        &TraceEvent::ALL
    }

    async fn on_event(
        &self,
        _ctx: &mut TraceContext,
        _signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError> {
        Err(TraceError::Other("tracer failure".to_string()))
    }
}

/// Panics on request start and end
pub struct Panicking;

#[async_trait]
impl Tracer for Panicking {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn events(&self) -> &'static [TraceEvent] {
        &[TraceEvent::RequestStart, TraceEvent::RequestEnd]
    }

    async fn on_event(
        &self,
        _ctx: &mut TraceContext,
        _signal: &TraceSignal<'_>,
    ) -> Result<(), TraceError> {
        panic!("tracer bug")
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// In-memory entity cache
#[derive(Default)]
pub struct MemoryResolver {
    users: Mutex<HashMap<Snowflake, Arc<User>>>,
    guilds: Mutex<HashMap<Snowflake, Arc<Guild>>>,
    dm_channels: Mutex<HashMap<Snowflake, Arc<Channel>>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_guild(&self, guild: Guild) -> Arc<Guild> {
        let guild = Arc::new(guild);
        self.guilds.lock().insert(guild.id(), Arc::clone(&guild));
        guild
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().len()
    }
}

impl ModelResolver for MemoryResolver {
    fn parse_user(&self, payload: &Payload) -> ModelResult<Arc<User>> {
        let user = Arc::new(User::from_payload(payload)?);
        self.users.lock().insert(user.id, Arc::clone(&user));
        Ok(user)
    }

    fn parse_role(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Role>> {
        Ok(Arc::new(Role::from_payload(payload, guild_id)?))
    }

    fn parse_emoji(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Emoji>> {
        Ok(Arc::new(Emoji::from_payload(self, payload, guild_id)?))
    }

    fn parse_member(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Member>> {
        Ok(Arc::new(Member::from_payload(self, payload, guild_id)?))
    }

    fn parse_channel(
        &self,
        payload: &Payload,
        guild_id: Option<Snowflake>,
    ) -> ModelResult<Arc<Channel>> {
        let channel = Arc::new(Channel::from_payload(payload, guild_id)?);
        if guild_id.is_none() {
            self.dm_channels.lock().insert(channel.id, Arc::clone(&channel));
        }
        Ok(channel)
    }

    fn resolve_user(&self, id: Snowflake) -> ModelResult<Arc<User>> {
        self.users
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::UserNotFound(id).into())
    }

    fn resolve_guild(&self, id: Snowflake) -> ModelResult<Arc<Guild>> {
        self.guilds
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::GuildNotFound(id).into())
    }

    fn resolve_dm_channel(&self, id: Snowflake) -> ModelResult<Arc<Channel>> {
        self.dm_channels
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::ChannelNotFound(id).into())
    }
}
