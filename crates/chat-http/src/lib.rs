//! # chat-http
//!
//! REST transport for the chat platform: an `HttpClient` over `reqwest`,
//! request lifecycle tracing, a tracing-aware DNS cache and connector, and
//! fetch helpers that decode responses into `chat-core` models.

pub mod body;
pub mod client;
pub mod connect;
pub mod dns;
pub mod error;
pub mod headers;
pub mod trace;

// Re-export commonly used types at crate root
pub use body::{FormData, FormPart, RequestBody};
pub use client::{ApiResponse, HttpClient};
pub use connect::ConnectionTraceLayer;
pub use dns::TracingResolver;
pub use error::{HttpError, HttpResult};
pub use trace::{
    CfRayTracer, DebugTracer, SharedTraceContext, TraceConfig, TraceContext, TraceError,
    TraceEvent, TraceSignal, Tracer,
};
