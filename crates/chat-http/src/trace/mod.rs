//! Request lifecycle tracing
//!
//! The client raises a [`TraceSignal`] at each hook point of a request. A
//! [`TraceConfig`] forwards it to every [`Tracer`] registered for that
//! event, together with the request's [`TraceContext`].

mod cf_ray;
mod config;
pub mod context;
mod debug;
mod event;
mod tracer;

pub use cf_ray::CfRayTracer;
pub use config::TraceConfig;
pub use context::{SharedTraceContext, TraceContext};
pub use debug::DebugTracer;
pub use event::{TraceEvent, TraceSignal};
pub use tracer::{TraceError, Tracer};
