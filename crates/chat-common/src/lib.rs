//! # chat-common
//!
//! Shared utilities: client configuration and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    ApiConfig, AppSettings, ClientConfig, ConfigError, Environment, HttpSettings, LogConfig,
    TraceMode,
};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
