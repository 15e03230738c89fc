//! Error types for payload decoding and cross-entity resolution

mod model_error;

pub use model_error::{ModelError, ModelResult, PayloadError, ResolveError};
