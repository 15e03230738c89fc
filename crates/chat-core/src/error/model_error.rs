//! Model errors - failures while building entities from payloads

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Result type for decoding and resolver operations
pub type ModelResult<T> = Result<T, ModelError>;

/// A payload that does not match the shape the API documents
///
/// `field` is a dotted path relative to the payload being decoded, so a bad
/// id inside the first attachment of a message reads `attachments[0].id`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` is not {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("field `{field}` is not a valid snowflake: {value:?}")]
    InvalidSnowflake { field: String, value: String },

    #[error("field `{field}` is not an ISO-8601 timestamp: {value:?}")]
    InvalidTimestamp { field: String, value: String },

    #[error("field `{field}` has unrecognized value {value}")]
    UnknownVariant { field: String, value: u64 },
}

impl PayloadError {
    /// Path of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidSnowflake { field, .. }
            | Self::InvalidTimestamp { field, .. }
            | Self::UnknownVariant { field, .. } => field,
        }
    }

    /// Prefix the field path with the key of the enclosing payload
    #[must_use]
    pub fn within(mut self, parent: &str) -> Self {
        match &mut self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidSnowflake { field, .. }
            | Self::InvalidTimestamp { field, .. }
            | Self::UnknownVariant { field, .. } => {
                *field = format!("{parent}.{field}");
            }
        }
        self
    }

    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::InvalidType { .. } => "INVALID_TYPE",
            Self::InvalidSnowflake { .. } => "INVALID_SNOWFLAKE",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::UnknownVariant { .. } => "UNKNOWN_VARIANT",
        }
    }
}

/// Failure reported by a [`ModelResolver`](crate::traits::ModelResolver)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Resolver error: {0}")]
    Other(String),
}

/// Model layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("malformed payload: {0}")]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ModelError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::Payload(e) => e.code(),
            Self::Resolve(ResolveError::UserNotFound(_)) => "UNKNOWN_USER",
            Self::Resolve(ResolveError::GuildNotFound(_)) => "UNKNOWN_GUILD",
            Self::Resolve(ResolveError::ChannelNotFound(_)) => "UNKNOWN_CHANNEL",
            Self::Resolve(ResolveError::Other(_)) => "RESOLVER_ERROR",
        }
    }

    /// Check if the API sent something that could not be decoded
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, Self::Payload(_))
    }

    /// Check if this is a "not found" error from the resolver
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Resolve(
                ResolveError::UserNotFound(_)
                    | ResolveError::GuildNotFound(_)
                    | ResolveError::ChannelNotFound(_)
            )
        )
    }

    /// Prefix the field path of a payload error; resolver errors pass through
    #[must_use]
    pub fn within(self, parent: &str) -> Self {
        match self {
            Self::Payload(e) => Self::Payload(e.within(parent)),
            other => other,
        }
    }
}
