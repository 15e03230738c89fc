//! # chat-core
//!
//! Domain layer containing value objects, entities decoded from API payloads,
//! and the resolver trait entities use to reach each other.
//! This crate performs no I/O.

mod macros;

pub mod entities;
pub mod error;
pub mod payload;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, AvailableGuild, Ban, Channel, ChannelType, Embed, EmbedField, EmbedThumbnail,
    Emoji, ExplicitContentFilterLevel, Guild, GuildFeature, Member, Message, MessageActivity,
    MessageActivityType, MessageApplication, MessageNotificationLevel, MessageType, MfaLevel,
    PremiumTier, Role, UnavailableGuild, User, VerificationLevel,
};
pub use error::{ModelError, ModelResult, PayloadError, ResolveError};
pub use payload::{Fields, Payload, UnknownVariant};
pub use traits::ModelResolver;
pub use value_objects::{
    MessageFlags, Permissions, Snowflake, SnowflakeParseError, SystemChannelFlags,
};
