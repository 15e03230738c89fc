//! Domain entities - models decoded from API payloads

mod ban;
mod channel;
mod embed;
mod emoji;
mod guild;
mod member;
mod message;
mod role;
mod user;

pub use ban::Ban;
pub use channel::{Channel, ChannelType};
pub use embed::{Embed, EmbedField, EmbedThumbnail};
pub use emoji::Emoji;
pub use guild::{
    AvailableGuild, ExplicitContentFilterLevel, Guild, GuildFeature, MessageNotificationLevel,
    MfaLevel, PremiumTier, UnavailableGuild, VerificationLevel,
};
pub use member::Member;
pub use message::{
    Attachment, Message, MessageActivity, MessageActivityType, MessageApplication, MessageType,
};
pub use role::Role;
pub use user::User;

/// Base URL of the platform's media CDN
pub(crate) const CDN_URL: &str = "https://cdn.discordapp.com";
