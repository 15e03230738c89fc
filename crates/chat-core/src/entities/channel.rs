//! Channel entity - represents a text channel, DM, voice channel, or category

use crate::error::ModelResult;
use crate::macros::closed_enum;
use crate::payload::{Fields, Payload};
use crate::value_objects::Snowflake;

closed_enum! {
    /// Channel type enum
    pub enum ChannelType {
        /// Guild text channel
        GuildText = 0,
        /// Direct message between users
        Dm = 1,
        /// Guild voice channel
        GuildVoice = 2,
        /// Direct message between multiple users
        GroupDm = 3,
        /// Guild category for organizing channels
        GuildCategory = 4,
        /// Announcement channel others can follow
        GuildNews = 5,
        /// Store page channel
        GuildStore = 6,
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub channel_type: ChannelType,
    pub guild_id: Option<Snowflake>,
    pub position: Option<i64>,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub nsfw: bool,
    pub parent_id: Option<Snowflake>,
    pub rate_limit_per_user: Option<u64>,
    pub bitrate: Option<u64>,
    pub user_limit: Option<u64>,
}

impl Channel {
    /// Decode a channel payload
    ///
    /// Channels sent inside a guild payload may omit `guild_id`; the parent
    /// guild's id, when given, takes precedence.
    pub fn from_payload(payload: &Payload, guild_id: Option<Snowflake>) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            id: f.snowflake("id")?,
            channel_type: f.enum_value("type")?,
            guild_id: match guild_id {
                Some(id) => Some(id),
                None => f.opt_snowflake("guild_id")?,
            },
            position: f.opt_i64("position")?,
            name: f.opt_string("name")?,
            topic: f.opt_string("topic")?,
            nsfw: f.bool_or_false("nsfw")?,
            parent_id: f.opt_snowflake("parent_id")?,
            rate_limit_per_user: f.opt_u64("rate_limit_per_user")?,
            bitrate: f.opt_u64("bitrate")?,
            user_limit: f.opt_u64("user_limit")?,
        })
    }

    /// Check if this is a text channel (guild text, news, or DM)
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self.channel_type,
            ChannelType::GuildText | ChannelType::GuildNews | ChannelType::Dm | ChannelType::GroupDm
        )
    }

    /// Check if this is a voice channel
    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        matches!(self.channel_type, ChannelType::GuildVoice)
    }

    /// Check if this is a category
    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self.channel_type, ChannelType::GuildCategory)
    }

    /// Check if this is a DM channel
    #[inline]
    #[must_use]
    pub fn is_dm(&self) -> bool {
        matches!(self.channel_type, ChannelType::Dm | ChannelType::GroupDm)
    }

    /// Check if this is a guild channel
    #[inline]
    #[must_use]
    pub fn is_guild_channel(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Get display name (channel name or fallback for DMs)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Direct Message")
    }
}
