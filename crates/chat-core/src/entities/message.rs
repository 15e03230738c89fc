//! Message entity - represents a chat message

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::error::{ModelResult, ResolveError};
use crate::macros::closed_enum;
use crate::payload::{Fields, Payload};
use crate::traits::ModelResolver;
use crate::value_objects::{MessageFlags, Snowflake};

use super::{Channel, Embed, Guild, User};

closed_enum! {
    /// Kind of message; everything but `Default` is a system message
    pub enum MessageType {
        Default = 0,
        RecipientAdd = 1,
        RecipientRemove = 2,
        Call = 3,
        ChannelNameChange = 4,
        ChannelIconChange = 5,
        ChannelPinnedMessage = 6,
        GuildMemberJoin = 7,
        UserPremiumGuildSubscription = 8,
        UserPremiumGuildSubscriptionTier1 = 9,
        UserPremiumGuildSubscriptionTier2 = 10,
        UserPremiumGuildSubscriptionTier3 = 11,
        ChannelFollowAdd = 12,
    }
}

closed_enum! {
    /// Rich presence action a message invites the reader to take
    pub enum MessageActivityType {
        Join = 1,
        Spectate = 2,
        Listen = 3,
        JoinRequest = 5,
    }
}

/// Message entity
///
/// Related entities are stored by id. Use [`Message::guild`],
/// [`Message::channel`] and [`Message::author`] to look them up; every call
/// goes to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` for direct messages
    pub guild_id: Option<Snowflake>,
    pub author_id: Snowflake,
    pub message_type: MessageType,
    pub edited_at: Option<DateTime<FixedOffset>>,
    pub tts: bool,
    pub mentions_everyone: bool,
    pub pinned: bool,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
    pub application: Option<MessageApplication>,
    pub activity: Option<MessageActivity>,
    pub content: String,
    pub flags: MessageFlags,
}

impl Message {
    /// Decode a message payload; the author is registered with the resolver
    pub fn from_payload<R>(resolver: &R, payload: &Payload) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);
        let author = f.nested("author", |author| resolver.parse_user(author))?;

        Ok(Self {
            id: f.snowflake("id")?,
            channel_id: f.snowflake("channel_id")?,
            guild_id: f.opt_snowflake("guild_id")?,
            author_id: author.id,
            message_type: f.enum_value("type")?,
            edited_at: f.opt_timestamp("edited_timestamp")?,
            tts: f.bool_or_false("tts")?,
            mentions_everyone: f.bool_or_false("mention_everyone")?,
            pinned: f.bool_or_false("pinned")?,
            attachments: f.map_objects("attachments", Attachment::from_payload)?,
            embeds: f.map_objects("embeds", Embed::from_payload)?,
            application: f.opt_nested("application", MessageApplication::from_payload)?,
            activity: f.opt_nested("activity", MessageActivity::from_payload)?,
            content: f.string("content")?,
            flags: MessageFlags::from_bits_retain(f.bits("flags")?),
        })
    }

    /// The guild this message was sent in, `None` for direct messages
    ///
    /// The resolver is not consulted for direct messages.
    pub fn guild<R>(&self, resolver: &R) -> ModelResult<Option<Arc<Guild>>>
    where
        R: ModelResolver + ?Sized,
    {
        self.guild_id
            .map(|guild_id| resolver.resolve_guild(guild_id))
            .transpose()
    }

    /// The channel this message was sent in
    ///
    /// Guild channels are read from the guild's channel map; direct message
    /// channels are resolved by id.
    pub fn channel<R>(&self, resolver: &R) -> ModelResult<Arc<Channel>>
    where
        R: ModelResolver + ?Sized,
    {
        match self.guild_id {
            Some(guild_id) => {
                let guild = resolver.resolve_guild(guild_id)?;
                guild
                    .channel(self.channel_id)
                    .cloned()
                    .ok_or_else(|| ResolveError::ChannelNotFound(self.channel_id).into())
            }
            None => resolver.resolve_dm_channel(self.channel_id),
        }
    }

    /// The user who sent this message
    pub fn author<R>(&self, resolver: &R) -> ModelResult<Arc<User>>
    where
        R: ModelResolver + ?Sized,
    {
        resolver.resolve_user(self.author_id)
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Check if this was sent outside any guild
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }

    /// Check if this is a platform-generated message rather than user text
    #[inline]
    pub fn is_system(&self) -> bool {
        self.message_type != MessageType::Default
    }

    /// Get a truncated preview of the message (for notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    pub url: String,
    pub proxy_url: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

impl Attachment {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            id: f.snowflake("id")?,
            filename: f.string("filename")?,
            size: f.u64("size")?,
            url: f.string("url")?,
            proxy_url: f.string("proxy_url")?,
            width: f.opt_u64("width")?,
            height: f.opt_u64("height")?,
        })
    }

    /// Check if attachment has dimensions (is an image/video)
    pub fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Check if the platform marks the file as a spoiler
    pub fn is_spoiler(&self) -> bool {
        self.filename.starts_with("SPOILER_")
    }
}

/// Rich presence activity attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageActivity {
    pub activity_type: MessageActivityType,
    pub party_id: Option<Snowflake>,
}

impl MessageActivity {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            activity_type: f.enum_value("type")?,
            party_id: f.opt_snowflake("party_id")?,
        })
    }
}

/// Application that a rich presence message was sent through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageApplication {
    pub id: Snowflake,
    pub cover_image_id: Option<Snowflake>,
    pub description: String,
    pub icon_image_id: Option<Snowflake>,
    pub name: String,
}

impl MessageApplication {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            id: f.snowflake("id")?,
            cover_image_id: f.opt_snowflake("cover_image")?,
            description: f.string("description")?,
            icon_image_id: f.opt_snowflake("icon")?,
            name: f.string("name")?,
        })
    }
}
