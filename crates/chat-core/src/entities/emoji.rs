//! Emoji entity - a guild's custom emoji

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};
use crate::traits::ModelResolver;
use crate::value_objects::Snowflake;

use super::CDN_URL;

/// Custom emoji
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    /// Roles allowed to use this emoji, empty for everyone
    pub role_ids: Vec<Snowflake>,
    /// Uploader, when the payload carries one
    pub user_id: Option<Snowflake>,
    pub require_colons: bool,
    pub managed: bool,
    pub animated: bool,
}

impl Emoji {
    /// Decode an emoji payload; an embedded uploader is registered with the resolver
    pub fn from_payload<R>(resolver: &R, payload: &Payload, guild_id: Snowflake) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);
        let user_id = f
            .opt_nested("user", |user| resolver.parse_user(user))?
            .map(|user| user.id);

        Ok(Self {
            id: f.snowflake("id")?,
            guild_id,
            name: f.string("name")?,
            role_ids: f.snowflakes("roles")?,
            user_id,
            require_colons: f.bool_or_false("require_colons")?,
            managed: f.bool_or_false("managed")?,
            animated: f.bool_or_false("animated")?,
        })
    }

    /// Text that renders this emoji inside a message
    pub fn mention(&self) -> String {
        let prefix = if self.animated { "a" } else { "" };
        format!("<{prefix}:{}:{}>", self.name, self.id)
    }

    pub fn url(&self) -> String {
        let ext = if self.animated { "gif" } else { "png" };
        format!("{CDN_URL}/emojis/{}.{ext}", self.id)
    }
}
