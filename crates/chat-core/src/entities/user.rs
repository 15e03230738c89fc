//! User entity - represents a platform account

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};
use crate::value_objects::Snowflake;

use super::CDN_URL;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub avatar_hash: Option<String>,
    pub bot: bool,
}

impl User {
    /// Decode a user payload
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            id: f.snowflake("id")?,
            username: f.string("username")?,
            discriminator: f.opt_string("discriminator")?.unwrap_or_else(|| "0000".to_string()),
            avatar_hash: f.opt_string("avatar")?,
            bot: f.bool_or_false("bot")?,
        })
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Get avatar URL or default avatar URL
    pub fn avatar_url(&self) -> String {
        match &self.avatar_hash {
            Some(hash) => format!("{CDN_URL}/avatars/{}/{}.png", self.id, hash),
            None => format!("{CDN_URL}/embed/avatars/{}.png", self.default_avatar_index()),
        }
    }

    /// Get default avatar index (0-4) based on discriminator
    fn default_avatar_index(&self) -> u16 {
        self.discriminator.parse::<u16>().unwrap_or(0) % 5
    }

    /// Check if user is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}
