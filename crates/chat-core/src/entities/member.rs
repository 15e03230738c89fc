//! Member entity - represents a user's membership in a guild

use chrono::{DateTime, FixedOffset};

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};
use crate::traits::ModelResolver;
use crate::value_objects::Snowflake;

/// Guild member entity (junction between User and Guild)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
    pub joined_at: DateTime<FixedOffset>,
    pub premium_since: Option<DateTime<FixedOffset>>,
}

impl Member {
    /// Decode a member payload; the embedded user is registered with the resolver
    ///
    /// Voice state fields (`deaf`, `mute`) are not part of the member model.
    pub fn from_payload<R>(resolver: &R, payload: &Payload, guild_id: Snowflake) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);
        let user = f.nested("user", |user| resolver.parse_user(user))?;

        Ok(Self {
            guild_id,
            user_id: user.id,
            nickname: f.opt_string("nick")?,
            role_ids: f.snowflakes("roles")?,
            joined_at: f.timestamp("joined_at")?,
            premium_since: f.opt_timestamp("premium_since")?,
        })
    }

    /// Get display name (nickname if set, otherwise fallback)
    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        self.nickname.as_deref().unwrap_or(username)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Check if the member is boosting the guild
    #[inline]
    pub fn is_premium(&self) -> bool {
        self.premium_since.is_some()
    }
}
