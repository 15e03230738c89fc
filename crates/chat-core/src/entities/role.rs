//! Role entity - represents a guild role with permissions

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};
use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i64,
    pub permissions: Permissions,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    /// Decode a role payload received as part of `guild_id`
    pub fn from_payload(payload: &Payload, guild_id: Snowflake) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            id: f.snowflake("id")?,
            guild_id,
            name: f.string("name")?,
            color: f.opt_u32("color")?.unwrap_or(0),
            hoist: f.bool_or_false("hoist")?,
            position: f.opt_i64("position")?.unwrap_or(0),
            permissions: Permissions::from_payload_bits(f.bits("permissions")?),
            managed: f.bool_or_false("managed")?,
            mentionable: f.bool_or_false("mentionable")?,
        })
    }

    /// Check if this role grants a specific permission
    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }

    /// Compare role positions for hierarchy (higher position = more authority)
    #[inline]
    pub fn is_higher_than(&self, other: &Role) -> bool {
        self.position > other.position
    }

    /// Check if this is the @everyone role (shares the guild's id)
    #[inline]
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }

    /// Get the color as a hex string (without #)
    pub fn color_hex(&self) -> String {
        format!("{:06x}", self.color)
    }
}
