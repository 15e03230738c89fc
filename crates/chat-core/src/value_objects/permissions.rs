//! Permissions bitflags for platform access control
//!
//! The platform transmits permission sets as integer bitfields. Bits this
//! crate does not name are retained so that a decoded set re-serializes to
//! exactly the value that was received.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Platform permission flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// Create instant invites
        const CREATE_INSTANT_INVITE = 1 << 0;
        /// Kick members from guild
        const KICK_MEMBERS          = 1 << 1;
        /// Ban members from guild
        const BAN_MEMBERS           = 1 << 2;
        /// Bypass all permission checks
        const ADMINISTRATOR         = 1 << 3;
        /// Create, edit, delete channels
        const MANAGE_CHANNELS       = 1 << 4;
        /// Edit guild settings
        const MANAGE_GUILD          = 1 << 5;
        /// Add emoji reactions
        const ADD_REACTIONS         = 1 << 6;
        /// View the audit log
        const VIEW_AUDIT_LOG        = 1 << 7;
        /// Speak over others in voice channels
        const PRIORITY_SPEAKER      = 1 << 8;
        /// Go live in voice channels
        const STREAM                = 1 << 9;
        /// View channel and read messages
        const VIEW_CHANNEL          = 1 << 10;
        /// Send messages in text channels
        const SEND_MESSAGES         = 1 << 11;
        /// Send text-to-speech messages
        const SEND_TTS_MESSAGES     = 1 << 12;
        /// Delete and pin other users' messages
        const MANAGE_MESSAGES       = 1 << 13;
        /// Links sent are auto-embedded
        const EMBED_LINKS           = 1 << 14;
        /// Upload files and images
        const ATTACH_FILES          = 1 << 15;
        /// Read message history
        const READ_MESSAGE_HISTORY  = 1 << 16;
        /// Use @everyone and @here
        const MENTION_EVERYONE      = 1 << 17;
        /// Use emojis from other guilds
        const USE_EXTERNAL_EMOJIS   = 1 << 18;
        /// View guild insights
        const VIEW_GUILD_INSIGHTS   = 1 << 19;
        /// Join voice channels
        const CONNECT               = 1 << 20;
        /// Speak in voice channels
        const SPEAK                 = 1 << 21;
        /// Server-mute members
        const MUTE_MEMBERS          = 1 << 22;
        /// Server-deafen members
        const DEAFEN_MEMBERS        = 1 << 23;
        /// Move members between voice channels
        const MOVE_MEMBERS          = 1 << 24;
        /// Use voice activity detection
        const USE_VAD               = 1 << 25;
        /// Change own nickname
        const CHANGE_NICKNAME       = 1 << 26;
        /// Change other members' nicknames
        const MANAGE_NICKNAMES      = 1 << 27;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES          = 1 << 28;
        /// Create, edit, delete webhooks
        const MANAGE_WEBHOOKS       = 1 << 29;
        /// Create, edit, delete emojis
        const MANAGE_EMOJIS         = 1 << 30;
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Check if the permission set has any of the given permissions
    #[inline]
    pub fn has_any(&self, permissions: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.intersects(permissions)
    }

    /// Check if the permission set has all of the given permissions
    #[inline]
    pub fn has_all(&self, permissions: Permissions) -> bool {
        self.has(permissions)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Build from raw payload bits, keeping bits without a name
    #[inline]
    pub fn from_payload_bits(bits: u64) -> Self {
        Permissions::from_bits_retain(bits)
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_retain)
    }

    /// Get a list of all named permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Check if this permission set is a subset of another
    #[inline]
    pub fn is_subset_of(&self, other: Permissions) -> bool {
        (*self & other) == *self
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .map(Permissions::from_bits_retain)
                    .map_err(|_| de::Error::custom("negative permission bits"))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_retain(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::parse(value).map_err(|_| de::Error::custom("invalid permissions string"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

impl From<u64> for Permissions {
    fn from(bits: u64) -> Self {
        Permissions::from_bits_retain(bits)
    }
}

impl From<Permissions> for u64 {
    fn from(perms: Permissions) -> Self {
        perms.bits()
    }
}
