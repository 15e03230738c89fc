//! Guild entity - represents a server/community

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::error::ModelResult;
use crate::macros::closed_enum;
use crate::payload::{Fields, Payload};
use crate::traits::ModelResolver;
use crate::value_objects::{Permissions, Snowflake, SystemChannelFlags};

use super::{Channel, Emoji, Member, Role, CDN_URL};

closed_enum! {
    /// Requirements a member must meet before talking in the guild
    pub enum VerificationLevel {
        /// Unrestricted
        None = 0,
        /// Verified email
        Low = 1,
        /// Registered for longer than 5 minutes
        Medium = 2,
        /// Member of the guild for longer than 10 minutes
        High = 3,
        /// Verified phone number
        VeryHigh = 4,
    }
}

closed_enum! {
    /// Default notification setting for new members
    pub enum MessageNotificationLevel {
        AllMessages = 0,
        OnlyMentions = 1,
    }
}

closed_enum! {
    /// Whose messages get scanned for explicit content
    pub enum ExplicitContentFilterLevel {
        Disabled = 0,
        MembersWithoutRoles = 1,
        AllMembers = 2,
    }
}

closed_enum! {
    /// Whether moderators need two-factor auth
    pub enum MfaLevel {
        None = 0,
        Elevated = 1,
    }
}

closed_enum! {
    /// Server boost level
    pub enum PremiumTier {
        None = 0,
        Tier1 = 1,
        Tier2 = 2,
        Tier3 = 3,
    }
}

/// A feature enabled on a guild
///
/// The platform adds features without notice, so unrecognized names are
/// kept verbatim in [`GuildFeature::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GuildFeature {
    AnimatedIcon,
    Banner,
    Commerce,
    Discoverable,
    Featurable,
    InviteSplash,
    MoreEmoji,
    News,
    Lurkable,
    Partnered,
    Public,
    PublicDisabled,
    VanityUrl,
    Verified,
    VipRegions,
    Other(String),
}

impl GuildFeature {
    /// Map a feature name from the API
    pub fn from_name(name: &str) -> Self {
        match name {
            "ANIMATED_ICON" => Self::AnimatedIcon,
            "BANNER" => Self::Banner,
            "COMMERCE" => Self::Commerce,
            "DISCOVERABLE" => Self::Discoverable,
            "FEATURABLE" => Self::Featurable,
            "INVITE_SPLASH" => Self::InviteSplash,
            "MORE_EMOJI" => Self::MoreEmoji,
            "NEWS" => Self::News,
            "LURKABLE" => Self::Lurkable,
            "PARTNERED" => Self::Partnered,
            "PUBLIC" => Self::Public,
            "PUBLIC_DISABLED" => Self::PublicDisabled,
            "VANITY_URL" => Self::VanityUrl,
            "VERIFIED" => Self::Verified,
            "VIP_REGIONS" => Self::VipRegions,
            other => Self::Other(other.to_string()),
        }
    }

    /// The name the API uses for this feature
    pub fn as_str(&self) -> &str {
        match self {
            Self::AnimatedIcon => "ANIMATED_ICON",
            Self::Banner => "BANNER",
            Self::Commerce => "COMMERCE",
            Self::Discoverable => "DISCOVERABLE",
            Self::Featurable => "FEATURABLE",
            Self::InviteSplash => "INVITE_SPLASH",
            Self::MoreEmoji => "MORE_EMOJI",
            Self::News => "NEWS",
            Self::Lurkable => "LURKABLE",
            Self::Partnered => "PARTNERED",
            Self::Public => "PUBLIC",
            Self::PublicDisabled => "PUBLIC_DISABLED",
            Self::VanityUrl => "VANITY_URL",
            Self::Verified => "VERIFIED",
            Self::VipRegions => "VIP_REGIONS",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for GuildFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guild that is reachable; every field has been decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableGuild {
    pub id: Snowflake,
    pub afk_channel_id: Option<Snowflake>,
    pub owner_id: Snowflake,
    pub voice_region_id: Option<Snowflake>,
    pub system_channel_id: Option<Snowflake>,
    /// Application that created the guild, for bot-owned guilds
    pub creator_application_id: Option<Snowflake>,
    pub name: String,
    pub icon_hash: Option<String>,
    pub splash_hash: Option<String>,
    pub banner_hash: Option<String>,
    /// Seconds before an idle member is moved to the AFK channel
    pub afk_timeout: u64,
    pub verification_level: VerificationLevel,
    pub message_notification_level: MessageNotificationLevel,
    pub explicit_content_filter_level: ExplicitContentFilterLevel,
    /// Ordered as received
    pub roles: Vec<Arc<Role>>,
    pub emojis: HashMap<Snowflake, Arc<Emoji>>,
    /// Keyed by user id
    pub members: HashMap<Snowflake, Arc<Member>>,
    pub channels: HashMap<Snowflake, Arc<Channel>>,
    pub features: HashSet<GuildFeature>,
    pub member_count: Option<u64>,
    pub mfa_level: MfaLevel,
    /// Permissions of the current user, empty when not sent
    pub my_permissions: Permissions,
    pub premium_tier: PremiumTier,
    pub premium_subscription_count: Option<u64>,
    pub max_members: Option<u64>,
    pub vanity_url_code: Option<String>,
    pub description: Option<String>,
    pub preferred_locale: Option<String>,
    pub system_channel_flags: SystemChannelFlags,
    pub joined_at: Option<DateTime<FixedOffset>>,
    pub large: bool,
}

impl AvailableGuild {
    fn from_payload<R>(resolver: &R, payload: &Payload, id: Snowflake) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);

        let roles = f.map_objects("roles", |role| resolver.parse_role(role, id))?;
        let emojis = f
            .map_objects("emojis", |emoji| resolver.parse_emoji(emoji, id))?
            .into_iter()
            .map(|emoji| (emoji.id, emoji))
            .collect();
        let members = f
            .map_objects("members", |member| resolver.parse_member(member, id))?
            .into_iter()
            .map(|member| (member.user_id, member))
            .collect();
        let channels = f
            .map_objects("channels", |channel| resolver.parse_channel(channel, Some(id)))?
            .into_iter()
            .map(|channel| (channel.id, channel))
            .collect();
        let features = f
            .strings("features")?
            .into_iter()
            .map(GuildFeature::from_name)
            .collect();

        Ok(Self {
            id,
            afk_channel_id: f.opt_snowflake("afk_channel_id")?,
            owner_id: f.snowflake("owner_id")?,
            voice_region_id: f.opt_snowflake("region")?,
            system_channel_id: f.opt_snowflake("system_channel_id")?,
            creator_application_id: f.opt_snowflake("application_id")?,
            name: f.string("name")?,
            icon_hash: f.opt_string("icon")?,
            splash_hash: f.opt_string("splash")?,
            banner_hash: f.opt_string("banner")?,
            afk_timeout: f.u64("afk_timeout")?,
            verification_level: f.enum_value("verification_level")?,
            message_notification_level: f.enum_value("default_message_notifications")?,
            explicit_content_filter_level: f.enum_value("explicit_content_filter")?,
            roles,
            emojis,
            members,
            channels,
            features,
            member_count: f.opt_u64("member_count")?,
            mfa_level: f.enum_value("mfa_level")?,
            my_permissions: Permissions::from_payload_bits(f.bits("permissions")?),
            premium_tier: f.enum_value("premium_tier")?,
            premium_subscription_count: f.opt_u64("premium_subscription_count")?,
            max_members: f.opt_u64("max_members")?,
            vanity_url_code: f.opt_string("vanity_url_code")?,
            description: f.opt_string("description")?,
            preferred_locale: f.opt_string("preferred_locale")?,
            system_channel_flags: SystemChannelFlags::from_bits_retain(
                f.bits("system_channel_flags")?,
            ),
            joined_at: f.opt_timestamp("joined_at")?,
            large: f.bool_or_false("large")?,
        })
    }

    /// Check if the guild has a feature enabled
    #[inline]
    pub fn has_feature(&self, feature: &GuildFeature) -> bool {
        self.features.contains(feature)
    }

    /// Check if a user owns this guild
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    /// The @everyone role, which shares the guild's id
    pub fn everyone_role(&self) -> Option<&Arc<Role>> {
        self.roles.iter().find(|role| role.is_everyone())
    }

    /// Get icon URL if set
    pub fn icon_url(&self) -> Option<String> {
        self.icon_hash.as_ref().map(|hash| {
            let ext = if hash.starts_with("a_") { "gif" } else { "png" };
            format!("{CDN_URL}/icons/{}/{hash}.{ext}", self.id)
        })
    }
}

/// A guild the platform reports as temporarily unreachable
///
/// Only the id is known until the guild becomes available again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnavailableGuild {
    pub id: Snowflake,
}

/// Guild entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guild {
    Available(Box<AvailableGuild>),
    Unavailable(UnavailableGuild),
}

impl Guild {
    /// Decode a guild payload
    ///
    /// When `unavailable` is true nothing besides `id` is read, and the
    /// resolver is not called.
    pub fn from_payload<R>(resolver: &R, payload: &Payload) -> ModelResult<Self>
    where
        R: ModelResolver + ?Sized,
    {
        let f = Fields::new(payload);
        let id = f.snowflake("id")?;

        if f.bool_or_false("unavailable")? {
            return Ok(Self::Unavailable(UnavailableGuild { id }));
        }

        Ok(Self::Available(Box::new(AvailableGuild::from_payload(
            resolver, payload, id,
        )?)))
    }

    #[inline]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Available(guild) => guild.id,
            Self::Unavailable(guild) => guild.id,
        }
    }

    #[inline]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn as_available(&self) -> Option<&AvailableGuild> {
        match self {
            Self::Available(guild) => Some(guild),
            Self::Unavailable(_) => None,
        }
    }

    /// Look up one of the guild's channels; always `None` while unavailable
    pub fn channel(&self, id: Snowflake) -> Option<&Arc<Channel>> {
        self.as_available()?.channels.get(&id)
    }
}
