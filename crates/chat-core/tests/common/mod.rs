//! Shared test fixtures and a recording resolver
//!
//! `RecordingResolver` decodes nested payloads with the real entity decoders,
//! remembers every call it receives, and answers lookups from maps the test
//! fills in beforehand.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use chat_core::entities::{Channel, Emoji, Guild, Member, Role, User};
use chat_core::error::{ModelResult, ResolveError};
use chat_core::payload::{payload_from, Payload};
use chat_core::traits::ModelResolver;
use chat_core::value_objects::Snowflake;

/// One call received by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ParseUser(Snowflake),
    ParseRole(Snowflake),
    ParseEmoji(Snowflake),
    ParseMember(Snowflake),
    ParseChannel(Option<Snowflake>),
    ResolveUser(Snowflake),
    ResolveGuild(Snowflake),
    ResolveDmChannel(Snowflake),
}

#[derive(Default)]
pub struct RecordingResolver {
    calls: Mutex<Vec<Call>>,
    users: Mutex<HashMap<Snowflake, Arc<User>>>,
    guilds: Mutex<HashMap<Snowflake, Arc<Guild>>>,
    dm_channels: Mutex<HashMap<Snowflake, Arc<Channel>>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Count calls matching a predicate
    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn insert_guild(&self, guild: Guild) -> Arc<Guild> {
        let guild = Arc::new(guild);
        self.guilds.lock().insert(guild.id(), Arc::clone(&guild));
        guild
    }

    pub fn insert_dm_channel(&self, channel: Channel) -> Arc<Channel> {
        let channel = Arc::new(channel);
        self.dm_channels.lock().insert(channel.id, Arc::clone(&channel));
        channel
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl ModelResolver for RecordingResolver {
    fn parse_user(&self, payload: &Payload) -> ModelResult<Arc<User>> {
        let user = Arc::new(User::from_payload(payload)?);
        self.record(Call::ParseUser(user.id));
        self.users.lock().insert(user.id, Arc::clone(&user));
        Ok(user)
    }

    fn parse_role(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Role>> {
        self.record(Call::ParseRole(guild_id));
        Ok(Arc::new(Role::from_payload(payload, guild_id)?))
    }

    fn parse_emoji(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Emoji>> {
        self.record(Call::ParseEmoji(guild_id));
        Ok(Arc::new(Emoji::from_payload(self, payload, guild_id)?))
    }

    fn parse_member(&self, payload: &Payload, guild_id: Snowflake) -> ModelResult<Arc<Member>> {
        self.record(Call::ParseMember(guild_id));
        Ok(Arc::new(Member::from_payload(self, payload, guild_id)?))
    }

    fn parse_channel(
        &self,
        payload: &Payload,
        guild_id: Option<Snowflake>,
    ) -> ModelResult<Arc<Channel>> {
        self.record(Call::ParseChannel(guild_id));
        Ok(Arc::new(Channel::from_payload(payload, guild_id)?))
    }

    fn resolve_user(&self, id: Snowflake) -> ModelResult<Arc<User>> {
        self.record(Call::ResolveUser(id));
        self.users
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::UserNotFound(id).into())
    }

    fn resolve_guild(&self, id: Snowflake) -> ModelResult<Arc<Guild>> {
        self.record(Call::ResolveGuild(id));
        self.guilds
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::GuildNotFound(id).into())
    }

    fn resolve_dm_channel(&self, id: Snowflake) -> ModelResult<Arc<Channel>> {
        self.record(Call::ResolveDmChannel(id));
        self.dm_channels
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::ChannelNotFound(id).into())
    }
}

pub fn sf(id: u64) -> Snowflake {
    Snowflake::new(id)
}

pub fn emoji_payload() -> Value {
    json!({
        "id": "41771983429993937",
        "name": "LUL",
        "roles": ["41771983429993000", "41771983429993111"],
        "user": {
            "username": "Luigi",
            "discriminator": "0002",
            "id": "96008815106887111",
            "avatar": "5500909a3274e1812beb4e8de6631111",
        },
        "require_colons": true,
        "managed": false,
        "animated": false,
    })
}

pub fn role_payloads() -> Value {
    json!([
        {
            "id": "41771983423143936",
            "name": "WE DEM BOYZZ!!!!!!",
            "color": 3_447_003,
            "hoist": true,
            "position": 0,
            "permissions": 66_321_471,
            "managed": false,
            "mentionable": false,
        },
        {
            "id": "1111223",
            "name": "some unfunny pun here",
            "color": 0x00FF_00FF,
            "hoist": false,
            "position": 1,
            "permissions": 1,
            "managed": false,
            "mentionable": true,
        },
    ])
}

pub fn channel_payloads() -> Value {
    json!([
        {
            "type": 0,
            "id": "1234567",
            "guild_id": "696969",
            "position": 100,
            "permission_overwrites": [],
            "nsfw": true,
            "parent_id": null,
            "rate_limit_per_user": 420,
            "topic": "nsfw stuff",
            "name": "shh!",
        },
        {
            "type": 4,
            "id": "123456",
            "guild_id": "54321",
            "position": 69,
            "permission_overwrites": [],
            "name": "dank category",
        },
        {
            "type": 2,
            "id": "9292929",
            "guild_id": "929",
            "position": 66,
            "permission_overwrites": [],
            "name": "roy rodgers mc freely",
            "bitrate": 999,
            "user_limit": 0,
            "parent_id": "42",
        },
    ])
}

pub fn member_payload() -> Value {
    json!({
        "nick": "foobarbaz",
        "roles": ["11111", "22222", "33333", "44444"],
        "joined_at": "2015-04-26T06:26:56.936000+00:00",
        "premium_since": "2019-05-17T06:26:56.936000+00:00",
        "deaf": false,
        "mute": true,
        "user": {
            "id": "123456",
            "username": "Boris Johnson",
            "discriminator": "6969",
            "avatar": "1a2b3c4d",
            "mfa_enabled": true,
            "locale": "gb",
            "flags": 0b0010_1101,
            "premium_type": 0b0110_1101,
        },
    })
}

pub fn guild_payload() -> Payload {
    payload_from(json!({
        "id": "123456",
        "afk_channel_id": "99998888777766",
        "owner_id": "6969696",
        "region": "1234321",
        "system_channel_id": "19216801",
        "application_id": "10987654321",
        "name": "L33t guild",
        "icon": "1a2b3c4d",
        "splash": "0ff0ff0ff",
        "afk_timeout": 1200,
        "verification_level": 4,
        "default_message_notifications": 1,
        "explicit_content_filter": 2,
        "roles": role_payloads(),
        "emojis": [emoji_payload()],
        "features": ["ANIMATED_ICON", "MORE_EMOJI", "NEWS", "SOME_UNDOCUMENTED_FEATURE"],
        "member_count": 14,
        "mfa_level": 1,
        "joined_at": "2019-05-17T06:26:56.936000+00:00",
        "large": false,
        "unavailable": false,
        "voice_states": [],
        "permissions": 66_321_471,
        "members": [member_payload()],
        "channels": channel_payloads(),
        "max_members": 25_000,
        "vanity_url_code": "loool",
        "description": "This is a server I guess, its a bit crap though",
        "banner": "1a2b3c",
        "premium_tier": 2,
        "premium_subscription_count": 1,
        "preferred_locale": "en-GB",
        "system_channel_flags": 3,
    }))
}

pub fn author_payload() -> Value {
    json!({ "id": "1234", "username": "potato" })
}

/// Smallest message payload that decodes
pub fn minimal_message(channel_id: &str, guild_id: Option<&str>) -> Payload {
    payload_from(json!({
        "id": "12345",
        "channel_id": channel_id,
        "guild_id": guild_id,
        "author": author_payload(),
        "type": 0,
        "content": "",
    }))
}
