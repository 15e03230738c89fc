//! Decoding messages and resolving what they refer to

mod common;

use chrono::{Datelike, Timelike};
use serde_json::json;

use chat_core::entities::{
    Channel, Guild, Message, MessageActivityType, MessageType, UnavailableGuild,
};
use chat_core::payload::payload_from;
use chat_core::value_objects::MessageFlags;
use chat_core::{ModelError, ResolveError};

use common::{author_payload, guild_payload, minimal_message, sf, Call, RecordingResolver};

#[test]
fn test_direct_message_from_payload() {
    let resolver = RecordingResolver::new();
    let m = Message::from_payload(
        &resolver,
        &payload_from(json!({
            "type": 0,
            "id": "12345",
            "channel_id": "67890",
            "guild_id": null,
            "author": author_payload(),
            "edited_timestamp": null,
            "tts": true,
            "mention_everyone": false,
            "attachments": [],
            "embeds": [],
            "pinned": false,
            "application": null,
            "activity": null,
            "content": "ayyyyyyy lmao",
            "flags": 7,
        })),
    )
    .unwrap();

    assert_eq!(m.message_type, MessageType::Default);
    assert_eq!(m.id, sf(12_345));
    assert_eq!(m.channel_id, sf(67_890));
    assert_eq!(m.guild_id, None);
    assert_eq!(m.author_id, sf(1234));
    assert_eq!(m.edited_at, None);
    assert!(m.tts);
    assert!(!m.mentions_everyone);
    assert!(!m.pinned);
    assert!(m.attachments.is_empty());
    assert!(m.embeds.is_empty());
    assert_eq!(m.application, None);
    assert_eq!(m.activity, None);
    assert_eq!(m.content, "ayyyyyyy lmao");
    assert!(m.flags.contains(
        MessageFlags::CROSSPOSTED | MessageFlags::IS_CROSSPOST | MessageFlags::SUPPRESS_EMBEDS
    ));
    assert!(m.is_direct());
    assert!(!m.is_system());
    assert!(!m.is_edited());
    assert_eq!(resolver.calls(), vec![Call::ParseUser(sf(1234))]);
}

#[test]
fn test_guild_message_with_everything() {
    let resolver = RecordingResolver::new();
    let m = Message::from_payload(
        &resolver,
        &payload_from(json!({
            "author": author_payload(),
            "type": 10,
            "id": "12345",
            "channel_id": "67890",
            "guild_id": "102234",
            "edited_timestamp": "2019-10-10T05:22:33.023456+02:30",
            "tts": false,
            "mention_everyone": true,
            "attachments": [
                {
                    "id": "5555555555555555",
                    "filename": "catto.png",
                    "size": 180,
                    "url": "http://c.at",
                    "proxy_url": "http://c.at/?proxy",
                    "width": 92,
                    "height": 69,
                }
            ],
            "embeds": [
                {
                    "type": "whelp",
                    "title": "hello, world",
                    "description": "ayyy lmao",
                    "fields": [{ "name": "ping", "value": "pong", "inline": true }],
                    "thumbnail": { "url": "hello", "proxy_url": "world" },
                },
                { "type": "something", "title": "hello, world, again." },
            ],
            "pinned": true,
            "application": {
                "id": "969696",
                "cover_image": "123454",
                "description": "this is a description",
                "icon": "900",
                "name": "fubar",
            },
            "activity": { "type": 2, "party_id": "44332211" },
            "content": "some pointless text",
            "something_we_didnt_account_for": "meh, it is fine to ignore it.",
        })),
    )
    .unwrap();

    assert_eq!(m.message_type, MessageType::UserPremiumGuildSubscriptionTier2);
    assert!(m.is_system());
    assert_eq!(m.guild_id, Some(sf(102_234)));
    assert!(!m.tts);
    assert!(m.mentions_everyone);
    assert!(m.pinned);
    assert_eq!(m.content, "some pointless text");
    assert!(m.flags.is_empty());

    let edited = m.edited_at.unwrap();
    assert_eq!(edited.offset().local_minus_utc(), 2 * 3600 + 30 * 60);
    assert_eq!((edited.year(), edited.month(), edited.day()), (2019, 10, 10));
    assert_eq!((edited.hour(), edited.minute(), edited.second()), (5, 22, 33));
    assert_eq!(edited.nanosecond(), 23_456_000);

    assert_eq!(m.attachments.len(), 1);
    let attachment = &m.attachments[0];
    assert_eq!(attachment.id, sf(5_555_555_555_555_555));
    assert_eq!(attachment.filename, "catto.png");
    assert_eq!(attachment.size, 180);
    assert_eq!(attachment.url, "http://c.at");
    assert_eq!(attachment.proxy_url, "http://c.at/?proxy");
    assert_eq!((attachment.width, attachment.height), (Some(92), Some(69)));

    assert_eq!(m.embeds.len(), 2);
    assert_eq!(m.embeds[0].embed_type, "whelp");
    assert_eq!(m.embeds[0].title.as_deref(), Some("hello, world"));
    assert_eq!(m.embeds[0].description.as_deref(), Some("ayyy lmao"));
    assert_eq!(m.embeds[0].fields.len(), 1);
    assert_eq!(m.embeds[0].fields[0].name, "ping");
    assert_eq!(m.embeds[0].fields[0].value, "pong");
    assert!(m.embeds[0].fields[0].inline);
    assert_eq!(m.embeds[1].embed_type, "something");
    assert_eq!(m.embeds[1].title.as_deref(), Some("hello, world, again."));

    let application = m.application.as_ref().unwrap();
    assert_eq!(application.id, sf(969_696));
    assert_eq!(application.cover_image_id, Some(sf(123_454)));
    assert_eq!(application.description, "this is a description");
    assert_eq!(application.icon_image_id, Some(sf(900)));
    assert_eq!(application.name, "fubar");

    let activity = m.activity.unwrap();
    assert_eq!(activity.activity_type, MessageActivityType::Spectate);
    assert_eq!(activity.party_id, Some(sf(44_332_211)));
}

#[test]
fn test_message_flags_retain_unknown_bits() {
    let resolver = RecordingResolver::new();
    let mut payload = minimal_message("1", None);
    payload.insert("flags".to_string(), json!(7 | 1024));

    let m = Message::from_payload(&resolver, &payload).unwrap();
    assert_eq!(m.flags.bits(), 1031);
}

#[test]
fn test_message_unknown_type_fails_closed() {
    let resolver = RecordingResolver::new();
    let mut payload = minimal_message("1", None);
    payload.insert("type".to_string(), json!(42));

    let err = Message::from_payload(&resolver, &payload).unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_VARIANT");
}

#[test]
fn test_message_bad_attachment_reports_path() {
    let resolver = RecordingResolver::new();
    let mut payload = minimal_message("1", None);
    payload.insert(
        "attachments".to_string(),
        json!([{ "id": "x", "filename": "a", "size": 1, "url": "u", "proxy_url": "p" }]),
    );

    match Message::from_payload(&resolver, &payload).unwrap_err() {
        ModelError::Payload(e) => assert_eq!(e.field(), "attachments[0].id"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_message_bad_author_reports_path() {
    let resolver = RecordingResolver::new();
    let mut payload = minimal_message("1", None);
    payload.insert("author".to_string(), json!({ "id": "1" }));

    match Message::from_payload(&resolver, &payload).unwrap_err() {
        ModelError::Payload(e) => assert_eq!(e.field(), "author.username"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_guild_accessor_for_guild_message() {
    let resolver = RecordingResolver::new();
    let guild = resolver.insert_guild(Guild::Unavailable(UnavailableGuild { id: sf(91_827) }));
    let m = Message::from_payload(&resolver, &minimal_message("1", Some("91827"))).unwrap();

    let found = m.guild(&resolver).unwrap().unwrap();
    assert!(std::sync::Arc::ptr_eq(&found, &guild));
    m.guild(&resolver).unwrap();

    // not memoized: every access goes back to the resolver
    assert_eq!(resolver.count(|c| *c == Call::ResolveGuild(sf(91_827))), 2);
}

#[test]
fn test_guild_accessor_for_direct_message() {
    let resolver = RecordingResolver::new();
    let m = Message::from_payload(&resolver, &minimal_message("1", None)).unwrap();

    assert!(m.guild(&resolver).unwrap().is_none());
    assert_eq!(resolver.count(|c| matches!(c, Call::ResolveGuild(_))), 0);
}

#[test]
fn test_guild_accessor_propagates_resolver_error() {
    let resolver = RecordingResolver::new();
    let m = Message::from_payload(&resolver, &minimal_message("1", Some("5"))).unwrap();

    let err = m.guild(&resolver).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err, ModelError::from(ResolveError::GuildNotFound(sf(5))));
}

#[test]
fn test_channel_accessor_for_guild_message() {
    let resolver = RecordingResolver::new();
    let guild = Guild::from_payload(&resolver, &guild_payload()).unwrap();
    let guild = resolver.insert_guild(guild);
    let m = Message::from_payload(&resolver, &minimal_message("1234567", Some("123456"))).unwrap();

    let channel = m.channel(&resolver).unwrap();
    assert!(std::sync::Arc::ptr_eq(&channel, guild.channel(sf(1_234_567)).unwrap()));
    assert_eq!(channel.name.as_deref(), Some("shh!"));
    assert_eq!(resolver.count(|c| *c == Call::ResolveGuild(sf(123_456))), 1);
    assert_eq!(resolver.count(|c| matches!(c, Call::ResolveDmChannel(_))), 0);
}

#[test]
fn test_channel_accessor_missing_guild_channel() {
    let resolver = RecordingResolver::new();
    resolver.insert_guild(Guild::from_payload(&resolver, &guild_payload()).unwrap());
    let m = Message::from_payload(&resolver, &minimal_message("777", Some("123456"))).unwrap();

    let err = m.channel(&resolver).unwrap_err();
    assert_eq!(err, ModelError::from(ResolveError::ChannelNotFound(sf(777))));
}

#[test]
fn test_channel_accessor_for_unavailable_guild() {
    let resolver = RecordingResolver::new();
    resolver.insert_guild(Guild::Unavailable(UnavailableGuild { id: sf(5) }));
    let m = Message::from_payload(&resolver, &minimal_message("1", Some("5"))).unwrap();

    assert_eq!(m.channel(&resolver).unwrap_err().code(), "UNKNOWN_CHANNEL");
}

#[test]
fn test_channel_accessor_for_direct_message() {
    let resolver = RecordingResolver::new();
    let dm = resolver.insert_dm_channel(
        Channel::from_payload(&payload_from(json!({ "type": 1, "id": "1234" })), None).unwrap(),
    );
    let m = Message::from_payload(&resolver, &minimal_message("1234", None)).unwrap();

    let channel = m.channel(&resolver).unwrap();
    assert!(std::sync::Arc::ptr_eq(&channel, &dm));
    assert_eq!(resolver.count(|c| *c == Call::ResolveDmChannel(sf(1234))), 1);
    assert_eq!(resolver.count(|c| matches!(c, Call::ResolveGuild(_))), 0);
}

#[test]
fn test_author_accessor() {
    let resolver = RecordingResolver::new();
    let m = Message::from_payload(&resolver, &minimal_message("1", None)).unwrap();

    let author = m.author(&resolver).unwrap();
    assert_eq!(author.id, sf(1234));
    assert_eq!(author.username, "potato");
    assert_eq!(resolver.count(|c| *c == Call::ResolveUser(sf(1234))), 1);
}

#[test]
fn test_message_preview() {
    let resolver = RecordingResolver::new();
    let mut payload = minimal_message("1", None);
    payload.insert("content".to_string(), json!("héllo world"));
    let m = Message::from_payload(&resolver, &payload).unwrap();

    assert_eq!(m.preview(100), "héllo world");
    // byte 2 falls inside 'é'
    assert_eq!(m.preview(2), "h");
}
