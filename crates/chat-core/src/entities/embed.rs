//! Rich embeds attached to messages

use chrono::{DateTime, FixedOffset};

use crate::error::ModelResult;
use crate::payload::{Fields, Payload};

const DEFAULT_EMBED_TYPE: &str = "rich";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Free-form embed kind, `rich` when the payload omits it
    pub embed_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub thumbnail: Option<EmbedThumbnail>,
}

impl Embed {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            embed_type: f
                .opt_string("type")?
                .unwrap_or_else(|| DEFAULT_EMBED_TYPE.to_string()),
            title: f.opt_string("title")?,
            description: f.opt_string("description")?,
            url: f.opt_string("url")?,
            timestamp: f.opt_timestamp("timestamp")?,
            color: f.opt_u32("color")?,
            fields: f.map_objects("fields", EmbedField::from_payload)?,
            thumbnail: f.opt_nested("thumbnail", EmbedThumbnail::from_payload)?,
        })
    }

    /// Check if the embed carries nothing to render
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.fields.is_empty()
            && self.thumbnail.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            name: f.string("name")?,
            value: f.string("value")?,
            inline: f.bool_or_false("inline")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedThumbnail {
    pub url: String,
    pub proxy_url: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

impl EmbedThumbnail {
    pub fn from_payload(payload: &Payload) -> ModelResult<Self> {
        let f = Fields::new(payload);
        Ok(Self {
            url: f.string("url")?,
            proxy_url: f.opt_string("proxy_url")?,
            width: f.opt_u64("width")?,
            height: f.opt_u64("height")?,
        })
    }
}
