//! Request bodies
//!
//! Bodies are kept as values until the request is sent, so tracers can
//! render them as often as they like without touching what goes on the wire.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::HttpResult;
use crate::headers::APPLICATION_JSON;

/// Body of an outgoing request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(FormData),
}

impl RequestBody {
    /// Serialize any value into a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> HttpResult<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// `Content-Type` to send with this body
    pub fn content_type(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(APPLICATION_JSON.to_string()),
            Self::Form(form) => Some(form.content_type()),
        }
    }

    /// Encode the body for the wire, `None` for an empty body
    pub fn to_bytes(&self) -> HttpResult<Option<Bytes>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(value) => Ok(Some(Bytes::from(serde_json::to_vec(value)?))),
            Self::Form(form) => Ok(Some(form.render())),
        }
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        Self::Form(form)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Log-friendly rendering; multipart bodies show their exact wire bytes
impl fmt::Display for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("None"),
            Self::Json(value) => write!(f, "{value}"),
            Self::Form(form) => write!(f, "{:?}", form.render()),
        }
    }
}

/// A `multipart/form-data` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    boundary: String,
    parts: Vec<FormPart>,
}

/// One part of a [`FormData`] body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl FormData {
    pub fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Add a plain text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Add a JSON field (the API reads message payloads from `payload_json`)
    #[must_use]
    pub fn json(mut self, name: impl Into<String>, value: &serde_json::Value) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            filename: None,
            content_type: Some(APPLICATION_JSON.to_string()),
            data: Bytes::from(value.to_string()),
        });
        self
    }

    /// Add a file upload
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: content_type.map(str::to_owned),
            data: data.into(),
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode the body; takes `&self`, so it can be rendered any number of times
    pub fn render(&self) -> Bytes {
        let mut out = BytesMut::new();
        for part in &self.parts {
            out.put_slice(b"--");
            out.put_slice(self.boundary.as_bytes());
            out.put_slice(b"\r\nContent-Disposition: form-data; name=\"");
            out.put_slice(escape_quoted(&part.name).as_bytes());
            out.put_u8(b'"');
            if let Some(filename) = &part.filename {
                out.put_slice(b"; filename=\"");
                out.put_slice(escape_quoted(filename).as_bytes());
                out.put_u8(b'"');
            }
            out.put_slice(b"\r\n");
            if let Some(content_type) = &part.content_type {
                out.put_slice(b"Content-Type: ");
                out.put_slice(content_type.as_bytes());
                out.put_slice(b"\r\n");
            }
            out.put_slice(b"\r\n");
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"--");
        out.put_slice(self.boundary.as_bytes());
        out.put_slice(b"--\r\n");
        out.freeze()
    }
}

/// Percent-encode the characters that would end a quoted header parameter
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
