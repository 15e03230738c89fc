//! Header names the client sets or the tracers report on

use std::fmt::Write as _;

use reqwest::header::HeaderMap;

pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const USER_AGENT: &str = "User-Agent";
/// Cloudflare ray id, quoted in support requests to the platform
pub const CF_RAY: &str = "CF-Ray";
pub const CF_REQUEST_ID: &str = "CF-Request-ID";

pub const APPLICATION_JSON: &str = "application/json";

/// Header value as text, `None` when absent or not visible ASCII
pub fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Render every header as `{name: value, ...}`, repeated names included
pub fn render(headers: &HeaderMap) -> String {
    let mut out = String::from("{");
    for (i, (name, value)) in headers.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let value = value
            .to_str()
            .map_or_else(|_| format!("{:?}", value.as_bytes()), str::to_owned);
        let _ = write!(out, "{name:?}: {value:?}");
    }
    out.push('}');
    out
}
