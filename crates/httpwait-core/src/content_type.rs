//! Response content-type classification.
//!
//! Only a small allow-list of media types is treated as text. Anything else
//! is still returned, with a warning, since binary bodies may not survive
//! being stored as a string.

/// Result of checking a `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentClass {
    Text,
    /// Not on the allow-list, unparseable, or a non-UTF-8 charset.
    NotText,
}

/// Warning detail attached to a non-text classification.
pub const NOT_TEXT_DETAIL: &str =
    "If the content is binary data, the orchestrator may not properly handle the contents of the response.";

/// A parsed media type: lowercased `type/subtype` plus lowercased parameter names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub essence: String,
    pub params: Vec<(String, String)>,
}

impl MediaType {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse `type/subtype; name=value; ...`. Returns `None` when the media type
/// is missing its subtype or a parameter is malformed.
pub fn parse_media_type(value: &str) -> Option<MediaType> {
    let mut parts = value.split(';');
    let essence = parts.next()?.trim().to_ascii_lowercase();
    let (ty, subtype) = essence.split_once('/')?;
    if !is_token(ty) || !is_token(subtype) {
        return None;
    }

    let mut params = Vec::new();
    for raw in parts {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let (name, val) = raw.split_once('=')?;
        let name = name.trim().to_ascii_lowercase();
        if !is_token(&name) {
            return None;
        }
        let val = val.trim();
        let val = match val.strip_prefix('"') {
            Some(rest) => rest.strip_suffix('"')?.replace("\\\"", "\""),
            None => val.to_string(),
        };
        params.push((name, val));
    }

    Some(MediaType { essence, params })
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

fn is_allowed_essence(essence: &str) -> bool {
    essence.starts_with("text/")
        || essence == "application/json"
        || essence.starts_with("application/samlmetadata+xml")
}

/// Classify a `Content-Type` header value. `None` (no header) is not text.
pub fn classify_content_type(value: Option<&str>) -> ContentClass {
    let Some(mt) = value.and_then(parse_media_type) else {
        return ContentClass::NotText;
    };
    if !is_allowed_essence(&mt.essence) {
        return ContentClass::NotText;
    }
    match mt.param("charset").map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("utf-8") | Some("us-ascii") => ContentClass::Text,
        Some(_) => ContentClass::NotText,
    }
}

/// Headline for the warning emitted when a body is not recognized as text.
pub fn not_text_summary(value: Option<&str>) -> String {
    format!(
        "Content-Type is not recognized as a text type, got {:?}",
        value.unwrap_or("")
    )
}
