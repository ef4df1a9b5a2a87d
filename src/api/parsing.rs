use axum::http::HeaderMap;
use serde_json::Value;

use crate::core::models::{MessageRef, SharedFile};
use crate::errors::BotError;

/// The parts of a Slack message event the bot acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub channel: String,
    pub ts: String,
    pub text: String,
    pub user: Option<String>,
    pub channel_type: Option<String>,
    pub files: Vec<SharedFile>,
}

impl IncomingMessage {
    #[must_use]
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.channel.clone(), self.ts.clone())
    }

    #[must_use]
    pub fn is_direct_message(&self) -> bool {
        self.channel_type.as_deref() == Some("im")
    }
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

/// Reads a header as a string, ignoring values that are not valid UTF-8.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn shared_file(file: &Value) -> Option<SharedFile> {
    let url = v_str(file, &["url_private_download"]).or_else(|| v_str(file, &["url_private"]))?;
    let name = v_str(file, &["name"])
        .or_else(|| v_str(file, &["title"]))
        .map_or_else(|| crate::utils::files::file_name_from_url(url), ToString::to_string);

    Some(SharedFile {
        id: v_str(file, &["id"]).unwrap_or_default().to_string(),
        name,
        url: url.to_string(),
    })
}

/// Extracts the message fields from an `app_mention` or `message` event.
///
/// # Errors
///
/// Returns `BotError::ParseError` when the event has no channel or timestamp.
pub fn extract_message(event: &Value) -> Result<IncomingMessage, BotError> {
    let channel = v_str(event, &["channel"])
        .ok_or_else(|| BotError::ParseError("Event is missing channel".to_string()))?;
    let ts = v_str(event, &["ts"])
        .ok_or_else(|| BotError::ParseError("Event is missing ts".to_string()))?;

    let files = v_array(event, &["files"])
        .map(|files| files.iter().filter_map(shared_file).collect())
        .unwrap_or_default();

    Ok(IncomingMessage {
        channel: channel.to_string(),
        ts: ts.to_string(),
        text: v_str(event, &["text"]).unwrap_or_default().to_string(),
        user: v_str(event, &["user"]).map(ToString::to_string),
        channel_type: v_str(event, &["channel_type"]).map(ToString::to_string),
        files,
    })
}
