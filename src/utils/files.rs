//! Classification of uploaded files into summarization sources.

use url::Url;

use crate::core::models::SourceKind;
use crate::errors::BotError;

pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".flac", ".m4a", ".mp3", ".mp4", ".mpeg", ".mpga", ".oga", ".ogg", ".wav", ".webm",
];
pub const GENERIC_EXTENSIONS: &[&str] = &[".json", ".txt"];

/// Returns the lowercase extension of `filename` including the leading dot.
///
/// A name without a dot yields the whole name prefixed with a dot, so it never matches.
#[must_use]
pub fn file_extension(filename: &str) -> String {
    let ext = filename.rsplit('.').next().unwrap_or(filename);
    format!(".{}", ext.to_ascii_lowercase())
}

/// Decides how the summarization API should treat a file, based on its extension.
///
/// # Errors
///
/// Returns `BotError::UnsupportedFile` listing the accepted formats.
pub fn classify_file(filename: &str) -> Result<SourceKind, BotError> {
    let ext = file_extension(filename);
    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(SourceKind::Audio)
    } else if GENERIC_EXTENSIONS.contains(&ext.as_str()) {
        Ok(SourceKind::Generic)
    } else {
        Err(BotError::UnsupportedFile {
            extension: ext,
            accepted: accepted_formats(),
        })
    }
}

/// Accepted extensions formatted for a Slack message.
#[must_use]
pub fn accepted_formats() -> String {
    AUDIO_EXTENSIONS
        .iter()
        .chain(GENERIC_EXTENSIONS)
        .map(|ext| format!("`{ext}`"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last path segment of a download URL, falling back to the raw string.
#[must_use]
pub fn file_name_from_url(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.next_back().map(ToString::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| raw.rsplit('/').next().unwrap_or(raw).to_string())
}
