//! MIME utilities shared across modules

/// Content type to declare when uploading a generated file to Slack.
#[must_use]
pub fn upload_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_text_plain()
        .essence_str()
        .to_string()
}
