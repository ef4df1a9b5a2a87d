//! Builders for the text and files the bot posts back to Slack.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::core::models::{
    ContextTag, DEFAULT_SUMMARY_LENGTHS, Language, SummaryType,
};
use crate::wordcab::types::{StructuredSummary, SummaryResponse};

/// A text file to upload as a threaded reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFile {
    pub filename: String,
    pub title: String,
    pub alt_text: String,
    pub content: String,
}

/// Turn a retrieved summary into one upload per requested length.
///
/// Files are named `{type}_{length}_{summary_id}.txt`. Brief summaries render each
/// section as `title\nbody` separated by blank lines; other types join the structured
/// sentences with spaces. Context sections named in `requested` are appended last;
/// anything else the API returns is left out.
#[must_use]
pub fn build_summary_files(
    summary: &SummaryResponse,
    requested: &BTreeSet<ContextTag>,
) -> Vec<SummaryFile> {
    let summary_type = summary.summary_type.as_str();
    let summary_id = summary.summary_id.as_str();
    let is_brief = summary_type.parse::<SummaryType>() == Ok(SummaryType::Brief);

    summary
        .summary
        .iter()
        .map(|(length, entry)| {
            let body = if is_brief {
                format_brief_summary(&entry.structured_summary)
            } else {
                format_any_summary(&entry.structured_summary)
            };
            let content = match &entry.context {
                Some(context) => add_context_to_summary(body, &requested_context(context, requested)),
                None => body,
            };

            SummaryFile {
                filename: format!("{summary_type}_{length}_{summary_id}.txt"),
                title: format!("{summary_type}_{length}_{summary_id}"),
                alt_text: format!(
                    "Summary {summary_id} of type {summary_type} with a length of {length}."
                ),
                content,
            }
        })
        .collect()
}

fn requested_context(
    context: &serde_json::Map<String, Value>,
    requested: &BTreeSet<ContextTag>,
) -> serde_json::Map<String, Value> {
    context
        .iter()
        .filter(|(key, _)| key.parse::<ContextTag>().is_ok_and(|tag| requested.contains(&tag)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// `title\nbrief_summary` blocks separated by a blank line.
#[must_use]
pub fn format_brief_summary(items: &[StructuredSummary]) -> String {
    items
        .iter()
        .map(|item| match &item.summary {
            Value::Object(fields) => {
                let title = fields.get("title").and_then(Value::as_str).unwrap_or("");
                let body = fields
                    .get("brief_summary")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                format!("{title}\n{body}")
            }
            other => value_to_text(other),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Structured summary sentences joined by single spaces.
#[must_use]
pub fn format_any_summary(items: &[StructuredSummary]) -> String {
    items
        .iter()
        .map(|item| value_to_text(&item.summary))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends each context entry as a `key: value` paragraph.
#[must_use]
pub fn add_context_to_summary(mut summary: String, context: &serde_json::Map<String, Value>) -> String {
    for (key, value) in context {
        summary.push_str("\n\n");
        summary.push_str(key);
        summary.push_str(": ");
        summary.push_str(&value_to_text(value));
    }
    summary
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Threaded reply explaining how to ask for a summary.
#[must_use]
pub fn help_text() -> String {
    let types = SummaryType::ALL
        .iter()
        .map(|t| format!("`{t}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let languages = Language::ALL
        .iter()
        .map(|l| format!("`{l}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let context = ContextTag::ALL
        .iter()
        .map(|c| format!("`{}`", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let lengths = DEFAULT_SUMMARY_LENGTHS
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "Hi there! :hugging_face:\n\nI'm your summarization assistant. Post an audio or text file \
         in this channel, or mention me with `transcript_id:<id>`, and I'll summarize it for you.\n\n\
         *Parameters* (order doesn't matter):\n\
         • summary length: digits 1-5, e.g. `2` or `1,3,5`\n\
         • summary type: {types}\n\
         • target language: {languages} (or `source_lang:fr target_lang:en`)\n\
         • context sections: `context:issue,next_steps` from {context}\n\
         • `ephemeral:false` keeps the job on the summarization side\n\n\
         e.g. `2 narrative` or `1,3,5 brief fr`\n\n\
         *Defaults:* length `{lengths}`, type `{default_type}`, language `{default_lang}`, ephemeral `true`.",
        default_type = SummaryType::default(),
        default_lang = Language::default(),
    )
}
