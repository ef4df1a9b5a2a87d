//! Domain types shared by the parser, the dispatcher and the relay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Summary lengths requested when the message does not name any.
pub const DEFAULT_SUMMARY_LENGTHS: [u8; 3] = [1, 3, 5];

/// Summary style understood by the summarization API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryType {
    Brief,
    Conversational,
    #[default]
    Narrative,
    NoSpeaker,
    ReasonConclusion,
}

impl SummaryType {
    pub const ALL: [SummaryType; 5] = [
        SummaryType::Brief,
        SummaryType::Conversational,
        SummaryType::Narrative,
        SummaryType::NoSpeaker,
        SummaryType::ReasonConclusion,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryType::Brief => "brief",
            SummaryType::Conversational => "conversational",
            SummaryType::Narrative => "narrative",
            SummaryType::NoSpeaker => "no_speaker",
            SummaryType::ReasonConclusion => "reason_conclusion",
        }
    }
}

impl FromStr for SummaryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Languages supported for both the source material and the generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
    Es,
    It,
    Nl,
    Sv,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Fr,
        Language::De,
        Language::Es,
        Language::It,
        Language::Nl,
        Language::Sv,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
            Language::It => "it",
            Language::Nl => "nl",
            Language::Sv => "sv",
        }
    }

    /// Slack emoji name of the flag shown next to a dispatched request.
    #[must_use]
    pub fn flag_emoji(self) -> &'static str {
        match self {
            Language::En => "flag-us",
            Language::Fr => "flag-fr",
            Language::De => "flag-de",
            Language::Es => "flag-es",
            Language::It => "flag-it",
            Language::Nl => "flag-nl",
            Language::Sv => "flag-se",
        }
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Optional sections the summarization API can add to a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextTag {
    DiscussionPoints,
    Issue,
    Keywords,
    NextSteps,
    Purpose,
}

impl ContextTag {
    pub const ALL: [ContextTag; 5] = [
        ContextTag::DiscussionPoints,
        ContextTag::Issue,
        ContextTag::Keywords,
        ContextTag::NextSteps,
        ContextTag::Purpose,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContextTag::DiscussionPoints => "discussion_points",
            ContextTag::Issue => "issue",
            ContextTag::Keywords => "keywords",
            ContextTag::NextSteps => "next_steps",
            ContextTag::Purpose => "purpose",
        }
    }
}

impl FromStr for ContextTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// How the summarization API should fetch a file-backed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Audio,
    Generic,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Audio => "audio",
            SourceKind::Generic => "generic",
        }
    }
}

/// What is being summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    /// A Slack-hosted upload, fetched by the summarization API with the bot token.
    File {
        url: String,
        name: String,
        kind: SourceKind,
    },
    /// A transcript already stored on the summarization side.
    Transcript { id: String },
}

impl SummarySource {
    /// Human-readable label used in logs and error messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            SummarySource::File { name, .. } => name,
            SummarySource::Transcript { id } => id,
        }
    }
}

/// Options parsed from the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub summary_length: BTreeSet<u8>,
    pub summary_type: SummaryType,
    pub source_lang: Language,
    pub target_lang: Language,
    pub context_tags: BTreeSet<ContextTag>,
    pub ephemeral: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            summary_length: DEFAULT_SUMMARY_LENGTHS.into_iter().collect(),
            summary_type: SummaryType::default(),
            source_lang: Language::default(),
            target_lang: Language::default(),
            context_tags: BTreeSet::new(),
            ephemeral: true,
        }
    }
}

/// A fully resolved request, immutable once handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    pub source: SummarySource,
    pub options: SummaryOptions,
}

/// A file attached to a Slack message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    pub id: String,
    pub name: String,
    /// Private download URL; requires the bot token to fetch.
    pub url: String,
}

/// The Slack message that triggered a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

impl MessageRef {
    pub fn new(channel: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ts: ts.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_type_round_trips_through_str() {
        for t in SummaryType::ALL {
            assert_eq!(t.as_str().parse::<SummaryType>(), Ok(t));
        }
        assert_eq!("NO_SPEAKER".parse::<SummaryType>(), Ok(SummaryType::NoSpeaker));
        assert!("poem".parse::<SummaryType>().is_err());
    }

    #[test]
    fn test_language_flags_cover_every_language() {
        for lang in Language::ALL {
            assert!(lang.flag_emoji().starts_with("flag-"));
        }
        assert_eq!(Language::ALL.len(), 7);
    }

    #[test]
    fn test_default_options() {
        let opts = SummaryOptions::default();
        assert_eq!(opts.summary_length, BTreeSet::from([1, 3, 5]));
        assert_eq!(opts.summary_type, SummaryType::Narrative);
        assert_eq!(opts.source_lang, Language::En);
        assert_eq!(opts.target_lang, Language::En);
        assert!(opts.context_tags.is_empty());
        assert!(opts.ephemeral);
    }
}
