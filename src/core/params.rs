//! Summarization options parsed from free-form message text.
//!
//! The grammar is a bag of whitespace-separated tokens, matched case-insensitively:
//!
//! - `2`, `1,3,5`: summary lengths (digits 1 to 5, accumulated across tokens)
//! - `brief`, `no_speaker`, ...: summary type
//! - `fr`, `de`, ...: target language
//! - `key:value`: `source_lang`, `target_lang`, `context`, `ephemeral`,
//!   `transcript_id`, `length`, `type`
//!
//! Anything else is ignored and invalid values keep their defaults, so parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::models::{ContextTag, Language, SummaryOptions, SummaryType};

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@\w+(\|[^>]*)?>").expect("static regex compile"));

static LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d(,\d)*$").expect("static regex compile"));

const MIN_LENGTH: u8 = 1;
const MAX_LENGTH: u8 = 5;

/// Result of parsing a message: the options plus an optional transcript reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedParams {
    pub options: SummaryOptions,
    pub transcript_id: Option<String>,
}

#[derive(Default)]
struct Collected {
    lengths: BTreeSet<u8>,
    summary_type: Option<SummaryType>,
    source_lang: Option<Language>,
    target_lang: Option<Language>,
    bare_lang: Option<Language>,
    context_tags: BTreeSet<ContextTag>,
    ephemeral: Option<bool>,
    transcript_id: Option<String>,
}

/// Parses summarization options out of a Slack message.
///
/// # Examples
///
/// ```
/// use wordcab_slack::core::params::parse_params;
/// use wordcab_slack::core::models::{Language, SummaryType};
///
/// let parsed = parse_params("<@U04RVRJJN86> 1,3,5 brief fr");
/// assert_eq!(parsed.options.summary_type, SummaryType::Brief);
/// assert_eq!(parsed.options.target_lang, Language::Fr);
/// assert_eq!(parsed.options.source_lang, Language::En);
/// ```
#[must_use]
pub fn parse_params(text: &str) -> ParsedParams {
    let cleaned = strip_mentions(text);
    let mut collected = Collected::default();

    for token in cleaned.split_whitespace() {
        if let Some((key, value)) = token.split_once(':') {
            apply_option(&mut collected, &key.to_ascii_lowercase(), value);
        } else {
            apply_bare(&mut collected, token);
        }
    }

    let defaults = SummaryOptions::default();
    let source_lang = collected.source_lang.unwrap_or(defaults.source_lang);
    let target_lang = collected
        .target_lang
        .or(collected.bare_lang)
        .unwrap_or(source_lang);

    ParsedParams {
        options: SummaryOptions {
            summary_length: if collected.lengths.is_empty() {
                defaults.summary_length
            } else {
                collected.lengths
            },
            summary_type: collected.summary_type.unwrap_or(defaults.summary_type),
            source_lang,
            target_lang,
            context_tags: collected.context_tags,
            ephemeral: collected.ephemeral.unwrap_or(defaults.ephemeral),
        },
        transcript_id: collected.transcript_id,
    }
}

/// Removes `<@U123>` style user mentions, including the bot's own.
#[must_use]
pub fn strip_mentions(text: &str) -> String {
    MENTION_RE.replace_all(text, " ").into_owned()
}

fn apply_bare(collected: &mut Collected, token: &str) {
    if LENGTH_RE.is_match(token) {
        collected.lengths.extend(parse_lengths(token));
    } else if let Ok(summary_type) = token.parse::<SummaryType>() {
        collected.summary_type.get_or_insert(summary_type);
    } else if let Ok(lang) = token.parse::<Language>() {
        collected.bare_lang.get_or_insert(lang);
    }
}

fn apply_option(collected: &mut Collected, key: &str, value: &str) {
    match key {
        "source_lang" => {
            if let Ok(lang) = value.parse() {
                collected.source_lang.get_or_insert(lang);
            }
        }
        "target_lang" => {
            if let Ok(lang) = value.parse() {
                collected.target_lang.get_or_insert(lang);
            }
        }
        "context" => {
            collected
                .context_tags
                .extend(value.split(',').filter_map(|tag| tag.parse::<ContextTag>().ok()));
        }
        "ephemeral" => match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => collected.ephemeral = Some(true),
            "false" | "no" | "0" => collected.ephemeral = Some(false),
            _ => {}
        },
        "transcript_id" => {
            // Ids are case sensitive, keep them verbatim.
            if !value.is_empty() && collected.transcript_id.is_none() {
                collected.transcript_id = Some(value.to_string());
            }
        }
        "length" => {
            if LENGTH_RE.is_match(value) {
                collected.lengths.extend(parse_lengths(value));
            }
        }
        "type" => {
            if let Ok(summary_type) = value.parse() {
                collected.summary_type.get_or_insert(summary_type);
            }
        }
        _ => {}
    }
}

fn parse_lengths(token: &str) -> impl Iterator<Item = u8> + '_ {
    token
        .split(',')
        .filter_map(|d| d.parse::<u8>().ok())
        .filter(|d| (MIN_LENGTH..=MAX_LENGTH).contains(d))
}
