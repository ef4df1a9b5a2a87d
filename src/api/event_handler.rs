//! Handler for Slack Events API callbacks.
//!
//! This module processes the inner `event` of an `event_callback` payload:
//! - `app_mention` - the bot was mentioned, possibly with files attached
//! - `message` with the `file_share` subtype - a file was posted where the bot is present
//! - `message` in a direct message with the bot
//!
//! `file_shared` carries neither the message text nor its timestamp, so it is
//! acknowledged and otherwise ignored; the matching `file_share` message does the work.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::parsing::{IncomingMessage, extract_message, v_str};
use crate::bot::SummaryBot;
use crate::core::params::parse_params;
use crate::slack::response_builder::help_text;
use crate::utils::filters::should_skip_event;
use crate::worker::{DispatchOutcome, dispatch, poll_job};

/// What the bot should do with an inner event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Handle,
    Ignore,
}

/// Decides whether an inner event is a summarization request.
#[must_use]
pub fn classify_event(event: &Value) -> EventAction {
    if should_skip_event(event) {
        return EventAction::Ignore;
    }

    match v_str(event, &["type"]).unwrap_or_default() {
        "app_mention" => EventAction::Handle,
        "message" => {
            let is_file_share = v_str(event, &["subtype"]) == Some("file_share");
            let is_dm = v_str(event, &["channel_type"]) == Some("im");
            // summary files are uploaded as thread replies and must not start new jobs
            let is_thread_reply = v_str(event, &["thread_ts"])
                .is_some_and(|thread_ts| Some(thread_ts) != v_str(event, &["ts"]));
            if (is_file_share || is_dm) && !is_thread_reply {
                EventAction::Handle
            } else {
                EventAction::Ignore
            }
        }
        _ => EventAction::Ignore,
    }
}

/// Processes one inner event to completion, including polling any job it starts.
///
/// Runs in its own task; nothing here is reported back to the HTTP caller.
pub async fn process_event(bot: Arc<SummaryBot>, event: Value) {
    let event_type = v_str(&event, &["type"]).unwrap_or_default().to_string();

    if classify_event(&event) == EventAction::Ignore {
        debug!(event_type = %event_type, "Ignoring event");
        return;
    }

    let message = match extract_message(&event) {
        Ok(m) => m,
        Err(e) => {
            warn!(event_type = %event_type, "Unusable event: {}", e);
            return;
        }
    };

    handle_message(bot, message).await;
}

async fn handle_message(bot: Arc<SummaryBot>, message: IncomingMessage) {
    let msg_ref = message.message_ref();
    let params = parse_params(&message.text);
    info!(
        channel = %message.channel,
        ts = %message.ts,
        user = ?message.user,
        files = message.files.len(),
        transcript_id = ?params.transcript_id,
        "Summarization request received"
    );

    if message.files.is_empty() && params.transcript_id.is_none() {
        bot.reply(&msg_ref, &help_text()).await.ok();
        return;
    }

    match dispatch(&bot, &msg_ref, params, &message.files).await {
        DispatchOutcome::Started(job_id) => {
            let status = poll_job(&bot, &job_id).await;
            info!(job_id = %job_id, status = %status, "Job finished");
        }
        DispatchOutcome::Duplicate => {
            debug!(message = %msg_ref, "Duplicate event for handled message");
        }
        DispatchOutcome::Failed(reason) => {
            debug!(message = %msg_ref, reason = %reason, "Request not dispatched");
        }
    }
}
