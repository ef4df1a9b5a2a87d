//! In-memory fakes for the chat and summarization clients.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wordcab_slack::SummaryBot;
use wordcab_slack::bot::PollSettings;
use wordcab_slack::core::models::{MessageRef, SummarizationRequest};
use wordcab_slack::errors::BotError;
use wordcab_slack::slack::{ChatApi, SummaryFile};
use wordcab_slack::wordcab::SummaryApi;
use wordcab_slack::wordcab::types::{JobStatusResponse, SummaryResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    AddReaction(String),
    RemoveReaction(String),
    Post(String),
    Upload(String),
}

#[derive(Default)]
pub struct FakeChat {
    calls: Mutex<Vec<ChatCall>>,
}

impl FakeChat {
    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn added(&self, emoji: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == ChatCall::AddReaction(emoji.to_string()))
            .count()
    }

    pub fn removed(&self, emoji: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == ChatCall::RemoveReaction(emoji.to_string()))
            .count()
    }

    pub fn reaction_calls(&self) -> Vec<ChatCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ChatCall::AddReaction(_) | ChatCall::RemoveReaction(_)))
            .collect()
    }

    pub fn posts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::Post(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChatCall::Upload(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Reactions left on the message after replaying every add and remove.
    pub fn current_reactions(&self) -> Vec<String> {
        let mut current: Vec<String> = Vec::new();
        for call in self.calls() {
            match call {
                ChatCall::AddReaction(e) if !current.contains(&e) => current.push(e),
                ChatCall::RemoveReaction(e) => current.retain(|c| *c != e),
                _ => {}
            }
        }
        current
    }

    fn record(&self, call: ChatCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn add_reaction(&self, _message: &MessageRef, emoji: &str) -> Result<(), BotError> {
        self.record(ChatCall::AddReaction(emoji.to_string()));
        Ok(())
    }

    async fn remove_reaction(&self, _message: &MessageRef, emoji: &str) -> Result<(), BotError> {
        self.record(ChatCall::RemoveReaction(emoji.to_string()));
        Ok(())
    }

    async fn post_thread_message(&self, _message: &MessageRef, text: &str) -> Result<(), BotError> {
        self.record(ChatCall::Post(text.to_string()));
        Ok(())
    }

    async fn upload_thread_file(
        &self,
        _message: &MessageRef,
        file: &SummaryFile,
    ) -> Result<(), BotError> {
        self.record(ChatCall::Upload(file.filename.clone()));
        Ok(())
    }
}

/// Summarization API fake that replays a scripted sequence of job statuses.
///
/// A script entry is either a remote status string or an error message for a
/// failed status query.
#[derive(Default)]
pub struct FakeSummaries {
    pub reject_submit: bool,
    submit_attempts: Mutex<u32>,
    statuses: Mutex<VecDeque<Result<String, String>>>,
    submitted: Mutex<Vec<SummarizationRequest>>,
    deleted: Mutex<Vec<String>>,
    status_queries: Mutex<u32>,
}

impl FakeSummaries {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        let script: Vec<Result<&str, &str>> = statuses.iter().map(|s| Ok(*s)).collect();
        Self::with_script(&script)
    }

    pub fn with_script(script: &[Result<&str, &str>]) -> Self {
        Self {
            statuses: Mutex::new(
                script
                    .iter()
                    .map(|entry| entry.map(ToString::to_string).map_err(ToString::to_string))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn submit_attempts(&self) -> u32 {
        *self.submit_attempts.lock().unwrap()
    }

    pub fn rejecting() -> Self {
        Self {
            reject_submit: true,
            ..Self::default()
        }
    }

    pub fn submitted(&self) -> Vec<SummarizationRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn status_queries(&self) -> u32 {
        *self.status_queries.lock().unwrap()
    }
}

#[async_trait]
impl SummaryApi for FakeSummaries {
    async fn submit(&self, request: &SummarizationRequest) -> Result<String, BotError> {
        *self.submit_attempts.lock().unwrap() += 1;
        if self.reject_submit {
            return Err(BotError::SummaryApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }
        self.submitted.lock().unwrap().push(request.clone());
        Ok("job_abc".to_string())
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, BotError> {
        *self.status_queries.lock().unwrap() += 1;
        let entry = {
            let mut statuses = self.statuses.lock().unwrap();
            // the last scripted entry repeats forever
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            }
        };
        let status = entry
            .unwrap_or_else(|| Ok("Pending".to_string()))
            .map_err(BotError::HttpError)?;

        Ok(serde_json::from_value(json!({
            "job_name": job_id,
            "job_status": status,
            "summary_details": { "summary_id": "sum_123" }
        }))
        .unwrap())
    }

    async fn summary(&self, summary_id: &str) -> Result<SummaryResponse, BotError> {
        Ok(serde_json::from_value(json!({
            "summary_id": summary_id,
            "summary_type": "narrative",
            "summary": {
                "1": { "structured_summary": [{ "summary": "Short." }] },
                "3": {
                    "structured_summary": [{ "summary": "A bit" }, { "summary": "longer." }],
                    "context": { "next_steps": ["ship it"] }
                }
            }
        }))
        .unwrap())
    }

    async fn delete_job(&self, job_id: &str) -> Result<(), BotError> {
        self.deleted.lock().unwrap().push(job_id.to_string());
        Ok(())
    }
}

pub fn fast_poll(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(1),
        max_attempts,
    }
}

pub fn bot_with(
    chat: &Arc<FakeChat>,
    summaries: &Arc<FakeSummaries>,
    poll: PollSettings,
) -> SummaryBot {
    SummaryBot::with_clients(chat.clone(), summaries.clone(), poll)
}
