//! Job status tracking and the reactions that mirror it in Slack.

use chrono::{DateTime, Utc};
use std::fmt;

use super::models::{MessageRef, SummarizationRequest};

pub const EMOJI_IN_PROGRESS: &str = "hourglass_flowing_sand";
pub const EMOJI_DONE: &str = "white_check_mark";
pub const EMOJI_ERROR: &str = "x";

const EMOJI_NUMBERS: [&str; 10] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// Slack emoji name for a number between 1 and 10.
#[must_use]
pub fn number_emoji(n: u8) -> Option<&'static str> {
    usize::from(n)
        .checked_sub(1)
        .and_then(|idx| EMOJI_NUMBERS.get(idx).copied())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    /// Running with a progress step between 2 and 5.
    Running(u8),
    Done,
    Error,
}

impl JobStatus {
    /// Maps a `job_status` string reported by the summarization API.
    ///
    /// Returns `None` for statuses this bot does not know, which callers treat as "no change".
    #[must_use]
    pub fn from_remote(status: &str) -> Option<Self> {
        match status {
            "Pending" => Some(JobStatus::Pending),
            "PreparingTranscript" => Some(JobStatus::Running(2)),
            "Transcribing" => Some(JobStatus::Running(3)),
            "PreparingSummary" => Some(JobStatus::Running(4)),
            "Summarizing" => Some(JobStatus::Running(5)),
            "SummaryComplete" => Some(JobStatus::Done),
            "Error" | "Deleted" => Some(JobStatus::Error),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Reactions that represent this status on the originating message.
    #[must_use]
    pub fn reactions(self) -> Vec<&'static str> {
        match self {
            JobStatus::Pending => vec![EMOJI_IN_PROGRESS, "one"],
            JobStatus::Running(step) => {
                let mut emojis = vec![EMOJI_IN_PROGRESS];
                emojis.extend(number_emoji(step));
                emojis
            }
            JobStatus::Done => vec![EMOJI_DONE],
            JobStatus::Error => vec![EMOJI_ERROR],
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => f.write_str("pending"),
            JobStatus::Running(step) => write!(f, "running({step})"),
            JobStatus::Done => f.write_str("done"),
            JobStatus::Error => f.write_str("error"),
        }
    }
}

/// Reactions to remove and add to move a message from one status to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionDiff {
    pub remove: Vec<String>,
    pub add: Vec<String>,
}

impl ReactionDiff {
    #[must_use]
    pub fn between(current: &[String], target: &[&str]) -> Self {
        Self {
            remove: current
                .iter()
                .filter(|emoji| !target.contains(&emoji.as_str()))
                .cloned()
                .collect(),
            add: target
                .iter()
                .filter(|emoji| !current.iter().any(|c| c == *emoji))
                .map(|emoji| (*emoji).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// A dispatched summarization job and the status currently reflected in chat.
#[derive(Debug, Clone)]
pub struct Job {
    pub job_id: String,
    pub message: MessageRef,
    pub request: SummarizationRequest,
    pub status: JobStatus,
    /// Status emoji currently set on the message by this job.
    pub reactions: Vec<String>,
    pub summary_id: Option<String>,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// A freshly submitted job. Its reactions are empty until the dispatcher applies them.
    #[must_use]
    pub fn new(job_id: String, message: MessageRef, request: SummarizationRequest) -> Self {
        Self {
            job_id,
            message,
            request,
            status: JobStatus::Pending,
            reactions: Vec::new(),
            summary_id: None,
            attempts: 0,
            created_at: Utc::now(),
        }
    }

    /// Records an observed status and returns the reaction update it calls for.
    ///
    /// Observations after a terminal status are ignored and yield `None`.
    pub fn observe(&mut self, status: JobStatus) -> Option<ReactionDiff> {
        if self.status.is_terminal() {
            return None;
        }
        self.status = status;
        let target = status.reactions();
        let diff = ReactionDiff::between(&self.reactions, &target);
        self.reactions = target.into_iter().map(str::to_string).collect();
        Some(diff)
    }
}
