use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::core::config::AppConfig;
use crate::core::models::MessageRef;
use crate::core::registry::JobRegistry;
use crate::core::status::ReactionDiff;
use crate::errors::BotError;
use crate::slack::{ChatApi, SlackClient};
use crate::wordcab::{SummaryApi, WordcabClient};

/// How often and how long a job is polled before it is given up on.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
        }
    }
}

/// The bot: a chat client, a summarization client, and the jobs in flight between them.
pub struct SummaryBot {
    chat: Arc<dyn ChatApi>,
    summaries: Arc<dyn SummaryApi>,
    registry: JobRegistry,
    poll: PollSettings,
}

impl SummaryBot {
    /// Construct a `SummaryBot` backed by the real Slack and Wordcab clients.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let chat = SlackClient::new(config.slack_bot_token.clone());
        let summaries = WordcabClient::new(
            config.wordcab_api_key.clone(),
            config.wordcab_api_url.clone(),
            Some(config.slack_bot_token.clone()),
        );

        Self::with_clients(Arc::new(chat), Arc::new(summaries), PollSettings::from_config(config))
    }

    #[must_use]
    pub fn with_clients(
        chat: Arc<dyn ChatApi>,
        summaries: Arc<dyn SummaryApi>,
        poll: PollSettings,
    ) -> Self {
        Self {
            chat,
            summaries,
            registry: JobRegistry::new(),
            poll,
        }
    }

    #[must_use]
    pub fn chat(&self) -> &dyn ChatApi {
        self.chat.as_ref()
    }

    #[must_use]
    pub fn summaries(&self) -> &dyn SummaryApi {
        self.summaries.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    #[must_use]
    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    /// Brings the message's reactions in line with a status change.
    ///
    /// All removals finish before any addition starts, so the message never shows two
    /// statuses at once.
    /// Failures are logged and otherwise ignored.
    pub async fn apply_reactions(&self, message: &MessageRef, diff: &ReactionDiff) {
        let removals = diff.remove.iter().map(|emoji| async move {
            if let Err(e) = self.chat.remove_reaction(message, emoji).await {
                warn!(message = %message, emoji = %emoji, "Failed to remove reaction: {}", e);
            }
        });
        join_all(removals).await;

        let additions = diff.add.iter().map(|emoji| async move {
            if let Err(e) = self.chat.add_reaction(message, emoji).await {
                warn!(message = %message, emoji = %emoji, "Failed to add reaction: {}", e);
            }
        });
        join_all(additions).await;
    }

    /// Posts `text` in the message's thread. Failures are logged before being returned.
    pub async fn reply(&self, message: &MessageRef, text: &str) -> Result<(), BotError> {
        self.chat
            .post_thread_message(message, text)
            .await
            .inspect_err(|e| warn!(message = %message, "Failed to post thread reply: {}", e))
    }
}
