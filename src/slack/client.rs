//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the bot makes (reactions, threaded replies and
//! file uploads) with retry logic and error handling.

use async_trait::async_trait;
use slack_morphism::errors::SlackClientError;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::*;
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{debug, warn};

use super::response_builder::SummaryFile;
use crate::core::models::MessageRef;
use crate::errors::BotError;
use crate::utils::mime::upload_content_type;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a BotError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

/// Slack error codes that mean the reaction is already in the requested state.
const REACTION_NOOP_CODES: &[&str] = &["already_reacted", "no_reaction"];

/// Chat operations the bot performs on the message that started a job.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), BotError>;

    async fn remove_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), BotError>;

    async fn post_thread_message(&self, message: &MessageRef, text: &str)
    -> Result<(), BotError>;

    async fn upload_thread_file(
        &self,
        message: &MessageRef,
        file: &SummaryFile,
    ) -> Result<(), BotError>;
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, BotError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, BotError>> + Send,
        T: Send,
    {
        // 100ms, 200ms, 400ms, ... before jitter
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(5);

        Retry::start(strategy, operation).await
    }

    fn client() -> Result<&'static SlackHyperClient, BotError> {
        SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| BotError::GeneralError("Slack HTTP connector not initialized".to_string()))
    }
}

fn is_reaction_noop(error: &SlackClientError) -> bool {
    match error {
        SlackClientError::ApiError(api_error) => {
            REACTION_NOOP_CODES.contains(&api_error.code.as_str())
        }
        _ => false,
    }
}

#[async_trait]
impl ChatApi for SlackClient {
    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), BotError> {
        self.with_retry(|| async {
            let session = Self::client()?.open_session(&self.token);
            let req = SlackApiReactionsAddRequest::new(
                SlackChannelId(message.channel.clone()),
                SlackReactionName(emoji.to_string()),
                SlackTs(message.ts.clone()),
            );

            match session.reactions_add(&req).await {
                Ok(_) => Ok(()),
                Err(e) if is_reaction_noop(&e) => {
                    debug!(emoji = %emoji, message = %message, "Reaction already present");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn remove_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), BotError> {
        self.with_retry(|| async {
            let session = Self::client()?.open_session(&self.token);
            // channel and timestamp are Optional on the remove request
            let req = SlackApiReactionsRemoveRequest::new(SlackReactionName(emoji.to_string()))
                .with_channel(SlackChannelId(message.channel.clone()))
                .with_timestamp(SlackTs(message.ts.clone()));

            match session.reactions_remove(&req).await {
                Ok(_) => Ok(()),
                Err(e) if is_reaction_noop(&e) => {
                    debug!(emoji = %emoji, message = %message, "Reaction already absent");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Post a plain-text reply into the message's thread.
    async fn post_thread_message(
        &self,
        message: &MessageRef,
        text: &str,
    ) -> Result<(), BotError> {
        self.with_retry(|| async {
            let session = Self::client()?.open_session(&self.token);
            let post_req = SlackApiChatPostMessageRequest::new(
                SlackChannelId(message.channel.clone()),
                SlackMessageContent::new().with_text(text.to_string()),
            )
            .with_thread_ts(SlackTs(message.ts.clone()));

            session.chat_post_message(&post_req).await?;
            Ok(())
        })
        .await
    }

    /// Upload a text file as a threaded reply.
    ///
    /// Uses the external upload flow: request an upload URL, send the bytes, then
    /// complete the upload into the channel thread. Requires the `files:write` scope.
    async fn upload_thread_file(
        &self,
        message: &MessageRef,
        file: &SummaryFile,
    ) -> Result<(), BotError> {
        debug!(file = %file.filename, alt_text = %file.alt_text, message = %message, "Uploading summary file");
        self.with_retry(|| async {
            let session = Self::client()?.open_session(&self.token);
            let data = file.content.as_bytes().to_vec();

            let upload_url_response = session
                .get_upload_url_external(&SlackApiFilesGetUploadUrlExternalRequest::new(
                    file.filename.clone(),
                    data.len(),
                ))
                .await?;

            session
                .files_upload_via_url(&SlackApiFilesUploadViaUrlRequest::new(
                    upload_url_response.upload_url,
                    data,
                    upload_content_type(&file.filename),
                ))
                .await?;

            let file_complete = SlackApiFilesComplete::new(upload_url_response.file_id)
                .with_title(file.title.clone());
            let complete_request = SlackApiFilesCompleteUploadExternalRequest::new(vec![
                file_complete,
            ])
            .with_channel_id(SlackChannelId(message.channel.clone()))
            .with_thread_ts(SlackTs(message.ts.clone()));

            session
                .files_complete_upload_external(&complete_request)
                .await?;
            Ok(())
        })
        .await
    }
}
