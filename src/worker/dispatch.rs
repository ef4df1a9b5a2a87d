use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::bot::SummaryBot;
use crate::core::models::{MessageRef, SharedFile, SummarizationRequest, SummarySource};
use crate::core::params::ParsedParams;
use crate::core::status::{EMOJI_ERROR, Job, JobStatus};
use crate::errors::BotError;
use crate::utils::files::classify_file;

/// What happened to a request handed to [`dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A job was submitted; carries its id.
    Started(String),
    /// The message already has a job in flight or its request already ended,
    /// so the event was dropped.
    Duplicate,
    /// Nothing was submitted; carries the text posted to the user.
    Failed(String),
}

/// Picks what to summarize: a `transcript_id` wins over attached files, and only the
/// first file is used.
pub fn resolve_source(params: &ParsedParams, files: &[SharedFile]) -> Result<SummarySource, BotError> {
    if let Some(id) = &params.transcript_id {
        return Ok(SummarySource::Transcript { id: id.clone() });
    }

    let file = files.first().ok_or_else(|| {
        BotError::GeneralError("Attach a file or pass `transcript_id:<id>` to summarize.".to_string())
    })?;
    if files.len() > 1 {
        warn!(used = %file.name, ignored = files.len() - 1, "Multiple files shared, only the first is summarized");
    }

    let kind = classify_file(&file.name)?;
    Ok(SummarySource::File {
        url: file.url.clone(),
        name: file.name.clone(),
        kind,
    })
}

/// Submits a summarization job for `message` and registers it.
///
/// On failure the message gets a single error reaction and a threaded explanation,
/// and no job is registered. Later deliveries of the same message are dropped.
pub async fn dispatch(
    bot: &SummaryBot,
    message: &MessageRef,
    params: ParsedParams,
    files: &[SharedFile],
) -> DispatchOutcome {
    let correlation_id = Uuid::new_v4().to_string();

    if !bot.registry().claim(message).await {
        debug!(message = %message, correlation_id = %correlation_id, "Message already handled, ignoring");
        return DispatchOutcome::Duplicate;
    }

    match submit(bot, params, files).await {
        Ok((job_id, request)) => {
            info!(
                job_id = %job_id,
                message = %message,
                source = %request.source.label(),
                correlation_id = %correlation_id,
                "Summarization job started"
            );
            let flag = request.options.source_lang.flag_emoji();
            let mut job = Job::new(job_id.clone(), message.clone(), request);
            let diff = job.observe(JobStatus::Pending);
            bot.registry().insert(job).await;

            if let Err(e) = bot.chat().add_reaction(message, flag).await {
                warn!(message = %message, emoji = %flag, "Failed to add language reaction: {}", e);
            }
            if let Some(diff) = diff {
                bot.apply_reactions(message, &diff).await;
            }
            DispatchOutcome::Started(job_id)
        }
        Err(e) => {
            error!(message = %message, correlation_id = %correlation_id, "Dispatch failed: {}", e);
            bot.registry().retire(message).await;

            if let Err(e) = bot.chat().add_reaction(message, EMOJI_ERROR).await {
                warn!(message = %message, "Failed to add error reaction: {}", e);
            }
            let text = e.user_message();
            bot.reply(message, &text).await.ok();
            DispatchOutcome::Failed(text)
        }
    }
}

async fn submit(
    bot: &SummaryBot,
    params: ParsedParams,
    files: &[SharedFile],
) -> Result<(String, SummarizationRequest), BotError> {
    let source = resolve_source(&params, files)?;
    let request = SummarizationRequest {
        source,
        options: params.options,
    };
    let job_id = bot.summaries().submit(&request).await?;
    Ok((job_id, request))
}
