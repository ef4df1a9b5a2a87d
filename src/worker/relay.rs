//! Delivery of finished summaries and the final status reactions.

use tracing::{debug, error, info, warn};

use crate::bot::SummaryBot;
use crate::core::status::{Job, JobStatus};
use crate::errors::BotError;
use crate::slack::response_builder::build_summary_files;

/// Fetches the job's summary and uploads one file per summary length into the thread.
///
/// Deletes the remote job afterwards when the request was ephemeral; a failed delete
/// is only logged. Returns the number of files uploaded.
pub async fn deliver_results(bot: &SummaryBot, job: &Job) -> Result<usize, BotError> {
    let summary_id = job.summary_id.as_deref().ok_or_else(|| {
        BotError::ParseError(format!("Job {} completed without a summary_id", job.job_id))
    })?;

    let summary = bot.summaries().summary(summary_id).await?;
    let files = build_summary_files(&summary, &job.request.options.context_tags);
    if files.is_empty() {
        return Err(BotError::GeneralError(
            "The summarization service returned no summaries.".to_string(),
        ));
    }

    for file in &files {
        bot.chat().upload_thread_file(&job.message, file).await?;
    }
    info!(job_id = %job.job_id, summary_id = %summary_id, files = files.len(), "Summaries delivered");

    if job.request.options.ephemeral
        && let Err(e) = bot.summaries().delete_job(&job.job_id).await
    {
        warn!(job_id = %job.job_id, "Failed to delete ephemeral job: {}", e);
    }

    Ok(files.len())
}

/// Relays a completed job, then records the outcome.
pub(crate) async fn complete_job(bot: &SummaryBot, job_id: &str) -> JobStatus {
    let outcome = match bot.registry().get(job_id).await {
        Some(job) => deliver_results(bot, &job).await.map(|_| ()),
        None => Err(BotError::GeneralError(format!("Job {job_id} is not registered"))),
    };
    finish_job(bot, job_id, outcome).await
}

/// Moves a job to its terminal status exactly once and drops it from the registry.
///
/// `Ok` ends the job as done. An error ends it with the error reaction and the
/// error's user-facing text posted in the thread.
pub async fn finish_job(bot: &SummaryBot, job_id: &str, outcome: Result<(), BotError>) -> JobStatus {
    let status = if outcome.is_ok() {
        JobStatus::Done
    } else {
        JobStatus::Error
    };

    let update = bot
        .registry()
        .update(job_id, |job| {
            job.observe(status).map(|diff| (job.message.clone(), diff))
        })
        .await
        .flatten();

    match update {
        Some((message, diff)) => {
            bot.apply_reactions(&message, &diff).await;
            if let Err(e) = &outcome {
                error!(job_id = %job_id, message = %message, "Job failed: {}", e);
                bot.reply(&message, &e.user_message()).await.ok();
            }
        }
        None => debug!(job_id = %job_id, "Job already terminal or gone, ignoring outcome"),
    }

    bot.registry().remove(job_id).await;
    status
}
