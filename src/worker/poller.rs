//! Per-job status polling.
//!
//! One poller runs per active job. It queries first and sleeps after, so a job
//! that finishes quickly is noticed on the first check.

use tracing::{debug, info, warn};

use super::relay::{complete_job, finish_job};
use crate::bot::SummaryBot;
use crate::core::status::JobStatus;
use crate::errors::BotError;

/// Polls `job_id` until it reaches a terminal status, then hands it to the relay.
///
/// Returns the terminal status that was reflected in chat. Query failures count as
/// attempts; running out of attempts ends the job as a timeout.
pub async fn poll_job(bot: &SummaryBot, job_id: &str) -> JobStatus {
    let settings = bot.poll_settings();
    let mut attempts: u32 = 0;

    loop {
        if attempts >= settings.max_attempts {
            warn!(job_id = %job_id, attempts, "Giving up on job");
            return finish_job(bot, job_id, Err(BotError::Timeout { attempts })).await;
        }
        attempts += 1;

        if bot
            .registry()
            .update(job_id, |job| job.attempts = attempts)
            .await
            .is_none()
        {
            warn!(job_id = %job_id, "Job no longer registered, stopping poller");
            return JobStatus::Error;
        }

        match bot.summaries().job_status(job_id).await {
            Ok(response) => match JobStatus::from_remote(&response.job_status) {
                Some(JobStatus::Done) => {
                    let summary_id = response.summary_id().map(str::to_string);
                    info!(job_id = %job_id, summary_id = ?summary_id, attempts, "Job completed");
                    bot.registry()
                        .update(job_id, |job| job.summary_id = summary_id)
                        .await;
                    return complete_job(bot, job_id).await;
                }
                Some(JobStatus::Error) => {
                    let err = BotError::GeneralError(format!(
                        "The summarization job ended with status `{}`.",
                        response.job_status
                    ));
                    return finish_job(bot, job_id, Err(err)).await;
                }
                Some(status) => observe_progress(bot, job_id, status).await,
                None => {
                    debug!(job_id = %job_id, job_status = %response.job_status, "Unknown job status, keeping previous");
                }
            },
            Err(e) => {
                warn!(job_id = %job_id, attempts, "Status query failed: {}", e);
            }
        }

        tokio::time::sleep(settings.interval).await;
    }
}

async fn observe_progress(bot: &SummaryBot, job_id: &str, status: JobStatus) {
    let update = bot
        .registry()
        .update(job_id, |job| {
            job.observe(status).map(|diff| (job.message.clone(), diff))
        })
        .await
        .flatten();

    if let Some((message, diff)) = update
        && !diff.is_empty()
    {
        debug!(job_id = %job_id, status = %status, "Updating status reactions");
        bot.apply_reactions(&message, &diff).await;
    }
}
