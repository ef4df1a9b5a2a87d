//! Summarization API client module
//!
//! Submits jobs, polls their status and retrieves the finished summaries. Calls are
//! made once; there is no retry loop on top of what reqwest does itself.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use super::types::{ErrorResponse, JobStatusResponse, SubmitResponse, SummaryResponse};
use crate::core::models::{SummarizationRequest, SummarySource};
use crate::errors::BotError;

const DISPLAY_NAME: &str = "slack";
const JOB_TAGS: &str = "slack,slackbot";

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Operations the bot needs from the summarization service.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Starts a job and returns its name, which is the job id used everywhere else.
    async fn submit(&self, request: &SummarizationRequest) -> Result<String, BotError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, BotError>;

    async fn summary(&self, summary_id: &str) -> Result<SummaryResponse, BotError>;

    async fn delete_job(&self, job_id: &str) -> Result<(), BotError>;
}

pub struct WordcabClient {
    api_key: String,
    base_url: String,
    /// Bearer token the API must present when downloading Slack-hosted files.
    source_token: Option<String>,
}

impl WordcabClient {
    #[must_use]
    pub fn new(api_key: String, base_url: String, source_token: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            source_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, BotError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::SummaryApiError {
                status: status.as_u16(),
                message: error_detail(&body, what),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| BotError::ParseError(format!("{what} JSON parse error: {e}")))
    }
}

/// Query parameters describing a summarization request.
#[must_use]
pub fn submit_query(request: &SummarizationRequest) -> Vec<(&'static str, String)> {
    let options = &request.options;
    let lengths = options
        .summary_length
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let mut query = vec![
        ("display_name", DISPLAY_NAME.to_string()),
        ("tags", JOB_TAGS.to_string()),
        ("summary_type", options.summary_type.as_str().to_string()),
        ("summary_lens", lengths),
        ("source_lang", options.source_lang.code().to_string()),
        ("target_lang", options.target_lang.code().to_string()),
    ];

    if !options.context_tags.is_empty() {
        let context = options
            .context_tags
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(",");
        query.push(("context", context));
    }

    match &request.source {
        SummarySource::File { url, kind, .. } => {
            query.push(("source", kind.as_str().to_string()));
            query.push(("url", url.clone()));
        }
        SummarySource::Transcript { id } => {
            query.push(("source", "wordcab_transcript".to_string()));
            query.push(("transcript_id", id.clone()));
        }
    }

    query
}

/// JSON body for a summarization request; file sources carry the download headers.
#[must_use]
pub fn submit_body(request: &SummarizationRequest, source_token: Option<&str>) -> Value {
    match (&request.source, source_token) {
        (SummarySource::File { .. }, Some(token)) => json!({
            "url_headers": { "Authorization": format!("Bearer {token}") }
        }),
        _ => json!({}),
    }
}

fn error_detail(body: &str, what: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.detail)
        .map(|detail| match detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("{what} failed")
            } else {
                body.to_string()
            }
        })
}

#[async_trait]
impl SummaryApi for WordcabClient {
    async fn submit(&self, request: &SummarizationRequest) -> Result<String, BotError> {
        let query = submit_query(request);
        let body = submit_body(request, self.source_token.as_deref());
        info!(source = %request.source.label(), summary_type = %request.options.summary_type, "Submitting summarization job");

        let resp = HTTP_CLIENT
            .post(self.url("summarize"))
            .bearer_auth(&self.api_key)
            .query(&query)
            .json(&body)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::read_json(resp, "summarize").await?;
        Ok(submitted.job_name)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, BotError> {
        let resp = HTTP_CLIENT
            .get(self.url(&format!("jobs/{job_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status: JobStatusResponse = Self::read_json(resp, "jobs").await?;
        debug!(job_id = %job_id, job_status = %status.job_status, "Fetched job status");
        Ok(status)
    }

    async fn summary(&self, summary_id: &str) -> Result<SummaryResponse, BotError> {
        let resp = HTTP_CLIENT
            .get(self.url(&format!("summaries/{summary_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::read_json(resp, "summaries").await
    }

    async fn delete_job(&self, job_id: &str) -> Result<(), BotError> {
        let resp = HTTP_CLIENT
            .delete(self.url(&format!("jobs/{job_id}")))
            .bearer_auth(&self.api_key)
            .query(&[("warning", "false")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::SummaryApiError {
                status: status.as_u16(),
                message: error_detail(&body, "delete job"),
            });
        }
        Ok(())
    }
}
