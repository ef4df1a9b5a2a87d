//! Wire types returned by the summarization API.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Response to `POST /summarize`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub job_name: String,
}

/// Response to `GET /jobs/{job_name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub job_name: String,
    pub job_status: String,
    #[serde(default)]
    pub summary_details: Option<SummaryDetails>,
}

impl JobStatusResponse {
    #[must_use]
    pub fn summary_id(&self) -> Option<&str> {
        self.summary_details
            .as_ref()
            .and_then(|d| d.summary_id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryDetails {
    #[serde(default)]
    pub summary_id: Option<String>,
}

/// Response to `GET /summaries/{summary_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    pub summary_id: String,
    pub summary_type: String,
    /// One entry per requested summary length, keyed by the length.
    #[serde(default)]
    pub summary: BTreeMap<String, SummaryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryEntry {
    #[serde(default)]
    pub structured_summary: Vec<StructuredSummary>,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, Value>>,
}

/// One section of a summary. Plain text for most summary types, an object with
/// `title` and `brief_summary` for brief summaries.
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredSummary {
    #[serde(default)]
    pub summary: Value,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parsing() {
        let json_str = r#"{"job_name": "job_abc", "job_status": "SummaryComplete", "summary_details": {"summary_id": "sum_123"}}"#;
        let resp: JobStatusResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(resp.job_status, "SummaryComplete");
        assert_eq!(resp.summary_id(), Some("sum_123"));
    }

    #[test]
    fn test_job_status_without_details() {
        let json_str = r#"{"job_name": "job_abc", "job_status": "Transcribing"}"#;
        let resp: JobStatusResponse = serde_json::from_str(json_str).unwrap();
        assert!(resp.summary_id().is_none());
    }

    #[test]
    fn test_summary_parsing_orders_lengths() {
        let json_str = r#"{
            "summary_id": "sum_123",
            "summary_type": "narrative",
            "summary": {
                "5": {"structured_summary": [{"summary": "Long."}]},
                "1": {"structured_summary": [{"summary": "Short."}], "context": {"issue": "none"}}
            }
        }"#;
        let resp: SummaryResponse = serde_json::from_str(json_str).unwrap();
        let keys: Vec<&str> = resp.summary.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "5"]);
        assert!(resp.summary["1"].context.is_some());
        assert!(resp.summary["5"].context.is_none());
    }
}
