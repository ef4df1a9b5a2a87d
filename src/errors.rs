use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Summarization API returned {status}: {message}")]
    SummaryApiError { status: u16, message: String },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid file extension: `{extension}`\nAccepted formats: {accepted}")]
    UnsupportedFile { extension: String, accepted: String },

    #[error("Summarization timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("{0}")]
    GeneralError(String),
}

impl BotError {
    /// Text posted in the Slack thread when this error ends a request.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BotError::UnsupportedFile { .. } | BotError::GeneralError(_) => self.to_string(),
            BotError::Timeout { .. } => {
                "Summarization timed out. The job may still finish on the summarization side, \
                 please try again later."
                    .to_string()
            }
            BotError::SummaryApiError { message, .. } => {
                format!("The summarization service rejected the request: {message}")
            }
            _ => "Sorry, something went wrong while summarizing. Please try again later."
                .to_string(),
        }
    }
}

impl From<SlackClientError> for BotError {
    fn from(error: SlackClientError) -> Self {
        BotError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::GeneralError(error.to_string())
    }
}
