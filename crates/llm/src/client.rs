use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider quota exhausted")]
    QuotaExceeded,
    #[error("provider rejected credentials")]
    InvalidCredentials,
    #[error("provider returned an empty completion")]
    Empty,
    #[error("provider request timed out")]
    Timeout,
    #[error("provider error: {0}")]
    Provider(String),
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CompletionError {
    /// The only completion-failure text an end user ever sees. Provider
    /// detail (status codes, bodies) is logged server-side instead.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "AI service temporarily unavailable. Please try again later.",
            Self::InvalidCredentials => {
                "AI service is not configured correctly. Please contact support."
            }
            Self::Empty | Self::Timeout | Self::Provider(_) | Self::Http(_) => {
                "Something went wrong generating a response. Please try again."
            }
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One completion turn: persona system prompt plus the raw user
    /// message, returning the assistant text.
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CompletionError>;
}

/// Map an HTTP status from any provider onto the shared taxonomy.
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: &str) -> CompletionError {
    match status.as_u16() {
        429 => CompletionError::QuotaExceeded,
        401 | 403 => CompletionError::InvalidCredentials,
        _ => {
            let snippet: String = body.chars().take(200).collect();
            CompletionError::Provider(format!("http {status}: {snippet}"))
        }
    }
}

pub(crate) fn error_for_transport(error: reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Http(error)
    }
}
