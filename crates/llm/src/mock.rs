//! Scripted completion client for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::{CompletionClient, CompletionError};

/// Queue-driven test double: each `complete` call pops the next scripted
/// result and records the prompts it received. An empty queue fails the
/// call, which keeps over-calling visible in tests.
#[derive(Default)]
pub struct MockCompletionClient {
    scripts: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enqueue_ok(&self, text: impl Into<String>) {
        self.scripts.lock().await.push_back(Ok(text.into()));
    }

    pub async fn enqueue_err(&self, error: CompletionError) {
        self.scripts.lock().await.push_back(Err(error));
    }

    /// `(system_prompt, user_text)` pairs in call order.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CompletionError> {
        self.calls.lock().await.push((system_prompt.to_owned(), user_text.to_owned()));
        self.scripts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Provider("mock script exhausted".to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::MockCompletionClient;
    use crate::client::{CompletionClient, CompletionError};

    #[tokio::test]
    async fn scripted_results_pop_in_order() {
        let mock = MockCompletionClient::new();
        mock.enqueue_ok("first").await;
        mock.enqueue_err(CompletionError::QuotaExceeded).await;

        assert_eq!(mock.complete("sys", "one").await.unwrap(), "first");
        assert!(matches!(
            mock.complete("sys", "two").await,
            Err(CompletionError::QuotaExceeded)
        ));

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, "one");
    }

    #[tokio::test]
    async fn exhausted_script_fails_loudly() {
        let mock = MockCompletionClient::new();
        assert!(mock.complete("sys", "text").await.is_err());
    }
}
