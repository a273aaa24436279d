//! Summarization adapter: an opaque, fallible "prompt in, text out" capability.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CourseError;
use crate::llm::chat;
use crate::llm::client::LlmClient;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate text for `prompt`; any upstream fault is a [`CourseError::Generation`].
    async fn summarize(&self, prompt: &str) -> Result<String, CourseError>;
}

/// Summarizer backed by the configured chat model.
#[derive(Clone)]
pub struct LlmSummarizer {
    client: LlmClient,
}

impl LlmSummarizer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, CourseError> {
        chat::complete(&self.client, prompt)
            .await
            .map_err(|e| CourseError::generation(format!("{e:#}")))
    }
}

/// Run one summarization call, bounded by `timeout`.
///
/// Returns `None` on failure or timeout; the caller supplies the fallback.
pub async fn attempt(summarizer: &dyn Summarizer, prompt: &str, timeout: Duration) -> Option<String> {
    match tokio::time::timeout(timeout, summarizer.summarize(prompt)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(Ok(_)) => {
            tracing::warn!("Summarizer returned empty text");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!("Summarization failed: {e}");
            None
        }
        Err(_) => {
            tracing::warn!("Summarization timed out after {timeout:?}");
            None
        }
    }
}

/// [`attempt`] with a fixed fallback string.
pub async fn best_effort(
    summarizer: &dyn Summarizer,
    prompt: &str,
    timeout: Duration,
    fallback: &str,
) -> String {
    attempt(summarizer, prompt, timeout)
        .await
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    struct Echo;

    #[async_trait]
    impl Summarizer for Echo {
        async fn summarize(&self, prompt: &str) -> Result<String, CourseError> {
            Ok(format!("  {prompt}  "))
        }
    }

    struct Broken;

    #[async_trait]
    impl Summarizer for Broken {
        async fn summarize(&self, _prompt: &str) -> Result<String, CourseError> {
            Err(CourseError::generation("quota exceeded"))
        }
    }

    struct Stalled;

    #[async_trait]
    impl Summarizer for Stalled {
        async fn summarize(&self, _prompt: &str) -> Result<String, CourseError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".into())
        }
    }

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_best_effort_returns_trimmed_text() {
        assert_eq!(best_effort(&Echo, "hello", SHORT, "fallback").await, "hello");
    }

    #[tokio::test]
    async fn test_best_effort_falls_back_on_error() {
        assert_eq!(best_effort(&Broken, "hello", SHORT, "fallback").await, "fallback");
    }

    #[tokio::test]
    async fn test_best_effort_falls_back_on_timeout() {
        assert_eq!(best_effort(&Stalled, "hello", SHORT, "fallback").await, "fallback");
    }

    #[tokio::test]
    async fn test_attempt_treats_blank_reply_as_failure() {
        assert!(attempt(&Echo, "   ", SHORT).await.is_none());
    }

    #[tokio::test]
    async fn test_llm_summarizer_maps_errors_to_generation() {
        let config = LlmConfig {
            provider: "nope".into(),
            ..LlmConfig::default()
        };
        let summarizer = LlmSummarizer::new(LlmClient::new(reqwest::Client::new(), config));
        let err = summarizer.summarize("hi").await.unwrap_err();
        assert!(matches!(err, CourseError::Generation(_)));
    }
}
