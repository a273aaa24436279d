use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::LlmConfig;

/// Supported model hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAi,
}

impl Provider {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAi),
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Provider::Ollama => "Ollama",
            Provider::OpenAi => "OpenAI",
        }
    }
}

/// HTTP client shared by chat completion and embeddings: one connection pool,
/// one place for URLs, auth and status handling.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn provider(&self) -> Result<Provider> {
        Provider::from_name(&self.config.provider)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    /// `api` names the endpoint in error messages ("chat", "embed").
    pub async fn post_json<B, R>(&self, provider: Provider, path: &str, api: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut req = self.http.post(self.url(path)).json(body);
        if let Some(key) = self.config.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to call {} {api} API", provider.label()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} {api} API returned {status}: {body}", provider.label());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse {} {api} response", provider.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::from_name("ollama").unwrap(), Provider::Ollama);
        assert_eq!(Provider::from_name("openai").unwrap(), Provider::OpenAi);
        let err = Provider::from_name("smoke-signals").unwrap_err();
        assert!(err.to_string().contains("smoke-signals"));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = LlmClient::new(
            reqwest::Client::new(),
            LlmConfig {
                base_url: "http://localhost:11434/".into(),
                ..LlmConfig::default()
            },
        );
        assert_eq!(client.url("/api/chat"), "http://localhost:11434/api/chat");
    }
}
