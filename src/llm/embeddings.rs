use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CourseError;
use crate::llm::client::{LlmClient, Provider};

/// Maximum characters to send per text to the embedding API.
/// Course chunks are short; this only guards against runaway descriptions
/// exceeding the small context window of MiniLM-class models.
const MAX_EMBED_CHARS: usize = 2_000;

/// Turns texts into fixed-dimension vectors.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode a batch, one vector per input text, in input order.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CourseError>;

    /// Dimension every returned vector must have.
    fn dimension(&self) -> usize;
}

/// Encoder backed by an Ollama or OpenAI-compatible embeddings endpoint.
#[derive(Clone)]
pub struct HttpEncoder {
    client: LlmClient,
}

impl HttpEncoder {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Encoder for HttpEncoder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CourseError> {
        embed_batch(&self.client, texts)
            .await
            .map_err(|e| CourseError::embedding(format!("{e:#}")))
    }

    fn dimension(&self) -> usize {
        self.client.config().embedding_dim
    }
}

/// Encode a single text through any [`Encoder`].
pub async fn encode_one(encoder: &dyn Encoder, text: &str) -> Result<Vec<f32>, CourseError> {
    encoder
        .encode(&[text.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CourseError::embedding("no embedding returned"))
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Generate embeddings for a batch of texts using the configured LLM provider.
pub async fn embed_batch(client: &LlmClient, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let provider = client.provider()?;
    let model = client.config().embedding_model.as_str();
    let truncated: Vec<&str> = texts.iter().map(|t| truncate_for_embedding(t)).collect();

    let batch_size = match provider {
        Provider::Ollama => 32,
        Provider::OpenAi => 64,
    };
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for chunk in truncated.chunks(batch_size) {
        match provider {
            Provider::Ollama => {
                let req = OllamaEmbedRequest {
                    model,
                    input: chunk,
                    truncate: true,
                };
                let body: OllamaEmbedResponse =
                    client.post_json(provider, "/api/embed", "embed", &req).await?;
                all_embeddings.extend(body.embeddings);
            }
            Provider::OpenAi => {
                let req = OpenAiEmbedRequest { model, input: chunk };
                let body: OpenAiEmbedResponse =
                    client.post_json(provider, "/v1/embeddings", "embed", &req).await?;
                all_embeddings.extend(body.data.into_iter().map(|d| d.embedding));
            }
        }
    }

    Ok(all_embeddings)
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct OpenAiEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_for_embedding("Course: Rust"), "Course: Rust");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "é".repeat(MAX_EMBED_CHARS);
        let out = truncate_for_embedding(&text);
        assert!(out.len() <= MAX_EMBED_CHARS);
        assert!(text.is_char_boundary(out.len()));
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_skips_network() {
        let client = LlmClient::new(reqwest::Client::new(), LlmConfig::default());
        let out = embed_batch(&client, &[]).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_provider_maps_to_embedding_unavailable() {
        let config = LlmConfig {
            provider: "carrier-pigeon".into(),
            ..LlmConfig::default()
        };
        let encoder = HttpEncoder::new(LlmClient::new(reqwest::Client::new(), config));
        let err = encoder.encode(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, CourseError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn test_ollama_request_borrows_batch() {
        let input = ["Course: Rust", "Course: Go"];
        let req = OllamaEmbedRequest {
            model: "all-minilm",
            input: &input,
            truncate: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["input"], serde_json::json!(["Course: Rust", "Course: Go"]));
        assert_eq!(json["truncate"], true);
    }
}
