use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::llm::client::{LlmClient, Provider};

const TEMPERATURE: f32 = 0.3;

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Same body for both hosts; Ollama ignores the top-level `temperature`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    stream: bool,
    temperature: f32,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: ReplyMessage,
}

/// Send a single user prompt and return the model's reply text.
pub async fn complete(client: &LlmClient, prompt: &str) -> Result<String> {
    let provider = client.provider()?;
    let req = ChatRequest {
        model: &client.config().chat_model,
        messages: [Message {
            role: "user",
            content: prompt,
        }],
        stream: false,
        temperature: TEMPERATURE,
    };

    let content = match provider {
        Provider::Ollama => {
            let body: OllamaChatResponse = client.post_json(provider, "/api/chat", "chat", &req).await?;
            body.message.content
        }
        Provider::OpenAi => {
            let body: OpenAiChatResponse = client
                .post_json(provider, "/v1/chat/completions", "chat", &req)
                .await?;
            body.choices.into_iter().next().and_then(|c| c.message.content)
        }
    };

    let reply = content.unwrap_or_default();
    let reply = reply.trim();
    if reply.is_empty() {
        anyhow::bail!("LLM returned an empty reply");
    }
    Ok(reply.to_string())
}
