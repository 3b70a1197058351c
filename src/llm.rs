use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;

const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

// The parser depends on this exact block shape; keep the two in sync.
const SYSTEM_PROMPT: &str = "You are a movie recommendation assistant. \
Given a description of what the user wants to watch, recommend exactly 5 movies.\n\
\n\
For every movie, output one block in this exact format and nothing else:\n\
\n\
MOVIE 1: <title>\n\
Rating: <score>/10\n\
Explanation: <one or two sentences on why it fits the request>\n\
\n\
Number the movies sequentially starting at 1. Do not use markdown, bullet \
points or any commentary outside the blocks.";

#[async_trait]
pub trait LlmApi: Send + Sync {
    /// Maps a free-text prompt to the model's free-text completion.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GROQ_API_KEY").context("GROQ_API_KEY not set")?;
        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .user_agent(format!("cinesage/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build Groq HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmApi for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Completion {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        #[derive(Deserialize)]
        struct Message {
            content: String,
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.7
        });

        let res = self
            .client
            .post(GROQ_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Groq request failed")?;

        let status = res.status();
        let bytes = res.bytes().await.context("Failed to read Groq body")?;
        if !status.is_success() {
            return Err(anyhow!(
                "Groq HTTP error (status {}): {}",
                status,
                String::from_utf8_lossy(&bytes)
            ));
        }

        let parsed: Completion =
            serde_json::from_slice(&bytes).context("Failed to parse Groq JSON")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("Groq completion has no choices"))
    }
}
