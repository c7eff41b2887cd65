//! OpenAI chat-completions client backing the `architect` tool.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::json;

/// Default endpoint for OpenAI chat completions.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model requested for architect plans.
pub const DEFAULT_MODEL: &str = "o3-mini-2025-01-31";

/// Submits one system + user exchange and returns the first choice's content.
///
/// `Ok(None)` means the request succeeded but the response carried no content
/// field; callers decide what to say in that case.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;
}

/// `CompletionClient` that talks to the OpenAI chat completions API.
pub struct OpenAiClient {
    api_key: String,
    endpoint: String,
    client: Client,
    /// Model name sent in the request body (e.g. "o3-mini-2025-01-31").
    model: String,
}

impl OpenAiClient {
    /// Create a client with an explicit endpoint (useful for tests or
    /// OpenAI-compatible proxies).
    pub fn with_endpoint(api_key: String, endpoint: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            api_key,
            endpoint,
            client,
            model,
        })
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        Box::pin(async move {
            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                anyhow::bail!("OpenAI API returned {status}: {text}");
            }

            let json: serde_json::Value = resp.json().await?;

            // Extract the assistant reply from the first choice.
            let content = json["choices"][0]["message"]["content"]
                .as_str()
                .map(|s| s.to_string());

            Ok(content)
        })
    }
}
