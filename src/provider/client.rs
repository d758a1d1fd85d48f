use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

use super::sse_parser::sse_to_text_stream;

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Connection to one OpenAI-compatible endpoint and model.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => request.header("Authorization", format!("Bearer {api_key}")),
            None => request,
        }
    }

    /// Confirms the endpoint answers and serves the configured model.
    ///
    /// An endpoint that lists no models at all is accepted as-is.
    pub async fn ensure_model(&self) -> Result<()> {
        let url = self.url("/v1/models");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model listing failed with status {status}: {body}");
        }

        let models: ModelList = response
            .json()
            .await
            .context("Failed to parse model listing")?;
        debug!(count = models.data.len(), "models listed");

        if !models.data.is_empty() && !models.data.iter().any(|m| m.id == self.model) {
            anyhow::bail!(
                "Model '{}' is not served by {}",
                self.model,
                self.endpoint
            );
        }
        Ok(())
    }

    /// Streams a chat completion for `user_text` under `system_prompt`.
    pub async fn complete_stream(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String>> + Send>>> {
        let url = self.url("/v1/chat/completions");

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Cow::Borrowed(system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: Cow::Borrowed(user_text),
                },
            ],
            stream: true,
        };

        let response = self
            .authorize(self.client.post(&url).json(&chat_request))
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {body}");
        }

        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }

    /// Runs a chat completion to the end and returns the whole reply.
    pub async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let mut stream = self.complete_stream(system_prompt, user_text).await?;
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            reply.push_str(&chunk?);
        }

        Ok(reply)
    }
}
