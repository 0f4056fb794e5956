use async_trait::async_trait;
use breeze_core::{ChatMessage, LLMProvider, LLMResponse, Role};
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::retry::retry_with_backoff;

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating GeminiProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the generateContent request body.
    ///
    /// System messages go to `system_instruction`; user and model
    /// messages become alternating `contents` entries in the API's
    /// role/parts format.
    fn build_request(messages: &[ChatMessage]) -> serde_json::Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(json!({ "text": msg.content })),
                Role::User => {
                    contents.push(json!({ "role": "user", "parts": [{ "text": msg.content }] }));
                }
                Role::Model => {
                    contents.push(json!({ "role": "model", "parts": [{ "text": msg.content }] }));
                }
            }
        }

        if system_parts.is_empty() {
            json!({ "contents": contents })
        } else {
            json!({
                "system_instruction": { "parts": system_parts },
                "contents": contents,
            })
        }
    }

    /// Helper method to send a single request
    async fn try_send(
        &self,
        request: &serde_json::Value,
        model: &str,
    ) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/models/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let content = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing text"))?
            .to_string();

        let usage = response["usageMetadata"].as_object().map(|u| {
            let count = |key: &str| {
                u32::try_from(u.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0))
                    .unwrap_or(0)
            };
            breeze_core::Usage {
                prompt_tokens: count("promptTokenCount"),
                completion_tokens: count("candidatesTokenCount"),
                total_tokens: count("totalTokenCount"),
            }
        });

        Ok(LLMResponse { content, usage })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = Self::build_request(messages);

        info!("Sending request to Gemini API: model={}", model);

        // Backoff schedule: 2s, 4s, 8s between attempts
        let delays: [u64; 3] = [2, 4, 8];

        let response = retry_with_backoff(|| self.try_send(&request, model), &delays).await?;

        info!("Received response from Gemini API");
        Ok(response)
    }

    fn default_model(&self) -> &'static str {
        "gemini-2.0-flash"
    }
}
