//! HTTP client for an OpenAI-compatible API (`/chat/completions` and
//! `/images/generations`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::{AiClient, AiError};
use crate::config::AiConfig;

const RECIPE_SYSTEM_PROMPT: &str = "You are a pediatric nutrition assistant. \
Reply with a JSON array of recipe objects only, no prose. Each object has: \
title, description, ingredients (array of {item, quantity, unit}), instructions \
(array of strings), nutritional_info ({calories, protein_g, carbs_g, fat_g, fiber_g}), \
meal_type, difficulty, prep_time_minutes, health_benefits, allergens, min_age, max_age.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You help parents use up leftovers. \
Suggest child-friendly meals and point out anything that should be eaten soon.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: AiConfig,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, AiError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AiError::MissingApiKey)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<T, R>(&self, path: &str, payload: &T) -> Result<R, AiError>
    where
        T: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let api_key = self.api_key()?;
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!("AI service error {} from {}: {}", status, url, body);
            return Err(AiError::Api { status, body });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    async fn chat(&self, messages: Vec<ChatMessage>, temperature: Option<f32>) -> Result<String, AiError> {
        let request = ChatCompletionRequest {
            model: &self.config.text_model,
            messages,
            temperature,
        };
        let response: ChatCompletionResponse = self.post_json("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AiError::InvalidResponse("completion has no content".to_string()))
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn complete_recipes(&self, prompt: &str) -> Result<String, AiError> {
        info!("Requesting recipes from model {}", self.config.text_model);
        let messages = vec![
            ChatMessage { role: "system", content: json!(RECIPE_SYSTEM_PROMPT) },
            ChatMessage { role: "user", content: json!(prompt) },
        ];
        self.chat(messages, Some(0.7)).await
    }

    async fn analyze_leftovers(&self, prompt: &str, photo_urls: &[String]) -> Result<String, AiError> {
        info!("Requesting leftover analysis with {} photos", photo_urls.len());
        let mut parts = vec![json!({ "type": "text", "text": prompt })];
        parts.extend(
            photo_urls
                .iter()
                .map(|url| json!({ "type": "image_url", "image_url": { "url": url } })),
        );
        let messages = vec![
            ChatMessage { role: "system", content: json!(ANALYSIS_SYSTEM_PROMPT) },
            ChatMessage { role: "user", content: Value::Array(parts) },
        ];
        self.chat(messages, None).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, AiError> {
        let Some(model) = self.config.image_model.as_deref() else {
            return Ok(None);
        };
        let request = ImageGenerationRequest {
            model,
            prompt,
            n: 1,
            size: "1024x1024",
        };
        let response: ImageGenerationResponse = self.post_json("images/generations", &request).await?;
        Ok(response.data.into_iter().find_map(|image| image.url))
    }
}
