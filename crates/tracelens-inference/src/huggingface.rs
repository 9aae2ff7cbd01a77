//! Hosted inference HTTP client.
//!
//! Uses `POST /models/{model}` with `{"inputs", "parameters"}` and reads
//! `[{"generated_text": ...}]` back.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default inference API URL.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Default text generation model.
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Upper bound on generated tokens per request.
const MAX_NEW_TOKENS: u32 = 768;

/// Hosted inference client.
#[derive(Clone)]
pub struct InferenceClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    return_full_text: bool,
    temperature: f32,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// Some deployments answer with a bare object instead of a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generation>),
    One(Generation),
}

impl InferenceClient {
    /// Create a new client with specified API key, URL and model.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text for the given prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                return_full_text: false,
                temperature: 0.3,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to inference API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API error ({}): {}", status, body);
        }

        let result: GenerationResponse = response
            .json()
            .await
            .context("Failed to parse inference response")?;

        let text = match result {
            GenerationResponse::Many(generations) => generations
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .context("Inference response contained no generations")?,
            GenerationResponse::One(generation) => generation.generated_text,
        };

        debug!(model = %self.model, chars = text.len(), "Generated text");

        Ok(text)
    }

    /// Check if the inference service is reachable and the model is loadable.
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Ok(true),
            _ => Ok(false),
        }
    }
}
