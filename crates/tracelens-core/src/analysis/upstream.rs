//! Seams to the outside world.
//!
//! Each analysis component talks to its upstream through one of these
//! traits, so the pipeline can run against the real HTTP clients or
//! against in-process stand-ins.

use anyhow::Result;
use async_trait::async_trait;
use tracelens_inference::InferenceClient;
use tracelens_llm::OpenAiClient;

/// Retrieves raw text for a URL.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// A chat model that answers in JSON.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String>;
}

/// A hosted text generation model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String> {
        self.chat_json(system, user).await
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}
