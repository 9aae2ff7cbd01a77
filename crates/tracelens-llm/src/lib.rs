//! # TraceLens LLM
//!
//! Chat completion client for OpenAI-compatible APIs.
//!
//! Used for content classification and related-content discovery.
//! Responses are requested in JSON mode and handed back as raw text;
//! callers decide how strictly to interpret them.

pub mod client;
pub mod json;

pub use client::{OpenAiClient, DEFAULT_MODEL, DEFAULT_OPENAI_URL};
pub use json::extract_json;
