//! # TraceLens Inference
//!
//! Text generation via a Hugging Face-style hosted inference API.
//!
//! Drives the spread analysis: the hosted model is prompted for a
//! spread report and its generated text is returned verbatim.

pub mod huggingface;

pub use huggingface::{InferenceClient, DEFAULT_INFERENCE_URL, DEFAULT_MODEL};
