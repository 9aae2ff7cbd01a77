//! TraceLens Core Library
//!
//! Content provenance analysis: fetch a URL, ask upstream models whether
//! the content is AI-generated, how it spread and what is related, and
//! fall back to synthetic data wherever an upstream fails.

pub mod analysis;
pub mod config;
pub mod error;

pub use analysis::Analyzer;
pub use config::AnalyzerConfig;
pub use error::{CoreError, CoreResult};
