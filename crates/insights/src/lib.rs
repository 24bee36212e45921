//! Narrative insights for the sales KPI service.
//!
//! This crate provides:
//! - `build_prompt`, the executive-summary prompt over the KPI subset
//! - `OpenAiClient`, a chat-completions client for OpenAI-compatible services
//! - `Summarizer`, which degrades to a KPI-only report when generation fails

pub mod client;
pub mod error;
pub mod prompt;
pub mod summarizer;

pub use client::{OpenAiClient, OpenAiClientConfig};
pub use error::{Result, SummarizationError};
pub use prompt::build_prompt;
pub use summarizer::{InsightGenerator, InsightReport, Summarizer};
