//! Chat-completion client for the analysis pipeline.
//!
//! [`OpenAiClient`] speaks the OpenAI `/chat/completions` protocol, which
//! most hosted and local providers also accept, and implements
//! [`bugfinder_core::analysis::ModelClient`].

pub mod client;
pub mod config;

pub use client::{LlmError, OpenAiClient};
pub use config::LlmConfig;
