//! Upstream text generation powered by Claude API

pub mod client;
pub mod generator;

pub use client::ClaudeClient;
pub use generator::{GeneratorError, TextGenerator};
