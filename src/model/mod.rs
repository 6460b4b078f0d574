//! Model client module for AI inference.

mod client;

pub use client::{GeminiClient, ModelConfig, ModelError, DEFAULT_BASE_URL, DEFAULT_MODEL_NAME};
