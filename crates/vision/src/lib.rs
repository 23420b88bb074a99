//! OpenAI Vision classifier client.
//!
//! Sends a photographed object to an OpenAI-compatible chat-completions
//! endpoint and decodes the structured classification (title, category,
//! confidence, optional description) out of the model's free-text reply.

mod api_types;
mod classification;
mod client;
mod config;
mod error;

pub use classification::Classification;
pub use client::VisionClient;
pub use config::VisionConfig;
pub use error::VisionError;
