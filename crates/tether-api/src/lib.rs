//! OpenAI-compatible chat completions client for tether.

mod client;
mod provider;

pub use client::ApiClient;
pub use provider::OpenAiProvider;
