//! Provider trait for chat completion backends.

use crate::error::ApiError;
use crate::message::{ChatRequest, ChatResponse};
use std::future::Future;
use std::pin::Pin;

/// A chat-completion backend.
///
/// One blocking round-trip per call — no streaming, no retries. Dyn-compatible
/// so the orchestrator works with `Arc<dyn Provider>` and tests can script
/// responses.
pub trait Provider: Send + Sync {
    /// Send a completion request and wait for the full response.
    fn complete<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatResponse, ApiError>> + Send + 'a>>;

    /// Provider name for logging/display.
    fn name(&self) -> &str;
}
