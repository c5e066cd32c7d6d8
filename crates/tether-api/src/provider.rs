//! Provider implementation over the completions client.

use crate::client::ApiClient;
use std::future::Future;
use std::pin::Pin;
use tether_types::provider::Provider;
use tether_types::{ApiError, ChatRequest, ChatResponse};

/// OpenAI-dialect completions provider.
///
/// Wraps `ApiClient` and implements the `Provider` seam, delegating the
/// round-trip to the underlying client.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ApiClient,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(api_key, base_url)?,
        })
    }
}

impl Provider for OpenAiProvider {
    fn complete<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatResponse, ApiError>> + Send + 'a>> {
        Box::pin(self.client.complete(request))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
