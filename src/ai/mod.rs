//! Gemini structured-output client.
//!
//! [`ContentGenerator`] is the seam between the typed operation and the wire:
//! [`GeminiHttpClient`] talks to the real service, [`MockContentGenerator`]
//! replays canned bodies.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiHttpClient, GenerateContentRequest, LanguageModel};
pub use mock::MockContentGenerator;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Model ID requests are sent to.
    fn model(&self) -> &str;

    /// Send one `generateContent` request and return the raw response body.
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String>;
}
