//! Chat backend integration
//!
//! Sends prompts (with optional image attachments) to the GENESIS backend and
//! normalizes every outcome into a [`GeminiResponse`], so callers never branch
//! on success versus failure.

pub mod client;
pub mod mock;

pub use client::GenesisClient;
pub use mock::MockChatClient;

use crate::models::{Attachment, ChatRequest, GeminiResponse};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Perform exactly one round trip for `request`.
    async fn send_chat(&self, request: &ChatRequest) -> Result<GeminiResponse>;

    /// Sanitize inputs, send once, and fold any failure into the fallback
    /// response. Never returns an error.
    async fn generate_content(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> GeminiResponse {
        let request = ChatRequest::new(prompt, attachments, session_id, user_id);

        match self.send_chat(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Backend API failure: {}", e);
                GeminiResponse::connection_error(e.to_string())
            }
        }
    }
}
