use super::ChatService;
use crate::models::{ChatRequest, GeminiResponse, GENESIS_AGENT};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockReply {
    Response(GeminiResponse),
    Status(StatusCode),
    Decode(String),
}

/// In-memory [`ChatService`] that replays scripted replies and records every
/// request it receives.
#[derive(Clone)]
pub struct MockChatClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: GeminiResponse) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Response(response));
        self
    }

    /// Script a non-2xx answer from the backend.
    pub fn with_status_error(self, status: StatusCode) -> Self {
        self.replies.lock().unwrap().push(MockReply::Status(status));
        self
    }

    /// Script a 2xx answer whose body cannot be decoded.
    pub fn with_decode_error(self, message: String) -> Self {
        self.replies.lock().unwrap().push(MockReply::Decode(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<GeminiResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(request.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Echo the prompt back
            return Ok(GeminiResponse {
                text: format!("Echo: {}", request.message),
                agent: GENESIS_AGENT.to_string(),
                payload: None,
            });
        }

        let index = (*count - 1) % replies.len();
        match &replies[index] {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::Status(status) => Err(Error::Status {
                status: *status,
                body: String::new(),
            }),
            MockReply::Decode(message) => Err(Error::Decode(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, AttachmentKind, FALLBACK_TEXT};

    #[tokio::test]
    async fn test_mock_chat_client_default_echo() {
        let client = MockChatClient::new();

        let response = client.generate_content("Hola", &[], None, None).await;
        assert_eq!(response.text, "Echo: Hola");
        assert_eq!(response.agent, "GENESIS");
    }

    #[tokio::test]
    async fn test_mock_chat_client_cycles_replies() {
        let client = MockChatClient::new()
            .with_response(GeminiResponse {
                text: "first".to_string(),
                agent: "GENESIS".to_string(),
                payload: None,
            })
            .with_status_error(StatusCode::BAD_GATEWAY);

        let first = client.generate_content("a", &[], None, None).await;
        assert_eq!(first.text, "first");

        let second = client.generate_content("b", &[], None, None).await;
        assert_eq!(second.text, FALLBACK_TEXT);
        assert_eq!(second.alert().unwrap().message, "HTTP error! status: 502");

        // Should cycle back
        let third = client.generate_content("c", &[], None, None).await;
        assert_eq!(third.text, "first");
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_chat_client_records_sanitized_requests() {
        let client = MockChatClient::new();
        let attachments = vec![
            Attachment {
                kind: AttachmentKind::Other,
                url: None,
                data: Some("AAAA".to_string()),
                mime_type: Some("text/plain".to_string()),
                name: None,
                size: None,
            },
            Attachment::image(Some("bar.png".to_string()), &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ];

        client
            .generate_content("Mira", &attachments, Some("s"), None)
            .await;

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].session_id, "s");
        assert_eq!(requests[0].user_id, "default-user");
        assert_eq!(requests[0].attachments.len(), 1);
        assert_eq!(requests[0].attachments[0].name.as_deref(), Some("bar.png"));
    }

    #[tokio::test]
    async fn test_mock_decode_error_becomes_fallback() {
        let client = MockChatClient::new().with_decode_error("EOF while parsing".to_string());

        let response = client.generate_content("Hola", &[], None, None).await;
        assert_eq!(response.agent, "GENESIS");
        assert!(response
            .alert()
            .unwrap()
            .message
            .contains("EOF while parsing"));
    }
}
