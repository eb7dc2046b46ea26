//! Data models and structures
//!
//! Defines the attachment, request, and response shapes exchanged with the
//! GENESIS chat backend, plus the widget payload union the UI renders.

use crate::mime::detect_image_mime;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const DEFAULT_SESSION_ID: &str = "default-session";
pub const DEFAULT_USER_ID: &str = "default-user";

/// Agent identity reported on synthetic responses.
pub const GENESIS_AGENT: &str = "GENESIS";

/// User-facing reply returned whenever the backend cannot be reached.
pub const FALLBACK_TEXT: &str =
    "Error de conexion con el backend. Verifica que el servidor este corriendo en localhost:8000";

/// Banner message used when the underlying error has no description.
pub const GENERIC_ERROR_MESSAGE: &str = "Connection error";

pub const ALERT_BANNER: &str = "alert-banner";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    /// Any tag the backend does not accept. Never forwarded.
    #[serde(other)]
    Other,
}

/// A file reference attached to a prompt, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64 payload without a data-URI header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Attachment {
    /// Build an image attachment from raw bytes.
    ///
    /// Bytes that are not a recognized image format get no MIME type, so the
    /// attachment is dropped before sending.
    pub fn image(name: Option<String>, bytes: &[u8]) -> Self {
        use base64::Engine as _;

        let mime_type = detect_image_mime(bytes);
        if mime_type.is_none() && !bytes.is_empty() {
            tracing::warn!(
                "Attachment {} is not a recognized image and will not be sent",
                name.as_deref().unwrap_or("<unnamed>")
            );
        }

        Self {
            kind: AttachmentKind::Image,
            url: None,
            data: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            mime_type: mime_type.map(str::to_string),
            name,
            size: Some(bytes.len() as u64),
        }
    }

    /// Read an image file from disk into an attachment.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(Self::image(name, &bytes))
    }

    /// Returns the wire form of this attachment, or `None` if it must be
    /// dropped: only images with both a payload and a MIME type are sent.
    pub fn sanitize(&self) -> Option<ImageAttachment> {
        if self.kind != AttachmentKind::Image {
            return None;
        }
        let data = self.data.as_deref().filter(|d| !d.is_empty())?;
        let mime_type = self.mime_type.as_deref().filter(|m| !m.is_empty())?;

        Some(ImageAttachment {
            kind: AttachmentKind::Image,
            data: data.to_string(),
            mime_type: mime_type.to_string(),
            name: self.name.clone(),
            size: self.size,
        })
    }
}

/// Attachment as it appears in the request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub data: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Keep the forwardable attachments, in their original order.
pub fn sanitize_attachments(attachments: &[Attachment]) -> Vec<ImageAttachment> {
    attachments.iter().filter_map(Attachment::sanitize).collect()
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub user_id: String,
    pub attachments: Vec<ImageAttachment>,
}

impl ChatRequest {
    pub fn new(
        prompt: &str,
        attachments: &[Attachment],
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Self {
        Self {
            message: prompt.to_string(),
            session_id: session_id.unwrap_or(DEFAULT_SESSION_ID).to_string(),
            user_id: user_id.unwrap_or(DEFAULT_USER_ID).to_string(),
            attachments: sanitize_attachments(attachments),
        }
    }
}

/// Reply from the backend, or the synthetic one produced on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<WidgetPayload>,
}

impl GeminiResponse {
    /// The fallback returned when a request fails for any reason.
    pub fn connection_error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            text: FALLBACK_TEXT.to_string(),
            agent: GENESIS_AGENT.to_string(),
            payload: Some(WidgetPayload::AlertBanner(AlertBanner {
                level: AlertLevel::Error,
                message,
                extra: Map::new(),
            })),
        }
    }

    pub fn alert(&self) -> Option<&AlertBanner> {
        match &self.payload {
            Some(WidgetPayload::AlertBanner(banner)) => Some(banner),
            _ => None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// UI widget attached to a reply, keyed by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPayload", into = "RawPayload")]
pub enum WidgetPayload {
    AlertBanner(AlertBanner),
    /// Any other widget (`workout-card`, `meal-plan`, ...). Props are kept as
    /// raw JSON for the renderer.
    Widget { kind: String, props: Option<Value> },
}

impl WidgetPayload {
    pub fn kind(&self) -> &str {
        match self {
            WidgetPayload::AlertBanner(_) => ALERT_BANNER,
            WidgetPayload::Widget { kind, .. } => kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    props: Option<Value>,
}

impl From<RawPayload> for WidgetPayload {
    fn from(raw: RawPayload) -> Self {
        if raw.kind == ALERT_BANNER {
            // A malformed banner is still rendered generically.
            if let Some(banner) = raw
                .props
                .as_ref()
                .and_then(|props| AlertBanner::deserialize(props).ok())
            {
                return WidgetPayload::AlertBanner(banner);
            }
        }
        WidgetPayload::Widget {
            kind: raw.kind,
            props: raw.props,
        }
    }
}

impl From<WidgetPayload> for RawPayload {
    fn from(payload: WidgetPayload) -> Self {
        match payload {
            WidgetPayload::AlertBanner(banner) => {
                let mut props = banner.extra;
                props.insert(
                    "type".to_string(),
                    Value::String(banner.level.as_str().to_string()),
                );
                props.insert("message".to_string(), Value::String(banner.message));
                RawPayload {
                    kind: ALERT_BANNER.to_string(),
                    props: Some(Value::Object(props)),
                }
            }
            WidgetPayload::Widget { kind, props } => RawPayload { kind, props },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBanner {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
    Success,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Error => "error",
            AlertLevel::Warning => "warning",
            AlertLevel::Info => "info",
            AlertLevel::Success => "success",
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub agents: Vec<String>,
    pub model: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Online,
    Offline,
}
