use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Successful `/chat` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub source_context: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReplyWire {
    answer: String,
    #[serde(default)]
    source_context: Option<Vec<String>>,
}

impl From<ChatReplyWire> for ChatReply {
    fn from(wire: ChatReplyWire) -> Self {
        Self {
            answer: wire.answer,
            source_context: wire.source_context.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatQuery<'a> {
    pub query: &'a str,
}

/// `{"status": ..., "message": ...}` body used by `/upload`, `/clear_data` and error replies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One file of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChatCompleted {
        request_id: RequestId,
        result: Result<ChatReply, RequestError>,
    },
    UploadCompleted {
        request_id: RequestId,
        result: Result<ServerMessage, RequestError>,
    },
    ClearCompleted {
        request_id: RequestId,
        result: Result<ServerMessage, RequestError>,
    },
}

impl EngineEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            EngineEvent::ChatCompleted { request_id, .. }
            | EngineEvent::UploadCompleted { request_id, .. }
            | EngineEvent::ClearCompleted { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-2xx reply; `message` is the body's `message` field if it had one.
    HttpStatus { status: u16, message: Option<String> },
    Timeout,
    Cancelled,
    /// 2xx reply whose body was not the expected JSON.
    Malformed,
    Network,
    /// A selected file could not be read.
    Io { file_name: String },
    TooLarge { max_bytes: u64, actual: u64 },
}

impl FailureKind {
    /// Failures that happen before anything is sent.
    pub fn is_local(&self) -> bool {
        matches!(self, FailureKind::Io { .. } | FailureKind::TooLarge { .. })
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io { file_name } => write!(f, "cannot read {file_name}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "upload too large (max {max_bytes}, actual {actual})")
            }
        }
    }
}
