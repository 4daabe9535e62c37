use std::time::Instant;

use crate::{RequestId, UploadBatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query input box.
    InputChanged(String),
    /// User pressed Send (button or Enter).
    SendClicked,
    /// User closed the file picker; an empty batch means nothing was chosen.
    FilesSelected(UploadBatch),
    /// User asked to wipe all uploaded documents and indexed data.
    ClearDataClicked,
    /// User accepted the clear-data confirmation prompt.
    ClearConfirmed,
    /// User declined the clear-data confirmation prompt.
    ClearDeclined,
    /// The `/chat` request settled.
    ChatSettled {
        request_id: RequestId,
        result: Result<ChatAnswer, RequestFailure>,
    },
    /// The `/upload` request settled; `Ok` carries the server message, if any.
    UploadSettled {
        request_id: RequestId,
        result: Result<Option<String>, RequestFailure>,
    },
    /// The `/clear_data` request settled; `Ok` carries the server message, if any.
    ClearSettled {
        request_id: RequestId,
        result: Result<Option<String>, RequestFailure>,
    },
    /// UI tick carrying the current time; drives notification expiry.
    Tick { now: Instant },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Why a request did not produce a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Non-2xx response; `message` is the server's `message` field when present.
    Http { status: u16, message: Option<String> },
    /// The deadline elapsed before the request settled.
    Timeout,
    /// Server unreachable or the response could not be understood.
    Network,
    /// The request never left the client (unreadable file, oversized batch).
    Local(String),
    /// The client shut down while the request was in flight.
    Cancelled,
}
