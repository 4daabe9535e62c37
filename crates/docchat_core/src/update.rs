use client_logging::{client_debug, client_info, client_warn};

use crate::{
    AppState, ChatAnswer, ChatTurn, Confirmation, Effect, Msg, RequestFailure, RequestId,
    RequestKind, Severity, UploadBatch, UploadStatus, UploadTone,
};

const CHAT_ERROR_FALLBACK: &str = "Something went wrong.";
const CHAT_TIMEOUT_REPLY: &str = "The request timed out. Please try again or simplify your query.";
const CHAT_TIMEOUT_NOTICE: &str = "Chat request timed out.";
const CHAT_NETWORK_REPLY: &str = "Sorry, I could not connect to the server.";
const CHAT_NETWORK_NOTICE: &str = "Network error: Could not connect to the server.";

const UPLOAD_IN_PROGRESS: &str = "Uploading and processing...";
const UPLOAD_SUCCESS_FALLBACK: &str = "Upload complete.";
const UPLOAD_ERROR_FALLBACK: &str = "Upload failed.";
const UPLOAD_TIMEOUT: &str = "Upload timed out. File might be too large or complex.";
const UPLOAD_NETWORK: &str = "Network error during upload.";

const CLEAR_SUCCESS_FALLBACK: &str = "All data cleared.";
const CLEAR_ERROR_FALLBACK: &str = "Could not clear data.";
const CLEAR_NETWORK: &str = "Network error: Could not clear data.";

const CANCELLED: &str = "Request cancelled.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked => {
            let query = state.input().trim().to_owned();
            if query.is_empty() {
                return (state, Vec::new());
            }
            if let Some(reason) = blocked_reason(&state) {
                client_debug!("send ignored: {reason}");
                return (state, Vec::new());
            }

            state.take_input();
            state.push_turn(ChatTurn::user(query.clone()));
            let request_id = state.begin_request(RequestKind::Chat);
            client_info!("chat request {request_id} dispatched (query_len={})", query.len());
            vec![Effect::SendChat { request_id, query }]
        }
        Msg::FilesSelected(batch) => files_selected(&mut state, batch),
        Msg::ClearDataClicked => {
            if let Some(reason) = blocked_reason(&state) {
                client_debug!("clear-data ignored: {reason}");
            } else {
                state.set_confirmation(Some(Confirmation::ClearData));
            }
            Vec::new()
        }
        Msg::ClearConfirmed => {
            if state.confirmation() != Some(Confirmation::ClearData) || state.is_busy() {
                return (state, Vec::new());
            }
            state.set_confirmation(None);
            let request_id = state.begin_request(RequestKind::ClearData);
            client_info!("clear-data request {request_id} dispatched");
            vec![Effect::ClearData { request_id }]
        }
        Msg::ClearDeclined => {
            state.set_confirmation(None);
            Vec::new()
        }
        Msg::ChatSettled { request_id, result } => {
            if settle(&mut state, request_id, RequestKind::Chat) {
                apply_chat_result(&mut state, result);
            }
            Vec::new()
        }
        Msg::UploadSettled { request_id, result } => {
            if settle(&mut state, request_id, RequestKind::Upload) {
                apply_upload_result(&mut state, result);
                vec![Effect::ResetFilePicker]
            } else {
                Vec::new()
            }
        }
        Msg::ClearSettled { request_id, result } => {
            if settle(&mut state, request_id, RequestKind::ClearData) {
                apply_clear_result(&mut state, result);
            }
            Vec::new()
        }
        Msg::Tick { now } => {
            state.advance_clock(now);
            Vec::new()
        }
    };

    (state, effects)
}

fn blocked_reason(state: &AppState) -> Option<&'static str> {
    if state.is_busy() {
        Some("a request is already in flight")
    } else if state.confirmation().is_some() {
        Some("a confirmation prompt is open")
    } else {
        None
    }
}

fn files_selected(state: &mut AppState, batch: UploadBatch) -> Vec<Effect> {
    if batch.is_empty() {
        state.set_upload_status(None);
        return Vec::new();
    }
    if let Some(reason) = blocked_reason(state) {
        client_debug!("upload of {} file(s) ignored: {reason}", batch.len());
        return vec![Effect::ResetFilePicker];
    }

    state.set_upload_status(Some(UploadStatus {
        text: UPLOAD_IN_PROGRESS.to_string(),
        tone: UploadTone::Pending,
    }));
    let request_id = state.begin_request(RequestKind::Upload);
    client_info!(
        "upload request {request_id} dispatched ({} file(s))",
        batch.len()
    );
    vec![Effect::UploadDocuments { request_id, batch }]
}

fn settle(state: &mut AppState, request_id: RequestId, kind: RequestKind) -> bool {
    let settled = state.settle_request(request_id, kind);
    if !settled {
        client_warn!(
            "ignoring stale {kind:?} settlement {request_id} (pending: {:?})",
            state.pending()
        );
    }
    settled
}

fn server_text(message: Option<String>, fallback: &str) -> String {
    message
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

fn apply_chat_result(state: &mut AppState, result: Result<ChatAnswer, RequestFailure>) {
    match result {
        Ok(ChatAnswer { answer, sources }) => {
            state.push_turn(ChatTurn::bot(answer, sources));
        }
        Err(RequestFailure::Http { status, message }) => {
            let message = server_text(message, CHAT_ERROR_FALLBACK);
            client_warn!("chat failed with http status {status}: {message}");
            state.push_turn(ChatTurn::bot(format!("Error: {message}"), Vec::new()));
            state.notify(format!("Chat error: {message}"), Severity::Error);
        }
        Err(RequestFailure::Timeout) => {
            state.push_turn(ChatTurn::bot(CHAT_TIMEOUT_REPLY, Vec::new()));
            state.notify(CHAT_TIMEOUT_NOTICE, Severity::Error);
        }
        Err(RequestFailure::Network) => {
            state.push_turn(ChatTurn::bot(CHAT_NETWORK_REPLY, Vec::new()));
            state.notify(CHAT_NETWORK_NOTICE, Severity::Error);
        }
        Err(RequestFailure::Local(detail)) => {
            state.push_turn(ChatTurn::bot(format!("Error: {detail}"), Vec::new()));
            state.notify(detail, Severity::Error);
        }
        Err(RequestFailure::Cancelled) => state.notify(CANCELLED, Severity::Info),
    }
}

fn apply_upload_result(state: &mut AppState, result: Result<Option<String>, RequestFailure>) {
    let (text, tone) = match result {
        Ok(message) => (server_text(message, UPLOAD_SUCCESS_FALLBACK), UploadTone::Success),
        Err(RequestFailure::Http { status, message }) => {
            let message = server_text(message, UPLOAD_ERROR_FALLBACK);
            client_warn!("upload failed with http status {status}: {message}");
            (message, UploadTone::Error)
        }
        Err(RequestFailure::Timeout) => (UPLOAD_TIMEOUT.to_owned(), UploadTone::Error),
        Err(RequestFailure::Network) => (UPLOAD_NETWORK.to_owned(), UploadTone::Error),
        Err(RequestFailure::Local(detail)) => (detail, UploadTone::Error),
        Err(RequestFailure::Cancelled) => {
            state.set_upload_status(None);
            state.notify(CANCELLED, Severity::Info);
            return;
        }
    };

    let severity = match tone {
        UploadTone::Success => Severity::Success,
        UploadTone::Pending | UploadTone::Error => Severity::Error,
    };
    state.notify(text.clone(), severity);
    state.set_upload_status(Some(UploadStatus { text, tone }));
}

fn apply_clear_result(state: &mut AppState, result: Result<Option<String>, RequestFailure>) {
    match result {
        Ok(message) => {
            state.reset_transcript();
            state.notify(server_text(message, CLEAR_SUCCESS_FALLBACK), Severity::Success);
        }
        Err(RequestFailure::Http { status, message }) => {
            let message = server_text(message, CLEAR_ERROR_FALLBACK);
            client_warn!("clear-data failed with http status {status}: {message}");
            state.notify(message, Severity::Error);
        }
        Err(RequestFailure::Timeout | RequestFailure::Network) => {
            state.notify(CLEAR_NETWORK, Severity::Error);
        }
        Err(RequestFailure::Local(detail)) => state.notify(detail, Severity::Error),
        Err(RequestFailure::Cancelled) => state.notify(CANCELLED, Severity::Info),
    }
}
