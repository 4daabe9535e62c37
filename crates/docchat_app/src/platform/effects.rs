use client_logging::{client_debug, client_info, client_warn};
use docchat_core::{ChatAnswer, Effect, Msg, RequestFailure};
use docchat_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, FailureKind, RequestError,
    RequestId, ServerMessage, UploadFile,
};

use super::ui::view_state::UiState;

/// Executes core effects: network work goes to the engine, picker resets to the UI.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>, ui: &mut UiState) {
        for effect in effects {
            match effect {
                Effect::SendChat { request_id, query } => {
                    client_info!("SendChat request_id={} query_len={}", request_id, query.len());
                    self.engine.send_chat(request_id, query);
                }
                Effect::UploadDocuments { request_id, batch } => {
                    let files: Vec<UploadFile> = batch
                        .files()
                        .iter()
                        .map(|file| UploadFile {
                            file_name: file.file_name.clone(),
                            path: file.path.clone(),
                        })
                        .collect();
                    client_info!("UploadDocuments request_id={} files={}", request_id, files.len());
                    self.engine.upload(request_id, files);
                }
                Effect::ClearData { request_id } => {
                    client_info!("ClearData request_id={}", request_id);
                    self.engine.clear_data(request_id);
                }
                Effect::ResetFilePicker => ui.picker.reset(),
            }
        }
    }

    /// Completed requests since the last call, as core messages.
    pub fn drain_events(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatCompleted { request_id, result } => Msg::ChatSettled {
            request_id,
            result: result
                .map(|reply| ChatAnswer {
                    answer: reply.answer,
                    sources: reply.source_context,
                })
                .map_err(|err| map_failure(request_id, err)),
        },
        EngineEvent::UploadCompleted { request_id, result } => Msg::UploadSettled {
            request_id,
            result: result
                .map(|reply| server_message(request_id, reply))
                .map_err(|err| map_failure(request_id, err)),
        },
        EngineEvent::ClearCompleted { request_id, result } => Msg::ClearSettled {
            request_id,
            result: result
                .map(|reply| server_message(request_id, reply))
                .map_err(|err| map_failure(request_id, err)),
        },
    }
}

fn server_message(request_id: RequestId, reply: ServerMessage) -> Option<String> {
    if let Some(status) = &reply.status {
        client_debug!("request {} server status={}", request_id, status);
    }
    reply.message
}

pub fn map_failure(request_id: RequestId, err: RequestError) -> RequestFailure {
    client_warn!("request {} failed: {}", request_id, err);
    match err.kind {
        FailureKind::HttpStatus { status, message } => RequestFailure::Http { status, message },
        FailureKind::Timeout => RequestFailure::Timeout,
        FailureKind::Cancelled => RequestFailure::Cancelled,
        FailureKind::Io { .. } | FailureKind::TooLarge { .. } => RequestFailure::Local(err.message),
        FailureKind::InvalidUrl | FailureKind::Malformed | FailureKind::Network => {
            RequestFailure::Network
        }
    }
}
