use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use client_logging::{client_debug, client_info};
use tokio_util::sync::CancellationToken;

use crate::deadline::with_deadline;
use crate::transport::{ClientSettings, ReqwestTransport, RequestDeadlines, Transport};
use crate::{EngineEvent, RequestError, RequestId, UploadFile};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start network runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid client settings: {0}")]
    Settings(#[from] RequestError),
}

enum EngineCommand {
    Chat { request_id: RequestId, query: String },
    Upload { request_id: RequestId, files: Vec<UploadFile> },
    ClearData { request_id: RequestId },
}

/// Runs requests on a background tokio runtime and reports completions.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let transport = ReqwestTransport::new(&settings)?;
        client_info!("engine targeting {}", transport.base_url());
        Self::with_transport(Arc::new(transport), settings.deadlines())
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        deadlines: RequestDeadlines,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let transport = transport.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.clone();
                runtime.spawn(async move {
                    let event = handle_command(transport.as_ref(), deadlines, &cancel, command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            cancel,
        })
    }

    pub fn send_chat(&self, request_id: RequestId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Chat {
            request_id,
            query: query.into(),
        });
    }

    pub fn upload(&self, request_id: RequestId, files: Vec<UploadFile>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload { request_id, files });
    }

    pub fn clear_data(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::ClearData { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Cancel every in-flight request; each settles as `FailureKind::Cancelled`.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    transport: &dyn Transport,
    deadlines: RequestDeadlines,
    cancel: &CancellationToken,
    command: EngineCommand,
) -> EngineEvent {
    let started = Instant::now();
    let event = match command {
        EngineCommand::Chat { request_id, query } => {
            let result = with_deadline(deadlines.chat, cancel, transport.chat(&query)).await;
            EngineEvent::ChatCompleted { request_id, result }
        }
        EngineCommand::Upload { request_id, files } => {
            let result = with_deadline(deadlines.upload, cancel, transport.upload(&files)).await;
            EngineEvent::UploadCompleted { request_id, result }
        }
        EngineCommand::ClearData { request_id } => {
            let result = with_deadline(deadlines.clear, cancel, transport.clear_data()).await;
            EngineEvent::ClearCompleted { request_id, result }
        }
    };
    client_debug!(
        "request {} settled in {} ms ({})",
        event.request_id(),
        started.elapsed().as_millis(),
        outcome_label(&event)
    );
    event
}

fn outcome_label(event: &EngineEvent) -> String {
    let failure = match event {
        EngineEvent::ChatCompleted { result, .. } => result.as_ref().err(),
        EngineEvent::UploadCompleted { result, .. } | EngineEvent::ClearCompleted { result, .. } => {
            result.as_ref().err()
        }
    };
    match failure {
        Some(err) => err.kind.to_string(),
        None => "ok".to_string(),
    }
}
