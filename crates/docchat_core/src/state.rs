use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::notification::{Notification, Severity};
use crate::transcript::ChatTurn;
use crate::view_model::{AppViewModel, NotificationView, TurnView};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Chat,
    Upload,
    ClearData,
}

/// The one request the client is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = file_name_of(&path);
        Self { file_name, path }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Files picked in one go; consumed by exactly one upload request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadBatch {
    files: Vec<SelectedFile>,
}

impl UploadBatch {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(paths.into_iter().map(SelectedFile::from_path).collect())
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTone {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub text: String,
    pub tone: UploadTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ClearData,
}

impl Confirmation {
    pub fn prompt(self) -> &'static str {
        match self {
            Confirmation::ClearData => {
                "Are you sure you want to clear all uploaded documents and indexed data? \
                 This action cannot be undone."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    input: String,
    transcript: Vec<ChatTurn>,
    transcript_revision: u64,
    upload_status: Option<UploadStatus>,
    pending: Option<PendingRequest>,
    confirmation: Option<Confirmation>,
    notification: Option<Notification>,
    notification_counter: u64,
    next_request_id: RequestId,
    now: Instant,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            transcript: vec![ChatTurn::greeting()],
            transcript_revision: 0,
            upload_status: None,
            pending: None,
            confirmation: None,
            notification: None,
            notification_counter: 0,
            next_request_id: 1,
            now: Instant::now(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            turns: self.transcript.iter().map(TurnView::from_turn).collect(),
            transcript_revision: self.transcript_revision,
            input: self.input.clone(),
            upload_status: self.upload_status.clone(),
            busy: self.pending.map(|pending| pending.kind),
            notification: self.notification.as_ref().map(|note| NotificationView {
                text: note.text.clone(),
                severity: note.severity,
            }),
            confirmation: self.confirmation.map(Confirmation::prompt),
            dirty: self.dirty,
        }
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn push_turn(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
        self.transcript_revision += 1;
        self.mark_dirty();
    }

    pub(crate) fn reset_transcript(&mut self) {
        self.transcript = vec![ChatTurn::greeting()];
        self.transcript_revision += 1;
        self.mark_dirty();
    }

    pub(crate) fn set_upload_status(&mut self, status: Option<UploadStatus>) {
        if self.upload_status != status {
            self.upload_status = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_request(&mut self, kind: RequestKind) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending = Some(PendingRequest { id, kind });
        self.mark_dirty();
        id
    }

    /// Clears the pending request if `id` answers it; otherwise leaves state untouched.
    pub(crate) fn settle_request(&mut self, id: RequestId, kind: RequestKind) -> bool {
        match self.pending {
            Some(pending) if pending.id == id && pending.kind == kind => {
                self.pending = None;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    pub(crate) fn set_confirmation(&mut self, confirmation: Option<Confirmation>) {
        if self.confirmation != confirmation {
            self.confirmation = confirmation;
            self.mark_dirty();
        }
    }

    pub(crate) fn notify(&mut self, text: impl Into<String>, severity: Severity) {
        self.notification_counter += 1;
        self.notification = Some(Notification::new(
            self.notification_counter,
            text,
            severity,
            self.now,
        ));
        self.mark_dirty();
    }

    pub(crate) fn advance_clock(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|note| note.is_expired(self.now));
        if expired {
            self.notification = None;
            self.mark_dirty();
        }
    }
}
