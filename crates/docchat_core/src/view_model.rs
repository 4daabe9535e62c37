use crate::{ChatTurn, RequestKind, Severity, Speaker, UploadStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub turns: Vec<TurnView>,
    /// Bumped whenever a turn is appended or the transcript is reset.
    pub transcript_revision: u64,
    pub input: String,
    pub upload_status: Option<UploadStatus>,
    /// `Some` while a request is in flight; drives the busy overlay.
    pub busy: Option<RequestKind>,
    pub notification: Option<NotificationView>,
    /// Prompt text of the open confirmation dialog, if any.
    pub confirmation: Option<&'static str>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub speaker: Speaker,
    pub lines: Vec<String>,
    pub sources_line: Option<String>,
}

impl TurnView {
    pub(crate) fn from_turn(turn: &ChatTurn) -> Self {
        Self {
            speaker: turn.speaker(),
            lines: turn.display_lines(),
            sources_line: turn.sources_line(),
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub text: String,
    pub severity: Severity,
}
