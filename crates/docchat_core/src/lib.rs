//! Docchat core: pure chat-client state machine and view-model helpers.
mod effect;
mod msg;
mod notification;
mod state;
mod transcript;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{ChatAnswer, Msg, RequestFailure};
pub use notification::{Notification, Severity, NOTIFICATION_TTL};
pub use state::{
    AppState, Confirmation, PendingRequest, RequestId, RequestKind, SelectedFile, UploadBatch,
    UploadStatus, UploadTone,
};
pub use transcript::{sanitize_for_display, ChatTurn, Speaker, GREETING};
pub use update::update;
pub use view_model::{AppViewModel, NotificationView, TurnView};
