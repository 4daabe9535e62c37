//! Docchat engine: HTTP transport for the document server and request execution.
mod deadline;
mod engine;
mod transport;
mod types;

pub use deadline::with_deadline;
pub use engine::{EngineError, EngineHandle};
pub use transport::{
    ClientSettings, ReqwestTransport, RequestDeadlines, Transport, ACCEPTED_EXTENSIONS,
};
pub use types::{
    ChatReply, EngineEvent, FailureKind, RequestError, RequestId, ServerMessage, UploadFile,
};
