use crate::{RequestId, UploadBatch};

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendChat { request_id: RequestId, query: String },
    UploadDocuments { request_id: RequestId, batch: UploadBatch },
    ClearData { request_id: RequestId },
    /// Empty the file picker so the same files can be selected again.
    ResetFilePicker,
}
