use crate::{LifecyclePhase, ResultPayload};

/// Read-only snapshot handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub phase: LifecyclePhase,
    /// File name of the selected upload.
    pub selected_file: Option<String>,
    pub question_count: usize,
    pub use_mock: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub progress: u8,
    pub progress_message: String,
    pub current_job_id: Option<String>,
    pub result: Option<ResultPayload>,
    pub stream_open: bool,
}
