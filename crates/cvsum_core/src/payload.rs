use serde::{Deserialize, Serialize};

/// Named event kinds emitted by the job stream.
pub const PROGRESS_EVENT: &str = "progress";
pub const RESULT_EVENT: &str = "result";
pub const FAILED_EVENT: &str = "failed";

/// Shown when job creation fails without a usable server message.
pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Failed to process CV.";

/// Identifier assigned by the server when a job is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

/// Body of a successful `POST /api/cv/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreatedResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Queued,
    #[default]
    Running,
    Completed,
    Failed,
}

/// Payload of a `progress` stream event. Each one replaces the previous progress.
/// Absent and `null` fields decode the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    pub progress: i64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub mock_mode: bool,
    pub summary: String,
    pub answers: Vec<AnswerItem>,
    pub model_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerItem {
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// Payload of a `failed` stream event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FailurePayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// A raw named event as delivered by the server-push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub kind: String,
    pub data: String,
}

impl StreamEvent {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Job creation (or synchronous summarize) failed at the transport or server level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
}

impl SubmissionError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn fallback(status: Option<u16>) -> Self {
        Self::new(status, SUBMISSION_FALLBACK_MESSAGE)
    }
}
