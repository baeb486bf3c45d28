use crate::{Generation, JobHandle, ResultPayload, StreamEvent, SubmissionError, UploadFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a file, or cleared the selection.
    FileSelected(Option<UploadFile>),
    /// User edited the question box (one question per line).
    QuestionsChanged(String),
    /// User toggled between the mock and the real inference backend.
    UseMockToggled(bool),
    /// User asked for an asynchronous job with a progress stream.
    SubmitClicked,
    /// User asked for a one-shot synchronous summary.
    SummarizeClicked,
    /// Gateway answered the job-creation call.
    JobSubmitted {
        generation: Generation,
        result: Result<JobHandle, SubmissionError>,
    },
    /// Gateway answered the synchronous summarize call.
    SummaryReady {
        generation: Generation,
        result: Result<ResultPayload, SubmissionError>,
    },
    /// A named event arrived on the job stream.
    StreamEvent {
        generation: Generation,
        event: StreamEvent,
    },
    /// The job stream reported a transport-level error or was closed by the server.
    StreamError {
        generation: Generation,
        reason: String,
    },
    /// The controller is shutting down.
    Teardown,
}
