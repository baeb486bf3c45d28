//! CV summarizer core: pure lifecycle state machine, request shaping and stream routing.
mod effect;
mod msg;
mod payload;
mod request;
mod router;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use payload::{
    AnswerItem, FailurePayload, JobCreatedResponse, JobHandle, JobStatus, ProgressEvent,
    ResultPayload, StreamEvent, SubmissionError, FAILED_EVENT, PROGRESS_EVENT, RESULT_EVENT,
    SUBMISSION_FALLBACK_MESSAGE,
};
pub use request::{build_request, parse_questions, JobRequest, UploadFile, ValidationError};
pub use router::{route, RoutedEvent, StreamParseError};
pub use state::{Generation, LifecyclePhase, SessionState};
pub use update::{
    update, COMPLETED_MESSAGE, DISCONNECTED_MESSAGE, PROCESSING_MESSAGE, SUBMITTING_MESSAGE,
};
pub use view_model::SessionView;
