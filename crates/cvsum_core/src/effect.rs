use crate::{Generation, JobRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob {
        generation: Generation,
        request: JobRequest,
    },
    Summarize {
        generation: Generation,
        request: JobRequest,
    },
    OpenStream {
        generation: Generation,
        job_id: String,
    },
    CloseStream {
        generation: Generation,
    },
}
