use cvsum_core::{Generation, JobHandle, ResultPayload, SubmissionError};

use crate::StreamSignal;

/// Outcome of an engine command, tagged with the generation it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobSubmitted {
        generation: Generation,
        result: Result<JobHandle, SubmissionError>,
    },
    SummaryReady {
        generation: Generation,
        result: Result<ResultPayload, SubmissionError>,
    },
    Stream {
        generation: Generation,
        signal: StreamSignal,
    },
}
