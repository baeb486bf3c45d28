use crate::payload::{
    FailurePayload, ProgressEvent, ResultPayload, StreamEvent, FAILED_EVENT, PROGRESS_EVENT,
    RESULT_EVENT,
};

/// Shown for a progress event that carries no message.
pub(crate) const RUNNING_FALLBACK_MESSAGE: &str = "Running inference...";
/// Shown for a `failed` event that carries no error text.
pub(crate) const FAILED_FALLBACK_MESSAGE: &str = "Inference failed.";

/// A stream event classified by kind, with its payload decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedEvent {
    Progress {
        /// Empty when the server did not say which job the event belongs to.
        job_id: String,
        progress: u8,
        message: String,
    },
    Completed(ResultPayload),
    Failed {
        message: String,
    },
    /// Event kind this client does not listen for.
    Ignored {
        kind: String,
    },
}

impl RoutedEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoutedEvent::Completed(_) | RoutedEvent::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed `{kind}` payload: {message}")]
pub struct StreamParseError {
    pub kind: String,
    pub message: String,
}

/// Classify one named event. Malformed payloads of known kinds are errors;
/// unknown kinds are ignored rather than rejected.
pub fn route(event: &StreamEvent) -> Result<RoutedEvent, StreamParseError> {
    match event.kind.as_str() {
        PROGRESS_EVENT => {
            let progress: ProgressEvent = decode(event)?;
            let message = progress
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| RUNNING_FALLBACK_MESSAGE.to_string());
            Ok(RoutedEvent::Progress {
                job_id: progress.job_id.unwrap_or_default(),
                progress: progress.progress.clamp(0, 100) as u8,
                message,
            })
        }
        RESULT_EVENT => Ok(RoutedEvent::Completed(decode(event)?)),
        FAILED_EVENT => {
            let failure: FailurePayload = decode(event)?;
            let message = failure
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| FAILED_FALLBACK_MESSAGE.to_string());
            Ok(RoutedEvent::Failed { message })
        }
        other => Ok(RoutedEvent::Ignored {
            kind: other.to_string(),
        }),
    }
}

fn decode<T: serde::de::DeserializeOwned>(event: &StreamEvent) -> Result<T, StreamParseError> {
    serde_json::from_str(&event.data).map_err(|err| StreamParseError {
        kind: event.kind.clone(),
        message: err.to_string(),
    })
}
