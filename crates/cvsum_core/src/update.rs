use cvsum_logging::{cvsum_debug, cvsum_info, cvsum_warn};

use crate::router::{route, RoutedEvent};
use crate::{
    build_request, Effect, Generation, LifecyclePhase, Msg, SessionState, StreamEvent,
};

pub const SUBMITTING_MESSAGE: &str = "Submitting job...";
pub const PROCESSING_MESSAGE: &str = "Processing CV...";
pub const COMPLETED_MESSAGE: &str = "Completed.";
pub const DISCONNECTED_MESSAGE: &str = "Progress stream disconnected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    /// Job creation followed by a progress stream.
    Streamed,
    /// Single blocking summarize call.
    Synchronous,
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            state.set_selected_file(file);
            Vec::new()
        }
        Msg::QuestionsChanged(text) => {
            state.set_question_text(text);
            Vec::new()
        }
        Msg::UseMockToggled(use_mock) => {
            state.set_use_mock(use_mock);
            Vec::new()
        }
        Msg::SubmitClicked => begin_submission(&mut state, Submission::Streamed),
        Msg::SummarizeClicked => begin_submission(&mut state, Submission::Synchronous),
        Msg::JobSubmitted { generation, result } => {
            if !awaiting_submission(&state, generation) {
                cvsum_debug!("Dropping stale job submission for generation {}", generation);
                return (state, Vec::new());
            }
            match result {
                Ok(handle) => {
                    cvsum_info!("Job {} accepted; opening progress stream", handle.job_id);
                    state.enter_streaming(handle.job_id.clone());
                    vec![Effect::OpenStream {
                        generation,
                        job_id: handle.job_id,
                    }]
                }
                Err(err) => {
                    cvsum_warn!("Job submission failed: status={:?} {}", err.status, err);
                    state.fail(err.message);
                    Vec::new()
                }
            }
        }
        Msg::SummaryReady { generation, result } => {
            if !awaiting_submission(&state, generation) {
                cvsum_debug!("Dropping stale summary for generation {}", generation);
                return (state, Vec::new());
            }
            match result {
                Ok(payload) => {
                    state.complete(payload, COMPLETED_MESSAGE);
                    Vec::new()
                }
                Err(err) => {
                    cvsum_warn!("Summarize failed: status={:?} {}", err.status, err);
                    state.fail(err.message);
                    Vec::new()
                }
            }
        }
        Msg::StreamEvent { generation, event } => on_stream_event(&mut state, generation, event),
        Msg::StreamError { generation, reason } => {
            on_stream_error(&mut state, generation, &reason)
        }
        Msg::Teardown => {
            state.retire_generation();
            close_stream(&mut state)
        }
    };

    (state, effects)
}

fn begin_submission(state: &mut SessionState, submission: Submission) -> Vec<Effect> {
    // Any lingering stream belongs to a job the user is abandoning.
    let mut effects = close_stream(state);
    let generation = state.begin_generation();

    let request = match build_request(
        state.selected_file(),
        state.question_text(),
        state.use_mock(),
    ) {
        Ok(request) => request,
        Err(err) => {
            cvsum_info!("Submission rejected before any network call: {}", err);
            state.fail(err.to_string());
            return effects;
        }
    };

    cvsum_info!(
        "Submitting generation {} ({:?}): file={} questions={} use_mock={}",
        generation,
        submission,
        request.file.filename,
        request.questions.len(),
        request.use_mock
    );
    match submission {
        Submission::Streamed => {
            state.enter_submitting(SUBMITTING_MESSAGE);
            effects.push(Effect::SubmitJob {
                generation,
                request,
            });
        }
        Submission::Synchronous => {
            state.enter_submitting(PROCESSING_MESSAGE);
            effects.push(Effect::Summarize {
                generation,
                request,
            });
        }
    }
    effects
}

fn on_stream_event(
    state: &mut SessionState,
    generation: Generation,
    event: StreamEvent,
) -> Vec<Effect> {
    if !owns_stream(state, generation) {
        cvsum_debug!(
            "Ignoring `{}` event from closed stream of generation {}",
            event.kind,
            generation
        );
        return Vec::new();
    }
    if state.phase() != LifecyclePhase::Streaming {
        return Vec::new();
    }

    match route(&event) {
        Ok(RoutedEvent::Progress {
            job_id,
            progress,
            message,
        }) => {
            if !job_id.is_empty() && state.current_job_id() != Some(job_id.as_str()) {
                cvsum_warn!("Ignoring progress for foreign job {}", job_id);
                return Vec::new();
            }
            state.apply_progress(progress, message);
            Vec::new()
        }
        Ok(RoutedEvent::Completed(result)) => {
            cvsum_info!("Job completed with {} answers", result.answers.len());
            state.complete(result, COMPLETED_MESSAGE);
            close_stream(state)
        }
        Ok(RoutedEvent::Failed { message }) => {
            cvsum_warn!("Job failed on the server: {}", message);
            state.fail(message);
            close_stream(state)
        }
        Ok(RoutedEvent::Ignored { kind }) => {
            cvsum_debug!("Ignoring stream event of kind `{}`", kind);
            Vec::new()
        }
        Err(err) => {
            cvsum_warn!("Treating malformed stream event as a disconnect: {}", err);
            state.fail(DISCONNECTED_MESSAGE);
            close_stream(state)
        }
    }
}

fn on_stream_error(state: &mut SessionState, generation: Generation, reason: &str) -> Vec<Effect> {
    if !owns_stream(state, generation) {
        cvsum_debug!(
            "Ignoring channel error from closed stream of generation {}: {}",
            generation,
            reason
        );
        return Vec::new();
    }
    if state.is_loading() {
        cvsum_warn!("Progress stream dropped while job was running: {}", reason);
        state.fail(DISCONNECTED_MESSAGE);
    } else {
        cvsum_debug!("Progress stream closed after terminal event: {}", reason);
    }
    close_stream(state)
}

fn awaiting_submission(state: &SessionState, generation: Generation) -> bool {
    generation == state.generation() && state.phase() == LifecyclePhase::Submitting
}

fn owns_stream(state: &SessionState, generation: Generation) -> bool {
    generation == state.generation() && state.active_stream() == Some(generation)
}

fn close_stream(state: &mut SessionState) -> Vec<Effect> {
    state
        .take_stream()
        .map(|generation| Effect::CloseStream { generation })
        .into_iter()
        .collect()
}
