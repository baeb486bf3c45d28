use std::sync::Once;

use cvsum_core::{
    update, Effect, Generation, JobHandle, LifecyclePhase, Msg, ResultPayload, SessionState,
    SubmissionError, UploadFile,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(cvsum_logging::initialize_for_tests);
}

fn resume() -> UploadFile {
    UploadFile::new("resume.pdf", "application/pdf", b"%PDF-1.7 fake".to_vec())
}

fn ready_state(questions: &str) -> SessionState {
    let (state, _) = update(SessionState::new(), Msg::FileSelected(Some(resume())));
    let (state, _) = update(state, Msg::QuestionsChanged(questions.to_string()));
    state
}

fn submitted_generation(effects: &[Effect]) -> Generation {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitJob { generation, .. } | Effect::Summarize { generation, .. } => {
                Some(*generation)
            }
            _ => None,
        })
        .expect("submit effect")
}

fn summary() -> ResultPayload {
    ResultPayload {
        mock_mode: false,
        summary: "Seasoned engineer".to_string(),
        answers: Vec::new(),
        model_info: "gpu-v2".to_string(),
    }
}

#[test]
fn submit_without_file_makes_no_network_call() {
    init_logging();
    let (state, _) = update(SessionState::new(), Msg::QuestionsChanged("Why?".into()));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, LifecyclePhase::Failed);
    assert!(!view.is_loading);
    assert_eq!(view.error_message.as_deref(), Some("Please choose a PDF file."));
    assert_eq!(view.current_job_id, None);
}

#[test]
fn submit_with_blank_questions_makes_no_network_call() {
    init_logging();
    let (state, effects) = update(ready_state("  \n\n"), Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(
        state.view().error_message.as_deref(),
        Some("Please enter at least one question.")
    );
    assert!(!state.is_loading());
}

#[test]
fn submit_emits_request_with_trimmed_questions() {
    init_logging();
    let state = ready_state("What is the candidate's experience?\n\n  ");
    let (mut state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::SubmitJob { generation, request } => {
            assert_eq!(*generation, 1);
            assert_eq!(
                request.questions,
                vec!["What is the candidate's experience?".to_string()]
            );
            assert!(request.use_mock);
            assert_eq!(request.file.filename, "resume.pdf");
        }
        other => panic!("unexpected effect {other:?}"),
    }

    let view = state.view();
    assert_eq!(view.phase, LifecyclePhase::Submitting);
    assert!(view.is_loading);
    assert_eq!(view.progress_message, "Submitting job...");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn use_mock_toggle_flows_into_request() {
    init_logging();
    let (state, _) = update(ready_state("Q1"), Msg::UseMockToggled(false));
    let (_, effects) = update(state, Msg::SubmitClicked);

    match &effects[0] {
        Effect::SubmitJob { request, .. } => assert!(!request.use_mock),
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn accepted_job_opens_stream() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SubmitClicked);
    let generation = submitted_generation(&effects);

    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation,
            result: Ok(JobHandle::new("job-1")),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            generation,
            job_id: "job-1".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, LifecyclePhase::Streaming);
    assert_eq!(view.current_job_id.as_deref(), Some("job-1"));
    assert!(view.stream_open);
    assert!(view.is_loading);
}

#[test]
fn rejected_submission_surfaces_server_message_without_stream() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SubmitClicked);
    let generation = submitted_generation(&effects);

    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation,
            result: Err(SubmissionError::new(Some(400), "Bad file")),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, LifecyclePhase::Failed);
    assert_eq!(view.error_message.as_deref(), Some("Bad file"));
    assert!(!view.is_loading);
    assert!(!view.stream_open);
}

#[test]
fn synchronous_summary_completes_without_stream() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SummarizeClicked);
    assert!(matches!(effects.as_slice(), [Effect::Summarize { .. }]));
    assert_eq!(state.view().progress_message, "Processing CV...");
    let generation = submitted_generation(&effects);

    let (state, effects) = update(
        state,
        Msg::SummaryReady {
            generation,
            result: Ok(summary()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, LifecyclePhase::Completed);
    assert_eq!(view.progress, 100);
    assert_eq!(view.progress_message, "Completed.");
    assert_eq!(view.result, Some(summary()));
    assert!(!view.stream_open);
}

#[test]
fn synchronous_summary_failure_uses_fallback_message() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SummarizeClicked);
    let generation = submitted_generation(&effects);

    let (state, _) = update(
        state,
        Msg::SummaryReady {
            generation,
            result: Err(SubmissionError::fallback(None)),
        },
    );

    assert_eq!(
        state.view().error_message.as_deref(),
        Some("Failed to process CV.")
    );
    assert!(!state.is_loading());
}

#[test]
fn stale_submission_response_is_ignored_after_resubmit() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SubmitClicked);
    let first = submitted_generation(&effects);
    let (state, effects) = update(state, Msg::SubmitClicked);
    let second = submitted_generation(&effects);
    assert!(second > first);

    let before = state.view();
    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation: first,
            result: Ok(JobHandle::new("abandoned")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert_eq!(state.current_job_id(), None);

    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation: second,
            result: Ok(JobHandle::new("fresh")),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            generation: second,
            job_id: "fresh".to_string(),
        }]
    );
    assert_eq!(state.current_job_id(), Some("fresh"));
}

#[test]
fn duplicate_submission_response_is_ignored() {
    init_logging();
    let (state, effects) = update(ready_state("Q1"), Msg::SubmitClicked);
    let generation = submitted_generation(&effects);
    let accepted = Msg::JobSubmitted {
        generation,
        result: Ok(JobHandle::new("job-1")),
    };

    let (state, effects) = update(state, accepted.clone());
    assert_eq!(effects.len(), 1);
    let (_, effects) = update(state, accepted);
    assert!(effects.is_empty());
}

#[test]
fn resubmit_after_failure_clears_previous_error() {
    init_logging();
    let (state, _) = update(ready_state("  "), Msg::SubmitClicked);
    assert!(state.view().error_message.is_some());

    let (state, _) = update(state, Msg::QuestionsChanged("Q1".into()));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.error_message, None);
    assert_eq!(view.result, None);
    assert_eq!(view.progress, 0);
    assert!(view.is_loading);
}
