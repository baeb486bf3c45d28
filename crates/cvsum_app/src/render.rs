use std::fmt::Write;

use cvsum_core::{LifecyclePhase, ResultPayload, SessionView};

/// One status line for the current view, e.g. `[ 40%] Extracting text`.
pub fn progress_line(view: &SessionView) -> Option<String> {
    match view.phase {
        LifecyclePhase::Idle => None,
        LifecyclePhase::Failed => view
            .error_message
            .as_ref()
            .map(|message| format!("[fail] {message}")),
        _ => Some(format!("[{:>3}%] {}", view.progress, view.progress_message)),
    }
}

pub fn report(result: &ResultPayload) -> String {
    let mut out = String::new();
    let backend = if result.mock_mode { "mock" } else { "live" };
    let _ = writeln!(out, "Summary ({backend}, model {}):", result.model_info);
    let _ = writeln!(out, "  {}", result.summary.trim());

    for (index, item) in result.answers.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Q{}: {}", index + 1, item.question);
        let _ = writeln!(
            out,
            "A{}: {} (confidence {:.0}%)",
            index + 1,
            item.answer,
            item.confidence * 100.0
        );
        for citation in &item.citations {
            let _ = writeln!(out, "    > {citation}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsum_core::AnswerItem;
    use pretty_assertions::assert_eq;

    #[test]
    fn idle_view_renders_nothing() {
        assert_eq!(progress_line(&SessionView::default()), None);
    }

    #[test]
    fn streaming_view_shows_percentage() {
        let view = SessionView {
            phase: LifecyclePhase::Streaming,
            progress: 40,
            progress_message: "Extracting text".to_string(),
            ..SessionView::default()
        };
        assert_eq!(progress_line(&view).as_deref(), Some("[ 40%] Extracting text"));
    }

    #[test]
    fn failed_view_shows_error() {
        let view = SessionView {
            phase: LifecyclePhase::Failed,
            error_message: Some("Bad file".to_string()),
            ..SessionView::default()
        };
        assert_eq!(progress_line(&view).as_deref(), Some("[fail] Bad file"));
    }

    #[test]
    fn report_lists_answers_with_citations() {
        let result = ResultPayload {
            mock_mode: true,
            summary: "Senior backend engineer.\n".to_string(),
            answers: vec![AnswerItem {
                question: "What is the strongest skill?".to_string(),
                answer: "Java".to_string(),
                confidence: 0.91,
                citations: vec!["5 years Java development".to_string()],
            }],
            model_info: "mock-v1".to_string(),
        };

        assert_eq!(
            report(&result),
            "Summary (mock, model mock-v1):\n  Senior backend engineer.\n\n\
             Q1: What is the strongest skill?\n\
             A1: Java (confidence 91%)\n    > 5 years Java development\n"
        );
    }
}
