use crate::view_model::SessionView;
use crate::{ResultPayload, UploadFile};

/// Monotonic token identifying one submission. Completions carrying an older
/// generation belong to an abandoned job and are dropped.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Idle,
    Submitting,
    Streaming,
    Completed,
    Failed,
}

impl LifecyclePhase {
    pub fn is_loading(self) -> bool {
        matches!(self, LifecyclePhase::Submitting | LifecyclePhase::Streaming)
    }
}

/// Everything the rendering layer can observe about the current job.
/// Only `update` mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    selected_file: Option<UploadFile>,
    question_text: String,
    use_mock: bool,
    phase: LifecyclePhase,
    error_message: Option<String>,
    progress: u8,
    progress_message: String,
    current_job_id: Option<String>,
    result: Option<ResultPayload>,
    /// Generation of the open stream; the engine owns the transport handle.
    active_stream: Option<Generation>,
    generation: Generation,
    dirty: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected_file: None,
            question_text: String::new(),
            use_mock: true,
            phase: LifecyclePhase::Idle,
            error_message: None,
            progress: 0,
            progress_message: String::new(),
            current_job_id: None,
            result: None,
            active_stream: None,
            generation: 0,
            dirty: false,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            selected_file: self.selected_file.as_ref().map(|file| file.filename.clone()),
            question_count: crate::parse_questions(&self.question_text).len(),
            use_mock: self.use_mock,
            is_loading: self.phase.is_loading(),
            error_message: self.error_message.clone(),
            progress: self.progress,
            progress_message: self.progress_message.clone(),
            current_job_id: self.current_job_id.clone(),
            result: self.result.clone(),
            stream_open: self.active_stream.is_some(),
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_job_id(&self) -> Option<&str> {
        self.current_job_id.as_deref()
    }

    pub fn active_stream(&self) -> Option<Generation> {
        self.active_stream
    }

    /// Returns whether anything observable changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn selected_file(&self) -> Option<&UploadFile> {
        self.selected_file.as_ref()
    }

    pub(crate) fn question_text(&self) -> &str {
        &self.question_text
    }

    pub(crate) fn use_mock(&self) -> bool {
        self.use_mock
    }

    pub(crate) fn set_selected_file(&mut self, file: Option<UploadFile>) {
        self.selected_file = file;
        self.dirty = true;
    }

    pub(crate) fn set_question_text(&mut self, text: String) {
        self.question_text = text;
        self.dirty = true;
    }

    pub(crate) fn set_use_mock(&mut self, use_mock: bool) {
        self.use_mock = use_mock;
        self.dirty = true;
    }

    /// Starts a new generation and forgets everything about the previous job.
    /// Returns the new generation.
    pub(crate) fn begin_generation(&mut self) -> Generation {
        self.generation += 1;
        self.phase = LifecyclePhase::Idle;
        self.error_message = None;
        self.result = None;
        self.progress = 0;
        self.progress_message.clear();
        self.current_job_id = None;
        self.dirty = true;
        self.generation
    }

    /// Abandons the current generation without touching observable fields.
    pub(crate) fn retire_generation(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn enter_submitting(&mut self, message: &str) {
        self.phase = LifecyclePhase::Submitting;
        self.progress_message = message.to_string();
        self.dirty = true;
    }

    pub(crate) fn enter_streaming(&mut self, job_id: String) {
        self.phase = LifecyclePhase::Streaming;
        self.current_job_id = Some(job_id);
        self.active_stream = Some(self.generation);
        self.dirty = true;
    }

    pub(crate) fn apply_progress(&mut self, progress: u8, message: String) {
        if self.progress != progress || self.progress_message != message {
            self.progress = progress;
            self.progress_message = message;
            self.dirty = true;
        }
    }

    pub(crate) fn complete(&mut self, result: ResultPayload, message: &str) {
        self.phase = LifecyclePhase::Completed;
        self.result = Some(result);
        self.progress = 100;
        self.progress_message = message.to_string();
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.phase = LifecyclePhase::Failed;
        self.error_message = Some(message.into());
        self.dirty = true;
    }

    /// Forgets the open stream, returning its generation so the caller can close it.
    pub(crate) fn take_stream(&mut self) -> Option<Generation> {
        let stream = self.active_stream.take();
        if stream.is_some() {
            self.dirty = true;
        }
        stream
    }
}
