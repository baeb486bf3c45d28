/// A file chosen by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Validated, transport-ready job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub file: UploadFile,
    pub questions: Vec<String>,
    pub use_mock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a PDF file.")]
    MissingFile,
    #[error("The selected file is empty.")]
    EmptyFile,
    #[error("Please enter at least one question.")]
    EmptyQuestionList,
}

/// Build a request from raw form input. Performs no I/O.
pub fn build_request(
    file: Option<&UploadFile>,
    question_text: &str,
    use_mock: bool,
) -> Result<JobRequest, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;
    if file.bytes.is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    let questions = parse_questions(question_text);
    if questions.is_empty() {
        return Err(ValidationError::EmptyQuestionList);
    }

    Ok(JobRequest {
        file: file.clone(),
        questions,
        use_mock,
    })
}

/// One question per line; lines are trimmed and blank lines dropped, order kept.
pub fn parse_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

