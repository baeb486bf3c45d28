use std::sync::Arc;
use std::time::Duration;

use cvsum_core::{JobCreatedResponse, JobHandle, JobRequest, ResultPayload, SubmissionError};
use cvsum_logging::{cvsum_debug, cvsum_info, cvsum_warn};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::stream::relay_stream;
use crate::{StreamHandle, StreamSink};

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to job creation and summarize calls; the progress stream has no overall timeout.
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid api base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Contract with the remote job service.
#[async_trait::async_trait]
pub trait JobGateway: Send + Sync {
    /// Creates a job. Issues exactly one request.
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, SubmissionError>;

    /// Runs the whole analysis in one blocking call.
    async fn summarize(&self, request: &JobRequest) -> Result<ResultPayload, SubmissionError>;

    /// Subscribes to the job's progress stream. Must be called inside a tokio runtime.
    /// Opens a new connection on every call.
    fn open_stream(&self, job_id: &str, sink: Arc<dyn StreamSink>) -> StreamHandle;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    base_url: Url,
    client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&settings.base_url).map_err(|err| GatewayError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            message: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl {
                url: settings.base_url,
                message: "url cannot carry a path".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()?;

        Ok(Self {
            base_url,
            client,
            stream_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn jobs_url(&self) -> Url {
        self.endpoint(&["api", "cv", "jobs"])
    }

    fn summarize_url(&self) -> Url {
        self.endpoint(&["api", "cv", "summarize"])
    }

    fn stream_url(&self, job_id: &str) -> Url {
        self.endpoint(&["api", "cv", "jobs", job_id, "stream"])
    }

    /// Returns the status and body of a successful response.
    async fn post_form(
        &self,
        url: Url,
        request: &JobRequest,
    ) -> Result<(u16, Vec<u8>), SubmissionError> {
        let form = build_form(request);
        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                cvsum_warn!("POST {} failed: {}", url, err);
                SubmissionError::fallback(None)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            cvsum_warn!("Reading response from {} failed: {}", url, err);
            SubmissionError::fallback(Some(status.as_u16()))
        })?;

        if !status.is_success() {
            cvsum_warn!("POST {} returned {}", url, status);
            return Err(submission_error(Some(status.as_u16()), &body));
        }
        Ok((status.as_u16(), body.to_vec()))
    }
}

#[async_trait::async_trait]
impl JobGateway for ReqwestGateway {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, SubmissionError> {
        let (status, body) = self.post_form(self.jobs_url(), request).await?;
        let created: JobCreatedResponse = serde_json::from_slice(&body).map_err(|err| {
            cvsum_warn!("Job creation returned an unreadable body: {}", err);
            SubmissionError::fallback(Some(status))
        })?;
        if created.job_id.trim().is_empty() {
            cvsum_warn!("Job creation returned an empty job id");
            return Err(SubmissionError::fallback(Some(status)));
        }
        cvsum_info!("Created job {}", created.job_id);
        Ok(JobHandle::new(created.job_id))
    }

    async fn summarize(&self, request: &JobRequest) -> Result<ResultPayload, SubmissionError> {
        let (status, body) = self.post_form(self.summarize_url(), request).await?;
        serde_json::from_slice(&body).map_err(|err| {
            cvsum_warn!("Summarize returned an unreadable body: {}", err);
            SubmissionError::fallback(Some(status))
        })
    }

    fn open_stream(&self, job_id: &str, sink: Arc<dyn StreamSink>) -> StreamHandle {
        let url = self.stream_url(job_id);
        cvsum_debug!("Opening progress stream {}", url);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(relay_stream(
            self.stream_client.clone(),
            url,
            cancel.clone(),
            sink,
        ));
        StreamHandle::with_task(job_id.to_string(), cancel, task)
    }
}

/// Multipart body: `file`, one `questions` field per question, `useMock` as "true"/"false".
fn build_form(request: &JobRequest) -> Form {
    let file = &request.file;
    let part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
    let part = match part.mime_str(&file.mime_type) {
        Ok(part) => part,
        Err(err) => {
            cvsum_debug!("Sending {} without a content type: {}", file.filename, err);
            Part::bytes(file.bytes.clone()).file_name(file.filename.clone())
        }
    };

    let form = Form::new().part("file", part);
    let form = request
        .questions
        .iter()
        .fold(form, |form, question| form.text("questions", question.clone()));
    form.text("useMock", request.use_mock.to_string())
}

/// Prefers the server's `message` (or `error.message`) field, else the generic fallback.
fn submission_error(status: Option<u16>, body: &[u8]) -> SubmissionError {
    match server_message(body) {
        Some(message) => SubmissionError::new(status, message),
        None => SubmissionError::fallback(status),
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
        })?
        .trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

