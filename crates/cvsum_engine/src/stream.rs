use std::sync::Arc;

use cvsum_core::StreamEvent;
use cvsum_logging::{cvsum_debug, cvsum_trace};
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::SseDecoder;

/// What a progress stream delivers: named events, then at most one channel error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Event(StreamEvent),
    /// Transport failure, non-success status, or the server ending the stream.
    Error(String),
}

pub trait StreamSink: Send + Sync {
    fn emit(&self, signal: StreamSignal);
}

/// Subscription to one job's progress stream.
///
/// `close` is idempotent and also runs on drop. Once closed, the sink receives
/// nothing further from this handle.
#[derive(Debug)]
pub struct StreamHandle {
    job_id: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// A handle whose delivery is driven by someone else observing `cancel`.
    pub fn detached(job_id: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            job_id: job_id.into(),
            cancel,
            task: None,
        }
    }

    pub(crate) fn with_task(job_id: String, cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            job_id,
            cancel,
            task: Some(task),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn close(&mut self) {
        if !self.cancel.is_cancelled() {
            cvsum_debug!("Closing progress stream for job {}", self.job_id);
        }
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn deliver(cancel: &CancellationToken, sink: &dyn StreamSink, signal: StreamSignal) {
    if !cancel.is_cancelled() {
        sink.emit(signal);
    }
}

/// Reads the event stream at `url` until it ends, fails, or `cancel` fires.
pub(crate) async fn relay_stream(
    client: reqwest::Client,
    url: reqwest::Url,
    cancel: CancellationToken,
    sink: Arc<dyn StreamSink>,
) {
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        response = client.get(url.clone()).header(ACCEPT, "text/event-stream").send() => response,
    };
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            deliver(
                &cancel,
                sink.as_ref(),
                StreamSignal::Error(format!("stream request failed: {err}")),
            );
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        deliver(
            &cancel,
            sink.as_ref(),
            StreamSignal::Error(format!("stream failed with status {status}")),
        );
        return;
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            chunk = body.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => {
                for event in decoder.feed(&bytes) {
                    cvsum_trace!("Stream {} delivered `{}` event", url, event.kind);
                    deliver(&cancel, sink.as_ref(), StreamSignal::Event(event));
                }
            }
            Some(Err(err)) => {
                deliver(
                    &cancel,
                    sink.as_ref(),
                    StreamSignal::Error(format!("stream read failed: {err}")),
                );
                return;
            }
            None => {
                deliver(
                    &cancel,
                    sink.as_ref(),
                    StreamSignal::Error("stream closed by server".to_string()),
                );
                return;
            }
        }
    }
}
