use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cvsum_core::{Generation, JobRequest};
use cvsum_logging::{cvsum_debug, cvsum_info, cvsum_warn};

use crate::{EngineEvent, JobGateway, StreamHandle, StreamSignal, StreamSink};

const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

enum EngineCommand {
    Submit {
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
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine worker: {0}")]
    Startup(#[from] io::Error),
}

/// Front door to the background worker that runs gateway calls on a tokio runtime.
///
/// The worker owns the single active progress stream: opening a stream closes
/// the previous one first, and dropping the handle closes whatever is open.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

/// Receiving side of the engine: events arrive in the order the worker produced them.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    pub fn new(gateway: Arc<dyn JobGateway>) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("cvsum-engine-rt")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("cvsum-engine".to_string())
            .spawn(move || run_worker(runtime, gateway, cmd_rx, event_tx))?;

        Ok((
            Self {
                cmd_tx,
                worker: Some(worker),
            },
            EngineEvents { event_rx },
        ))
    }

    pub fn submit(&self, generation: Generation, request: JobRequest) {
        self.send(EngineCommand::Submit {
            generation,
            request,
        });
    }

    pub fn summarize(&self, generation: Generation, request: JobRequest) {
        self.send(EngineCommand::Summarize {
            generation,
            request,
        });
    }

    pub fn open_stream(&self, generation: Generation, job_id: impl Into<String>) {
        self.send(EngineCommand::OpenStream {
            generation,
            job_id: job_id.into(),
        });
    }

    pub fn close_stream(&self, generation: Generation) {
        self.send(EngineCommand::CloseStream { generation });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            cvsum_warn!("Engine worker has stopped; dropping command");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                cvsum_warn!("Engine worker panicked during shutdown");
            }
        }
    }
}

struct ChannelStreamSink {
    generation: Generation,
    tx: mpsc::Sender<EngineEvent>,
}

impl StreamSink for ChannelStreamSink {
    fn emit(&self, signal: StreamSignal) {
        let _ = self.tx.send(EngineEvent::Stream {
            generation: self.generation,
            signal,
        });
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    gateway: Arc<dyn JobGateway>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut active: Option<(Generation, StreamHandle)> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Submit {
                generation,
                request,
            } => {
                let gateway = gateway.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = gateway.submit(&request).await;
                    let _ = event_tx.send(EngineEvent::JobSubmitted { generation, result });
                });
            }
            EngineCommand::Summarize {
                generation,
                request,
            } => {
                let gateway = gateway.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = gateway.summarize(&request).await;
                    let _ = event_tx.send(EngineEvent::SummaryReady { generation, result });
                });
            }
            EngineCommand::OpenStream { generation, job_id } => {
                if let Some((previous, mut handle)) = active.take() {
                    cvsum_debug!(
                        "Closing stream of generation {} before opening generation {}",
                        previous,
                        generation
                    );
                    handle.close();
                }
                let sink = Arc::new(ChannelStreamSink {
                    generation,
                    tx: event_tx.clone(),
                });
                let _guard = runtime.enter();
                let handle = gateway.open_stream(&job_id, sink);
                active = Some((generation, handle));
            }
            EngineCommand::CloseStream { generation } => {
                if active.as_ref().is_some_and(|(open, _)| *open == generation) {
                    if let Some((_, mut handle)) = active.take() {
                        handle.close();
                    }
                } else {
                    cvsum_debug!("No open stream for generation {}", generation);
                }
            }
            EngineCommand::Shutdown => break,
        }
    }

    if let Some((_, mut handle)) = active.take() {
        handle.close();
    }
    cvsum_info!("Engine worker stopped");
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
}
