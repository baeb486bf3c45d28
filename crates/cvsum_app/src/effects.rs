use std::sync::{mpsc, Arc};
use std::thread;

use cvsum_core::{Effect, Msg};
use cvsum_engine::{EngineError, EngineEvent, EngineEvents, EngineHandle, JobGateway, StreamSignal};
use cvsum_logging::{cvsum_debug, cvsum_info};

/// Turns core effects into engine commands and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(gateway: Arc<dyn JobGateway>, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(gateway)?;
        spawn_event_loop(events, msg_tx)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    generation,
                    request,
                } => {
                    cvsum_info!(
                        "SubmitJob generation={} file={} bytes={}",
                        generation,
                        request.file.filename,
                        request.file.bytes.len()
                    );
                    self.engine.submit(generation, request);
                }
                Effect::Summarize {
                    generation,
                    request,
                } => {
                    cvsum_info!(
                        "Summarize generation={} file={}",
                        generation,
                        request.file.filename
                    );
                    self.engine.summarize(generation, request);
                }
                Effect::OpenStream { generation, job_id } => {
                    cvsum_debug!("OpenStream generation={} job={}", generation, job_id);
                    self.engine.open_stream(generation, job_id);
                }
                Effect::CloseStream { generation } => {
                    cvsum_debug!("CloseStream generation={}", generation);
                    self.engine.close_stream(generation);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) -> Result<(), EngineError> {
    thread::Builder::new()
        .name("cvsum-events".to_string())
        .spawn(move || {
            while let Some(event) = events.recv() {
                if msg_tx.send(to_msg(event)).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobSubmitted { generation, result } => Msg::JobSubmitted { generation, result },
        EngineEvent::SummaryReady { generation, result } => Msg::SummaryReady { generation, result },
        EngineEvent::Stream {
            generation,
            signal: StreamSignal::Event(event),
        } => Msg::StreamEvent { generation, event },
        EngineEvent::Stream {
            generation,
            signal: StreamSignal::Error(reason),
        } => Msg::StreamError { generation, reason },
    }
}
