//! Drives one CV session: owns the state, dispatches messages through `update`,
//! hands effects to the engine and renders whenever the state turns dirty.

use std::io::Write;
use std::sync::{mpsc, Arc};

use cvsum_core::{update, Msg, SessionState, SessionView};
use cvsum_engine::{EngineError, JobGateway};
use cvsum_logging::{cvsum_debug, cvsum_warn};

use crate::effects::EffectRunner;
use crate::render;

pub struct Controller<W: Write> {
    state: SessionState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    out: W,
    last_line: Option<String>,
}

impl<W: Write> Controller<W> {
    pub fn new(gateway: Arc<dyn JobGateway>, out: W) -> Result<Self, EngineError> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(gateway, msg_tx)?;
        Ok(Self {
            state: SessionState::new(),
            runner,
            msg_rx,
            out,
            last_line: None,
        })
    }

    /// Applies the user's inputs in order, then processes engine messages until
    /// the session stops loading. Returns the final view.
    pub fn run(&mut self, inputs: Vec<Msg>) -> SessionView {
        for msg in inputs {
            self.dispatch(msg);
        }

        while self.state.is_loading() {
            match self.msg_rx.recv() {
                Ok(msg) => self.dispatch(msg),
                Err(_) => {
                    cvsum_warn!("Engine event channel closed while the job was running");
                    break;
                }
            }
        }
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        cvsum_logging::set_active_job(state.current_job_id());
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        self.runner.enqueue(effects);
        if was_dirty {
            self.render(&view);
        }
    }

    pub fn teardown(&mut self) {
        cvsum_debug!("Tearing down session");
        self.dispatch(Msg::Teardown);
        cvsum_logging::set_active_job(None);
    }

    fn render(&mut self, view: &SessionView) {
        let Some(line) = render::progress_line(view) else {
            return;
        };
        if self.last_line.as_ref() == Some(&line) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            cvsum_warn!("Failed to write progress: {}", err);
        }
        self.last_line = Some(line);
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}
