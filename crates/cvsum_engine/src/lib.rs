//! CV summarizer engine: job gateway, progress stream transport and effect execution.
mod engine;
mod gateway;
mod persist;
mod sse;
mod stream;
mod types;

pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use gateway::{GatewayError, GatewaySettings, JobGateway, ReqwestGateway};
pub use persist::{write_atomically, PersistError};
pub use sse::SseDecoder;
pub use stream::{StreamHandle, StreamSignal, StreamSink};
pub use types::EngineEvent;
