//! Recap engine: job submission, response streaming and frame decoding.
mod client;
mod decode;
mod engine;
mod types;

pub use client::{
    ChannelEventSink, ClientSettings, EventSink, ReqwestTransport, Transport,
    GENERIC_REQUEST_ERROR,
};
pub use decode::{FrameDecoder, FRAME_DELIMITER};
pub use engine::EngineHandle;
pub use types::{
    EngineEvent, EngineStopped, FailureKind, JobId, JobRequest, StreamSummary, TransportError,
};
