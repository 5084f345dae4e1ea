use std::fmt;

use serde::Serialize;

pub type JobId = u64;

/// JSON body of the job-submission POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub youtube_url: String,
    pub language: String,
}

impl JobRequest {
    pub fn new(youtube_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            youtube_url: youtube_url.into(),
            language: language.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The server accepted the job; frames follow.
    StreamStarted { job_id: JobId },
    /// One complete frame, exactly as it appeared between delimiters.
    Frame { job_id: JobId, frame: String },
    /// Always the last event for a job.
    JobCompleted {
        job_id: JobId,
        result: Result<StreamSummary, TransportError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub frames: usize,
    pub bytes: u64,
    /// True when the body ended with text that had no terminating delimiter.
    pub discarded_tail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "job cancelled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    FrameTooLarge { max_bytes: usize },
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::FrameTooLarge { max_bytes } => {
                write!(f, "frame exceeds {max_bytes} bytes")
            }
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The engine's worker thread has exited; no job can be started or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine worker stopped")]
pub struct EngineStopped;
