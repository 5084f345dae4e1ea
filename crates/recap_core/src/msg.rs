#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a summary of a video.
    Submit { video_url: String, language: String },
    /// Engine got a success status; frames follow.
    StreamStarted { job_id: crate::JobId },
    /// Engine decoded one frame from the response body.
    FrameReceived { job_id: crate::JobId, frame: String },
    /// Response body ended normally.
    StreamEnded { job_id: crate::JobId },
    /// Request rejected or connection lost.
    TransportFailed {
        job_id: crate::JobId,
        message: String,
    },
    /// User abandoned the running job.
    CancelRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
