use crate::{JobId, JobPhase, StepUpdate};

/// Status shown between submission and the first `status_message`.
pub const STATUS_INITIALIZING: &str = "Initializing process...";
/// Status shown once the stream has ended normally.
pub const STATUS_FINISHED: &str = "Process finished!";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub job_id: Option<JobId>,
    pub phase: JobPhase,
    pub loading: bool,
    pub status_line: String,
    /// Listed first so failures are never buried under successes.
    pub failed_steps: Vec<StepUpdate>,
    pub succeeded_steps: Vec<StepUpdate>,
    pub pending_steps: Vec<StepUpdate>,
    pub summary: Option<String>,
    pub transcript: Option<String>,
    /// Last frame that could not be parsed; shown alongside progress.
    pub frame_error: Option<String>,
    /// Request-level failure that ended the job.
    pub terminal_error: Option<String>,
    pub dirty: bool,
}
