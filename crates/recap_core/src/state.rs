use crate::reducer::FrameOutcome;
use crate::view_model::{AppViewModel, STATUS_FINISHED, STATUS_INITIALIZING};
use crate::{JobState, StepStatus};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
    Streaming,
    Complete,
    Failed,
    Cancelled,
}

impl JobPhase {
    /// A request is in flight; new submissions are refused.
    pub fn is_active(self) -> bool {
        matches!(self, JobPhase::Submitting | JobPhase::Streaming)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    last_job_id: JobId,
    active_job: Option<JobId>,
    phase: JobPhase,
    job: JobState,
    terminal_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active_job
    }

    pub fn job(&self) -> &JobState {
        &self.job
    }

    pub fn terminal_error(&self) -> Option<&str> {
        self.terminal_error.as_deref()
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let status_line = match self.phase {
            JobPhase::Complete => STATUS_FINISHED.to_string(),
            JobPhase::Submitting | JobPhase::Streaming if self.job.current_status.is_empty() => {
                STATUS_INITIALIZING.to_string()
            }
            _ => self.job.current_status.clone(),
        };
        let steps_with = |status: StepStatus| {
            self.job
                .steps
                .iter()
                .filter(|step| step.status == status)
                .cloned()
                .collect::<Vec<_>>()
        };

        AppViewModel {
            job_id: self.active_job,
            phase: self.phase,
            loading: self.phase.is_active(),
            status_line,
            failed_steps: steps_with(StepStatus::Error),
            succeeded_steps: steps_with(StepStatus::Success),
            pending_steps: steps_with(StepStatus::Pending),
            summary: non_empty(&self.job.summary),
            transcript: non_empty(&self.job.transcript),
            frame_error: self.job.error.clone(),
            terminal_error: self.terminal_error.clone(),
            dirty: self.dirty,
        }
    }

    /// True when `job_id` is the current job and it is in `phase`.
    pub(crate) fn is_current(&self, job_id: JobId, phase: JobPhase) -> bool {
        self.active_job == Some(job_id) && self.phase == phase
    }

    pub(crate) fn start_job(&mut self) -> JobId {
        self.last_job_id += 1;
        let job_id = self.last_job_id;
        self.active_job = Some(job_id);
        self.phase = JobPhase::Submitting;
        self.job = JobState::new();
        self.terminal_error = None;
        self.dirty = true;
        job_id
    }

    pub(crate) fn reject_submission(&mut self, message: String) {
        self.active_job = None;
        self.phase = JobPhase::Failed;
        self.job = JobState::new();
        self.terminal_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: JobPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn apply_frame(&mut self, frame: &str) -> FrameOutcome {
        let outcome = self.job.apply_frame(frame);
        if matches!(
            outcome,
            FrameOutcome::Applied { changed: true } | FrameOutcome::Rejected
        ) {
            self.dirty = true;
        }
        outcome
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = JobPhase::Failed;
        self.terminal_error = Some(message);
        self.dirty = true;
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
