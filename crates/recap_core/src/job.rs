use crate::event::{ProgressEvent, StepUpdate};

/// Everything the UI shows about one job, folded from its frames.
///
/// Created empty per job and owned by whoever consumes that job's stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobState {
    pub steps: Vec<StepUpdate>,
    pub current_status: String,
    pub summary: String,
    pub transcript: String,
    /// Most recent per-frame parse failure. Never cleared within a job.
    pub error: Option<String>,
}

impl JobState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event in. Returns true when any visible field changed.
    ///
    /// `step_progress` replaces the whole list; scalar fields are replaced.
    /// Absent and empty values leave the previous value in place.
    pub fn apply_event(&mut self, event: ProgressEvent) -> bool {
        let data = event.data;
        let mut changed = false;

        if let Some(steps) = data.step_progress.filter(|steps| !steps.is_empty()) {
            if self.steps != steps {
                self.steps = steps;
                changed = true;
            }
        }
        changed |= replace_if_present(&mut self.current_status, data.status_message);
        changed |= replace_if_present(&mut self.summary, data.summary);
        changed |= replace_if_present(&mut self.transcript, data.transcript);
        changed
    }
}

fn replace_if_present(slot: &mut String, value: Option<String>) -> bool {
    match value {
        Some(value) if !value.is_empty() && *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}
