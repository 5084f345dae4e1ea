use crate::event::{classify_frame, FramePayload, ProgressEvent};
use crate::JobState;

/// What a single frame did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Ignored,
    KeepAlive,
    Applied { changed: bool },
    /// The payload was not valid; `JobState::error` now describes it.
    Rejected,
}

/// Pure reducer: folds one decoded frame into the job state.
///
/// Frames must be applied in arrival order. A bad payload is recorded on the
/// state and never stops later frames from applying.
pub fn apply(mut state: JobState, frame: &str) -> (JobState, FrameOutcome) {
    let outcome = state.apply_frame(frame);
    (state, outcome)
}

impl JobState {
    pub fn apply_frame(&mut self, frame: &str) -> FrameOutcome {
        let json = match classify_frame(frame) {
            FramePayload::Ignored => return FrameOutcome::Ignored,
            FramePayload::KeepAlive => return FrameOutcome::KeepAlive,
            FramePayload::Data(json) => json,
        };
        match ProgressEvent::parse(json) {
            Ok(event) => FrameOutcome::Applied {
                changed: self.apply_event(event),
            },
            Err(err) => {
                self.error = Some(err.to_string());
                FrameOutcome::Rejected
            }
        }
    }
}
