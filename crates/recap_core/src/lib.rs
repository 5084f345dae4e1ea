//! Recap core: progress protocol types, the per-job reducer and the pure job
//! lifecycle state machine. No I/O happens here.
mod effect;
mod event;
mod job;
mod msg;
mod reducer;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::{
    classify_frame, FrameError, FramePayload, ProgressData, ProgressEvent, StepStatus,
    StepUpdate, DATA_PREFIX,
};
pub use job::JobState;
pub use msg::Msg;
pub use reducer::{apply, FrameOutcome};
pub use state::{AppState, JobId, JobPhase};
pub use update::{normalize_video_url, update, DEFAULT_LANGUAGE};
pub use view_model::{AppViewModel, STATUS_FINISHED, STATUS_INITIALIZING};
