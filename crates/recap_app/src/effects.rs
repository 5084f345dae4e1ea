use std::time::Duration;

use recap_core::{Effect, JobId, Msg};
use recap_engine::{
    ClientSettings, EngineEvent, EngineHandle, EngineStopped, FailureKind, JobRequest,
};
use recap_logging::{recap_error, recap_info, recap_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> std::io::Result<Self> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Runs `effects` and returns the messages they produce right away.
    ///
    /// A submit the engine can no longer accept fails its job here instead of
    /// leaving it waiting for events that will never come.
    pub fn apply(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    job_id,
                    video_url,
                    language,
                } => {
                    recap_info!("SubmitJob job_id={} url={}", job_id, video_url);
                    if let Err(err) = self
                        .engine
                        .submit(job_id, JobRequest::new(video_url, language))
                    {
                        follow_up.push(stopped_msg(Some(job_id), err));
                    }
                }
                Effect::CancelJob { job_id } => {
                    recap_info!("CancelJob job_id={}", job_id);
                    // The job is already marked cancelled; nothing is left to stop.
                    let _ = self.engine.cancel(job_id);
                }
            }
        }
        follow_up
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

/// Message for the active job once the engine has stopped.
pub fn stopped_msg(active_job: Option<JobId>, err: EngineStopped) -> Msg {
    recap_error!("{}", err);
    match active_job {
        Some(job_id) => Msg::TransportFailed {
            job_id,
            message: err.to_string(),
        },
        None => Msg::NoOp,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StreamStarted { job_id } => Msg::StreamStarted { job_id },
        EngineEvent::Frame { job_id, frame } => Msg::FrameReceived { job_id, frame },
        EngineEvent::JobCompleted {
            job_id,
            result: Ok(summary),
        } => {
            if summary.discarded_tail {
                recap_warn!("Job {} ended with an unterminated frame", job_id);
            }
            Msg::StreamEnded { job_id }
        }
        EngineEvent::JobCompleted {
            job_id,
            result: Err(err),
        } => {
            recap_warn!("Job {} failed: {}", job_id, err);
            // The server's `detail` is already user-facing; other failures get their kind.
            let message = match err.kind {
                FailureKind::HttpStatus(_) => err.message,
                _ => err.to_string(),
            };
            Msg::TransportFailed { job_id, message }
        }
    }
}
