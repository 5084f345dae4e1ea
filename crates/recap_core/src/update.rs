use url::Url;

use crate::{AppState, Effect, JobPhase, Msg};

/// Language sent when the user leaves the field blank.
pub const DEFAULT_LANGUAGE: &str = "english";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submit {
            video_url,
            language,
        } => {
            // One job at a time; a second submit while loading is dropped.
            if state.phase().is_active() || video_url.trim().is_empty() {
                return (state, Vec::new());
            }
            match normalize_video_url(&video_url) {
                Ok(video_url) => {
                    let job_id = state.start_job();
                    vec![Effect::SubmitJob {
                        job_id,
                        video_url,
                        language: normalize_language(&language),
                    }]
                }
                Err(message) => {
                    state.reject_submission(message);
                    Vec::new()
                }
            }
        }
        Msg::StreamStarted { job_id } => {
            if state.is_current(job_id, JobPhase::Submitting) {
                state.set_phase(JobPhase::Streaming);
            }
            Vec::new()
        }
        Msg::FrameReceived { job_id, frame } => {
            // Frames of a cancelled, failed or superseded job never reach the state.
            if state.is_current(job_id, JobPhase::Streaming) {
                state.apply_frame(&frame);
            }
            Vec::new()
        }
        Msg::StreamEnded { job_id } => {
            if state.is_current(job_id, JobPhase::Streaming) {
                state.set_phase(JobPhase::Complete);
            }
            Vec::new()
        }
        Msg::TransportFailed { job_id, message } => {
            if state.active_job() == Some(job_id) && state.phase().is_active() {
                state.fail(message);
            }
            Vec::new()
        }
        Msg::CancelRequested => match state.active_job() {
            Some(job_id) if state.phase().is_active() => {
                state.set_phase(JobPhase::Cancelled);
                vec![Effect::CancelJob { job_id }]
            }
            _ => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Accepts bare hosts like `youtu.be/xyz` by assuming https.
pub fn normalize_video_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    match Url::parse(&candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Ok(candidate)
        }
        Ok(url) => Err(format!("Unsupported video URL scheme: {}", url.scheme())),
        Err(err) => Err(format!("Invalid video URL \"{trimmed}\": {err}")),
    }
}

fn normalize_language(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_LANGUAGE.to_string(),
        language => language.to_string(),
    }
}
