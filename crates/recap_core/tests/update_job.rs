use recap_core::{
    update, AppState, Effect, JobPhase, Msg, StepStatus, STATUS_FINISHED, STATUS_INITIALIZING,
};

fn submit(state: AppState, url: &str, language: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Submit {
            video_url: url.to_string(),
            language: language.to_string(),
        },
    )
}

fn frame(job_id: u64, text: &str) -> Msg {
    Msg::FrameReceived {
        job_id,
        frame: text.to_string(),
    }
}

fn started_job() -> AppState {
    let (state, _) = submit(AppState::new(), "https://youtu.be/abc", "english");
    let (state, _) = update(state, Msg::StreamStarted { job_id: 1 });
    state
}

#[test]
fn submit_starts_a_job_and_emits_submit_effect() {
    let (mut state, effects) = submit(AppState::new(), "  https://youtu.be/abc ", "french");

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            job_id: 1,
            video_url: "https://youtu.be/abc".to_string(),
            language: "french".to_string(),
        }]
    );
    assert_eq!(state.phase(), JobPhase::Submitting);
    let view = state.view();
    assert!(view.loading);
    assert_eq!(view.status_line, STATUS_INITIALIZING);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn blank_language_defaults_and_bare_host_gets_https() {
    let (_state, effects) = submit(AppState::new(), "www.youtube.com/watch?v=xyz", "  ");

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            job_id: 1,
            video_url: "https://www.youtube.com/watch?v=xyz".to_string(),
            language: "english".to_string(),
        }]
    );
}

#[test]
fn blank_url_is_ignored_and_invalid_url_fails_locally() {
    let (state, effects) = submit(AppState::new(), "   ", "english");
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Idle);

    let (state, effects) = submit(state, "not a url", "english");
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Failed);
    assert!(state.terminal_error().unwrap().contains("not a url"));

    let (state, effects) = submit(state, "ftp://example.com/video", "english");
    assert!(effects.is_empty());
    assert!(state.terminal_error().unwrap().contains("ftp"));
}

#[test]
fn second_submit_while_loading_is_dropped() {
    let state = started_job();
    let (state, effects) = submit(state, "https://youtu.be/other", "english");

    assert!(effects.is_empty());
    assert_eq!(state.active_job(), Some(1));
    assert_eq!(state.phase(), JobPhase::Streaming);
}

#[test]
fn frames_drive_the_view_and_stream_end_completes() {
    let state = started_job();
    let (state, _) = update(
        state,
        frame(
            1,
            r#"data: {"data":{"status_message":"Working","step_progress":[{"step":"a","status":"success","message":"ok"},{"step":"b","status":"error","message":"bad"},{"step":"c","status":"pending","message":"..."}]}}"#,
        ),
    );
    let (state, _) = update(state, frame(1, r#"data: {"data":{"summary":"Sum","transcript":"Tr"}}"#));
    let view = state.view();
    assert_eq!(view.status_line, "Working");
    assert_eq!(view.failed_steps[0].message, "bad");
    assert_eq!(view.succeeded_steps[0].status, StepStatus::Success);
    assert_eq!(view.pending_steps.len(), 1);
    assert_eq!(view.summary.as_deref(), Some("Sum"));
    assert_eq!(view.transcript.as_deref(), Some("Tr"));

    let (state, _) = update(state, Msg::StreamEnded { job_id: 1 });
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Complete);
    assert!(!view.loading);
    assert_eq!(view.status_line, STATUS_FINISHED);
    // Completion does not rewrite the folded job state.
    assert_eq!(state.job().current_status, "Working");
}

#[test]
fn frames_before_stream_start_or_for_other_jobs_are_dropped() {
    let (state, _) = submit(AppState::new(), "https://youtu.be/abc", "english");
    let (state, _) = update(state, frame(1, r#"data: {"data":{"summary":"early"}}"#));
    assert_eq!(state.job().summary, "");

    let (state, _) = update(state, Msg::StreamStarted { job_id: 1 });
    let (state, _) = update(state, frame(9, r#"data: {"data":{"summary":"stale"}}"#));
    assert_eq!(state.job().summary, "");
}

#[test]
fn frame_error_is_shown_alongside_progress() {
    let state = started_job();
    let (state, _) = update(state, frame(1, "data: {oops"));
    let (state, _) = update(state, frame(1, r#"data: {"data":{"status_message":"Still going"}}"#));

    let view = state.view();
    assert_eq!(view.phase, JobPhase::Streaming);
    assert_eq!(view.status_line, "Still going");
    assert!(view.frame_error.unwrap().contains("{oops"));
    assert_eq!(view.terminal_error, None);
}

#[test]
fn transport_failure_is_terminal() {
    let state = started_job();
    let (state, _) = update(
        state,
        Msg::TransportFailed {
            job_id: 1,
            message: "connection reset".to_string(),
        },
    );
    assert_eq!(state.phase(), JobPhase::Failed);
    assert_eq!(state.terminal_error(), Some("connection reset"));

    let (state, _) = update(state, frame(1, r#"data: {"data":{"summary":"late"}}"#));
    let (state, _) = update(state, Msg::StreamEnded { job_id: 1 });
    assert_eq!(state.job().summary, "");
    assert_eq!(state.phase(), JobPhase::Failed);
}

#[test]
fn rejected_request_never_enters_streaming() {
    let (state, _) = submit(AppState::new(), "https://youtu.be/abc", "english");
    let (state, _) = update(
        state,
        Msg::TransportFailed {
            job_id: 1,
            message: "Invalid YouTube URL".to_string(),
        },
    );
    let (state, _) = update(state, Msg::StreamStarted { job_id: 1 });

    assert_eq!(state.phase(), JobPhase::Failed);
    assert_eq!(state.view().terminal_error.as_deref(), Some("Invalid YouTube URL"));
}

#[test]
fn cancel_stops_applying_frames_and_emits_cancel_effect() {
    let state = started_job();
    let (state, effects) = update(state, Msg::CancelRequested);
    assert_eq!(effects, vec![Effect::CancelJob { job_id: 1 }]);
    assert_eq!(state.phase(), JobPhase::Cancelled);

    let (state, _) = update(state, frame(1, r#"data: {"data":{"summary":"after cancel"}}"#));
    assert_eq!(state.job().summary, "");

    let (state, effects) = update(state, Msg::CancelRequested);
    assert!(effects.is_empty());

    // A new job starts from a fresh state with the next id.
    let (state, effects) = submit(state, "https://youtu.be/next", "english");
    assert!(matches!(effects[0], Effect::SubmitJob { job_id: 2, .. }));
    assert_eq!(state.job().summary, "");
    assert_eq!(state.phase(), JobPhase::Submitting);
}
