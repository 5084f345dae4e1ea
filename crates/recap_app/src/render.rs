use std::io::{self, Write};

use recap_core::{AppViewModel, JobPhase, StepUpdate};

/// Prints the parts of the view that changed since the previous call.
pub struct Renderer<W: Write> {
    out: W,
    show_transcript: bool,
    last_status: String,
    last_steps: Vec<StepUpdate>,
    last_frame_error: Option<String>,
    printed_result: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, show_transcript: bool) -> Self {
        Self {
            out,
            show_transcript,
            last_status: String::new(),
            last_steps: Vec::new(),
            last_frame_error: None,
            printed_result: false,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if !view.status_line.is_empty() && view.status_line != self.last_status {
            writeln!(self.out, "» {}", view.status_line)?;
            self.last_status = view.status_line.clone();
        }

        let steps: Vec<StepUpdate> = view
            .failed_steps
            .iter()
            .chain(&view.succeeded_steps)
            .chain(&view.pending_steps)
            .cloned()
            .collect();
        if steps != self.last_steps {
            for (marker, group) in [
                ('x', &view.failed_steps),
                ('+', &view.succeeded_steps),
                ('.', &view.pending_steps),
            ] {
                for step in group {
                    writeln!(self.out, "  {marker} {}: {}", step.step, step.message)?;
                }
            }
            self.last_steps = steps;
        }

        if view.frame_error != self.last_frame_error {
            if let Some(error) = &view.frame_error {
                writeln!(self.out, "! {error}")?;
            }
            self.last_frame_error = view.frame_error.clone();
        }

        if view.phase == JobPhase::Complete && !self.printed_result {
            self.print_result(view)?;
            self.printed_result = true;
        }
        self.out.flush()
    }

    fn print_result(&mut self, view: &AppViewModel) -> io::Result<()> {
        match &view.summary {
            Some(summary) => writeln!(self.out, "\n{summary}")?,
            None => writeln!(self.out, "\nThe server finished without a summary.")?,
        }
        if self.show_transcript {
            if let Some(transcript) = &view.transcript {
                writeln!(self.out, "\n---- Transcript ----\n{transcript}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use recap_core::{update, AppState, Msg};

    use super::*;

    fn feed(state: AppState, frames: &[&str]) -> AppState {
        frames.iter().fold(state, |state, frame| {
            update(
                state,
                Msg::FrameReceived {
                    job_id: 1,
                    frame: frame.to_string(),
                },
            )
            .0
        })
    }

    fn running() -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::Submit {
                video_url: "https://youtu.be/abc".to_string(),
                language: "english".to_string(),
            },
        );
        update(state, Msg::StreamStarted { job_id: 1 }).0
    }

    #[test]
    fn prints_only_changes_then_the_result() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(&mut out, false);

        let state = running();
        renderer.render(&state.view()).unwrap();
        renderer.render(&state.view()).unwrap();

        let state = feed(
            state,
            &[
                r#"data: {"data":{"status_message":"Fetching","step_progress":[{"step":"id","status":"success","message":"Got id"},{"step":"tr","status":"error","message":"No transcript"}]}}"#,
            ],
        );
        renderer.render(&state.view()).unwrap();

        let state = feed(state, &[r##"data: {"data":{"summary":"# Sum","transcript":"words"}}"##]);
        let (state, _) = update(state, Msg::StreamEnded { job_id: 1 });
        renderer.render(&state.view()).unwrap();
        renderer.render(&state.view()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "» Initializing process...\n\
             » Fetching\n  x tr: No transcript\n  + id: Got id\n\
             » Process finished!\n\n# Sum\n"
        );
    }

    #[test]
    fn transcript_and_frame_errors_are_shown() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(&mut out, true);

        let state = feed(
            running(),
            &["data: {nope", r#"data: {"data":{"summary":"S","transcript":"T"}}"#],
        );
        let (state, _) = update(state, Msg::StreamEnded { job_id: 1 });
        renderer.render(&state.view()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("! Failed to parse an update from the server. The content was: \"{nope\""));
        assert!(text.ends_with("\nS\n\n---- Transcript ----\nT\n"));
    }
}
