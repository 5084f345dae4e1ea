mod cli;
mod config;
mod effects;
mod logging;
mod render;

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use recap_core::{update, AppState, JobPhase, Msg};
use recap_logging::recap_warn;

use effects::{stopped_msg, EffectRunner};
use render::Renderer;

/// How long one wait for engine events may block before deadlines are rechecked.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::initialize(args.log, args.verbose);

    let settings = config::load(args.config.as_deref())?.into_settings(&args);
    let runner = EffectRunner::new(settings.client).context("failed to start the engine")?;
    let mut renderer = Renderer::new(io::stdout().lock(), !args.no_transcript);
    let deadline = args
        .deadline
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let mut state = dispatch(
        &runner,
        AppState::new(),
        Msg::Submit {
            video_url: args.video_url.clone(),
            language: settings.language,
        },
    );

    loop {
        if state.consume_dirty() {
            renderer.render(&state.view())?;
        }
        if !state.phase().is_active() {
            break;
        }
        let msg = if deadline.is_some_and(|at| Instant::now() >= at) {
            recap_warn!("Deadline reached; cancelling job");
            Msg::CancelRequested
        } else {
            match runner.next_msg(POLL_INTERVAL) {
                Ok(msg) => msg.unwrap_or(Msg::NoOp),
                Err(stopped) => stopped_msg(state.active_job(), stopped),
            }
        };
        state = dispatch(&runner, state, msg);
    }

    match state.phase() {
        JobPhase::Complete => Ok(()),
        JobPhase::Cancelled => bail!("job cancelled"),
        JobPhase::Failed => bail!(state
            .terminal_error()
            .unwrap_or("job failed")
            .to_string()),
        JobPhase::Idle | JobPhase::Submitting | JobPhase::Streaming => {
            bail!("no video URL given")
        }
    }
}

/// Feeds `msg` through `update`, including any messages its effects produce at once.
fn dispatch(runner: &EffectRunner, mut state: AppState, msg: Msg) -> AppState {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(runner.apply(effects));
    }
    state
}
