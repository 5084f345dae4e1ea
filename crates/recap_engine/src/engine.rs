use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use recap_logging::{recap_debug, recap_info, recap_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ChannelEventSink, ClientSettings, ReqwestTransport, Transport};
use crate::{EngineEvent, EngineStopped, JobId, JobRequest};

enum EngineCommand {
    Submit { job_id: JobId, request: JobRequest },
    Cancel { job_id: JobId },
    Shutdown,
}

type Running = Arc<Mutex<HashMap<JobId, CancellationToken>>>;

/// Owns a background runtime that streams jobs and reports [`EngineEvent`]s.
///
/// Dropping the handle stops the worker thread; jobs still in flight are
/// dropped together with the runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> std::io::Result<Self> {
        Self::with_transport(Arc::new(ReqwestTransport::new(settings)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("recap-engine")
            .build()?;

        thread::Builder::new()
            .name("recap-engine-commands".to_string())
            .spawn(move || {
                let running: Running = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Submit { job_id, request } => {
                            let cancel = CancellationToken::new();
                            lock(&running).insert(job_id, cancel.clone());
                            let transport = transport.clone();
                            let event_tx = event_tx.clone();
                            let running = running.clone();
                            runtime.spawn(async move {
                                run_job(transport.as_ref(), job_id, request, cancel, event_tx)
                                    .await;
                                lock(&running).remove(&job_id);
                            });
                        }
                        EngineCommand::Cancel { job_id } => match lock(&running).get(&job_id) {
                            Some(cancel) => {
                                recap_info!("Cancelling job {}", job_id);
                                cancel.cancel();
                            }
                            None => recap_debug!("Cancel for job {} ignored; not running", job_id),
                        },
                        EngineCommand::Shutdown => {
                            recap_info!("Engine shutting down");
                            break;
                        }
                    }
                }
                // Runtime first so running jobs release their event senders, then
                // the command receiver, so no submit can succeed once events disconnect.
                drop(runtime);
                drop(cmd_rx);
                drop(event_tx);
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, job_id: JobId, request: JobRequest) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Submit { job_id, request })
    }

    pub fn cancel(&self, job_id: JobId) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Cancel { job_id })
    }

    /// Stops the worker thread; jobs still in flight are dropped.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// `Ok(None)` on timeout; `Err` once the worker is gone and no event can arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.cmd_tx.send(command).map_err(|_| {
            recap_warn!("Engine worker is gone; command dropped");
            EngineStopped
        })
    }
}

async fn run_job(
    transport: &dyn Transport,
    job_id: JobId,
    request: JobRequest,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(event_tx.clone());
    let result = transport.stream_job(job_id, &request, &sink, cancel).await;
    let _ = event_tx.send(EngineEvent::JobCompleted { job_id, result });
}

fn lock(running: &Running) -> std::sync::MutexGuard<'_, HashMap<JobId, CancellationToken>> {
    running.lock().unwrap_or_else(PoisonError::into_inner)
}
