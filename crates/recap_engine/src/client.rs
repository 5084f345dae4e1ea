use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use recap_logging::{recap_info, recap_trace, recap_warn};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::decode::FrameDecoder;
use crate::{EngineEvent, FailureKind, JobId, JobRequest, StreamSummary, TransportError};

/// Shown when a rejected request carries no usable `detail`.
pub const GENERIC_REQUEST_ERROR: &str = "An error occurred during the request.";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub submit_path: String,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between reads, headers and body alike. There is
    /// no whole-request cap: summaries of long videos stream for as long as frames keep coming.
    pub read_timeout: Duration,
    /// Upper bound on undelimited text buffered while waiting for a frame to end.
    pub max_frame_bytes: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            submit_path: "/summarize".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(900),
            max_frame_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    /// Joins `base_url` and `submit_path`, keeping any path prefix on the base
    /// (a base of `http://host/api` posts to `http://host/api/summarize`).
    pub fn submit_url(&self) -> Result<Url, TransportError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.submit_path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| {
            TransportError::new(FailureKind::InvalidUrl, format!("{joined}: {err}"))
        })
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Submits one job and forwards its frames to `sink` until the body ends.
    ///
    /// Emits `StreamStarted` only after a 2xx status. The returned error is the
    /// job's single terminal error; it is not also emitted on the sink.
    async fn stream_job(
        &self,
        job_id: JobId,
        request: &JobRequest,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<StreamSummary, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    settings: ClientSettings,
}

impl ReqwestTransport {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn stream_job(
        &self,
        job_id: JobId,
        request: &JobRequest,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<StreamSummary, TransportError> {
        let url = self.settings.submit_url()?;
        let client = self.build_client()?;

        recap_info!(
            "Submitting job {} to {} (language={})",
            job_id,
            url,
            request.language
        );
        let send = client
            .post(url)
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                recap_info!("Job {} cancelled before the server answered", job_id);
                return Err(TransportError::cancelled());
            }
            result = send => result.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response).await;
            recap_warn!("Job {} rejected with {}: {}", job_id, status, message);
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        sink.emit(EngineEvent::StreamStarted { job_id });

        let mut decoder = FrameDecoder::new();
        let mut summary = StreamSummary::default();
        let mut body = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    recap_info!(
                        "Job {} cancelled after {} frames; closing the stream",
                        job_id,
                        summary.frames
                    );
                    return Err(TransportError::cancelled());
                }
                next = body.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk: Bytes = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;

            for frame in decoder.feed(&chunk) {
                emit_frame(sink, job_id, frame, &mut summary);
            }

            if decoder.pending_len() > self.settings.max_frame_bytes {
                recap_warn!(
                    "Job {} buffered {} bytes without a frame delimiter",
                    job_id,
                    decoder.pending_len()
                );
                return Err(TransportError::new(
                    FailureKind::FrameTooLarge {
                        max_bytes: self.settings.max_frame_bytes,
                    },
                    "frame too large",
                ));
            }
        }

        let (frames, tail) = decoder.finish_with_tail();
        for frame in frames {
            emit_frame(sink, job_id, frame, &mut summary);
        }
        summary.discarded_tail = tail > 0;

        recap_info!(
            "Job {} stream ended: {} frames, {} bytes",
            job_id,
            summary.frames,
            summary.bytes
        );
        Ok(summary)
    }
}

fn emit_frame(sink: &dyn EventSink, job_id: JobId, frame: String, summary: &mut StreamSummary) {
    summary.frames += 1;
    recap_trace!("Job {} frame #{} ({} bytes)", job_id, summary.frames, frame.len());
    sink.emit(EngineEvent::Frame { job_id, frame });
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

async fn error_detail(response: reqwest::Response) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(text)),
        }) if !text.is_empty() => text,
        // Validation failures carry a structured `detail`; show it verbatim.
        Ok(ErrorBody {
            detail: Some(other),
        }) if !other.is_null() && !other.is_string() => other.to_string(),
        _ => GENERIC_REQUEST_ERROR.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(FailureKind::InvalidUrl, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
