use serde::{Deserialize, Deserializer};

/// Tag that marks a data-bearing frame.
pub const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepUpdate {
    pub step: String,
    pub status: StepStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

impl StepUpdate {
    pub fn new(step: impl Into<String>, status: StepStatus, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            status,
            message: message.into(),
        }
    }
}

/// One decoded `data:` payload. The server forwards whole node outputs, so
/// `data` routinely carries fields this client does not read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressEvent {
    #[serde(default)]
    pub node: Option<String>,
    pub data: ProgressData,
}

/// Sparse update: `None` means "unchanged", never "clear".
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProgressData {
    #[serde(default)]
    pub step_progress: Option<Vec<StepUpdate>>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse an update from the server. The content was: \"{raw}\" ({reason})")]
pub struct FrameError {
    pub raw: String,
    pub reason: String,
}

impl ProgressEvent {
    pub fn parse(json: &str) -> Result<Self, FrameError> {
        serde_json::from_str(json).map_err(|err| FrameError {
            raw: json.to_string(),
            reason: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePayload<'a> {
    /// No `data: ` tag: comments and other event fields.
    Ignored,
    /// Tag with nothing after it.
    KeepAlive,
    Data(&'a str),
}

pub fn classify_frame(frame: &str) -> FramePayload<'_> {
    match frame.strip_prefix(DATA_PREFIX) {
        None => FramePayload::Ignored,
        Some("") => FramePayload::KeepAlive,
        Some(json) => FramePayload::Data(json),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
