#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob {
        job_id: crate::JobId,
        video_url: String,
        language: String,
    },
    CancelJob { job_id: crate::JobId },
}
