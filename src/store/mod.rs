pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryInterviewStore;

use crate::models::{InterviewRecord, JobId, RecruiterId};

/// Document store holding interview records and per-job interview counters.
///
/// Job postings themselves belong to the job subsystem; only the counter is
/// touched here.
pub trait InterviewStore: Send + Sync {
    fn insert(&self, record: InterviewRecord) -> Result<(), StoreError>;
    /// Bump the job's interview counter, returning the new value
    fn increment_interview_count(&self, job_id: &JobId) -> Result<u64, StoreError>;
    fn interview_count(&self, job_id: &JobId) -> Result<u64, StoreError>;
    fn fetch(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError>;
    fn for_recruiter(&self, recruiter_id: &RecruiterId) -> Result<Vec<InterviewRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("interview {0} already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
