use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InterviewStore, StoreError};
use crate::models::{InterviewRecord, JobId, RecruiterId};

/// On-disk layout of the store
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    #[serde(default)]
    interviews: Vec<InterviewRecord>,
    #[serde(default)]
    job_interview_counts: BTreeMap<JobId, u64>,
}

/// Single JSON document on disk. Every write rewrites the whole file through
/// a temporary sibling and a rename.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating the parent directory if needed
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let file = std::fs::File::create(&tmp)?;
        serde_json::to_writer_pretty(&file, document)?;
        file.sync_all()?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(
            "Wrote {} interviews to {:?}",
            document.interviews.len(),
            self.path
        );
        Ok(())
    }
}

impl InterviewStore for JsonFileStore {
    fn insert(&self, record: InterviewRecord) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut document = self.load()?;
        if document.interviews.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        document.interviews.push(record);
        self.save(&document)
    }

    fn increment_interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
        let _guard = self.guard()?;
        let mut document = self.load()?;
        let count = document
            .job_interview_counts
            .entry(job_id.clone())
            .or_insert(0);
        *count += 1;
        let count = *count;
        self.save(&document)?;
        Ok(count)
    }

    fn interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
        let _guard = self.guard()?;
        Ok(self
            .load()?
            .job_interview_counts
            .get(job_id)
            .copied()
            .unwrap_or(0))
    }

    fn fetch(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.load()?.interviews.into_iter().find(|r| r.id == id))
    }

    fn for_recruiter(&self, recruiter_id: &RecruiterId) -> Result<Vec<InterviewRecord>, StoreError> {
        let _guard = self.guard()?;
        Ok(self
            .load()?
            .interviews
            .into_iter()
            .filter(|r| &r.recruiter_id == recruiter_id)
            .collect())
    }
}
