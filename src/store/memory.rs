use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{InterviewStore, StoreError};
use crate::models::{InterviewRecord, JobId, RecruiterId};

#[derive(Debug, Default)]
struct Inner {
    interviews: Vec<InterviewRecord>,
    job_counts: HashMap<JobId, u64>,
}

/// Process-local store, used when no store path is configured
#[derive(Debug, Default, Clone)]
pub struct InMemoryInterviewStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryInterviewStore {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl InterviewStore for InMemoryInterviewStore {
    fn insert(&self, record: InterviewRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.interviews.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        inner.interviews.push(record);
        Ok(())
    }

    fn increment_interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let count = inner.job_counts.entry(job_id.clone()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    fn interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
        Ok(self.lock()?.job_counts.get(job_id).copied().unwrap_or(0))
    }

    fn fetch(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError> {
        Ok(self.lock()?.interviews.iter().find(|r| r.id == id).cloned())
    }

    fn for_recruiter(&self, recruiter_id: &RecruiterId) -> Result<Vec<InterviewRecord>, StoreError> {
        Ok(self
            .lock()?
            .interviews
            .iter()
            .filter(|r| &r.recruiter_id == recruiter_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_insert_and_fetch() {
        let store = InMemoryInterviewStore::default();
        let record = record("REC_a_1", "job-1", 80);
        let id = record.id.clone();

        store.insert(record).unwrap();

        assert_eq!(store.fetch(&id).unwrap().unwrap().overall_score, 80);
        assert!(store.fetch("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_conflicts() {
        let store = InMemoryInterviewStore::default();
        let record = record("REC_a_1", "job-1", 80);

        store.insert(record.clone()).unwrap();

        assert!(matches!(store.insert(record), Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_recruiter_filter_and_counts() {
        let store = InMemoryInterviewStore::default();
        store.insert(record("REC_a_1", "job-1", 80)).unwrap();
        store.insert(record("REC_b_2", "job-2", 40)).unwrap();
        let job = JobId("job-1".to_string());

        assert_eq!(store.increment_interview_count(&job).unwrap(), 1);
        assert_eq!(store.increment_interview_count(&job).unwrap(), 2);

        assert_eq!(store.interview_count(&job).unwrap(), 2);
        assert_eq!(store.interview_count(&JobId("job-2".to_string())).unwrap(), 0);
        let mine = store.for_recruiter(&RecruiterId("REC_a_1".to_string())).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].job_id, job);
    }
}
