use tracing::{info, warn};

use crate::models::InterviewRecord;
use crate::store::{InterviewStore, StoreError};

/// Execute Stage 3: write the record and bump the job's interview counter
///
/// The insert decides success. A counter failure after a successful insert is
/// logged and otherwise ignored, since the record is already durable.
pub fn persist<S: InterviewStore + ?Sized>(
    store: &S,
    record: &InterviewRecord,
) -> Result<String, StoreError> {
    store.insert(record.clone())?;
    info!(
        "Stored interview {} (job {}, overall {})",
        record.id, record.job_id, record.overall_score
    );

    match store.increment_interview_count(&record.job_id) {
        Ok(count) => info!("Job {} now has {} interviews", record.job_id, count),
        Err(e) => warn!(
            "Interview {} stored but job {} counter not updated: {}",
            record.id, record.job_id, e
        ),
    }

    Ok(record.id.clone())
}
