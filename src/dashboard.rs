//! Read-only recruiter views over stored interviews.

use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::models::{
    InterviewRecord, InterviewSummary, JobId, RecruiterId, RecruiterStats, ResultBreakdown,
};
use crate::store::InterviewStore;

/// A recruiter's interviews, newest first, optionally narrowed to one job
pub fn list_interviews<S: InterviewStore + ?Sized>(
    store: &S,
    recruiter_id: &RecruiterId,
    job_id: Option<&JobId>,
) -> Result<Vec<InterviewSummary>, AnalysisError> {
    let mut records = store.for_recruiter(recruiter_id)?;
    if let Some(job_id) = job_id {
        records.retain(|r| &r.job_id == job_id);
    }
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    debug!(
        "Listing {} interviews for recruiter {}",
        records.len(),
        recruiter_id
    );
    Ok(records.iter().map(InterviewSummary::from).collect())
}

/// Full record. When a recruiter is named it must own the record.
pub fn interview_details<S: InterviewStore + ?Sized>(
    store: &S,
    interview_id: &str,
    recruiter_id: Option<&RecruiterId>,
) -> Result<InterviewRecord, AnalysisError> {
    let record = store
        .fetch(interview_id)?
        .ok_or_else(|| AnalysisError::NotFound(interview_id.to_string()))?;

    if let Some(recruiter_id) = recruiter_id.filter(|r| **r != record.recruiter_id) {
        warn!(
            "Recruiter {} asked for interview {} owned by someone else",
            recruiter_id, interview_id
        );
        return Err(AnalysisError::Unauthorized);
    }

    Ok(record)
}

pub fn fetch_recruiter_stats<S: InterviewStore + ?Sized>(
    store: &S,
    recruiter_id: &RecruiterId,
) -> Result<RecruiterStats, AnalysisError> {
    Ok(recruiter_stats(&store.for_recruiter(recruiter_id)?))
}

/// Aggregate figures over completed interviews. Averages and the pass rate
/// are rounded to whole numbers; no interviews yields all zeros.
pub fn recruiter_stats(records: &[InterviewRecord]) -> RecruiterStats {
    let completed: Vec<&InterviewRecord> = records.iter().filter(|r| r.is_completed()).collect();
    let total = completed.len();
    if total == 0 {
        return RecruiterStats::default();
    }

    let mut breakdown = ResultBreakdown::default();
    let mut score_sum: u64 = 0;
    let mut passed: u64 = 0;
    for record in &completed {
        breakdown.record(record.result);
        score_sum += u64::from(record.overall_score);
        if record.result.is_passing() {
            passed += 1;
        }
    }

    RecruiterStats {
        total_interviews: total,
        average_score: rounded_ratio(score_sum, total as u64),
        pass_rate: rounded_ratio(passed * 100, total as u64),
        result_breakdown: breakdown,
    }
}

/// `numerator / denominator` rounded half up
fn rounded_ratio(numerator: u64, denominator: u64) -> u32 {
    ((2 * numerator + denominator) / (2 * denominator)) as u32
}
