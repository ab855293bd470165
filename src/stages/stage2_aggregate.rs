use chrono::{DateTime, Utc};

use crate::models::{
    AnalysisResult, InterviewRecord, InterviewStatus, JobId, RecruiterId, Transcript,
};

pub const ANONYMOUS_CANDIDATE: &str = "Anonymous";
pub const PRACTICE_ROLE: &str = "Practice Interview";
pub const NOT_AVAILABLE: &str = "N/A";

/// Identity and labels attached to a scored interview
#[derive(Debug, Clone)]
pub struct InterviewContext {
    pub job_id: JobId,
    pub recruiter_id: RecruiterId,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub job_role: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
}

impl InterviewContext {
    pub fn new(job_id: JobId, recruiter_id: RecruiterId) -> Self {
        Self {
            job_id,
            recruiter_id,
            candidate_name: None,
            candidate_email: None,
            job_role: None,
            difficulty: None,
            duration: None,
        }
    }
}

/// Execute Stage 2: derive the overall score and verdict and assemble the
/// record. Pure apart from generating the record id.
pub fn aggregate(
    analysis: &AnalysisResult,
    transcript: Transcript,
    context: &InterviewContext,
    completed_at: DateTime<Utc>,
) -> InterviewRecord {
    let overall_score = analysis.overall_score();

    InterviewRecord {
        id: uuid::Uuid::new_v4().to_string(),
        job_id: context.job_id.clone(),
        recruiter_id: context.recruiter_id.clone(),
        candidate_name: label_or(&context.candidate_name, ANONYMOUS_CANDIDATE),
        candidate_email: context.candidate_email.clone().filter(|e| !e.trim().is_empty()),
        job_role: label_or(&context.job_role, PRACTICE_ROLE),
        difficulty: label_or(&context.difficulty, NOT_AVAILABLE),
        duration: label_or(&context.duration, NOT_AVAILABLE),
        technical_score: analysis.technical_score,
        communication_score: analysis.communication_score,
        confidence_score: analysis.confidence_score,
        overall_score,
        result: analysis.result(),
        score_confidence: analysis.score_confidence,
        feedback: analysis.feedback.clone(),
        full_transcript: transcript,
        status: InterviewStatus::Completed,
        completed_at,
        created_at: completed_at,
    }
}

fn label_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
