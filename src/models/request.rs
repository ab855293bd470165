use serde::{Deserialize, Serialize};

use super::{AnalysisResult, CandidateProfile, FeedbackItem, JobContext, RawMessage, ResultCategory};

/// Payload submitted when a candidate finishes an interview
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub history: Vec<RawMessage>,
    #[serde(default)]
    pub job_context: Option<JobContext>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub recruiter_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Reply to an analysis request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub overall_score: u8,
    pub result: ResultCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One turn of the live interviewer conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<RawMessage>,
    #[serde(default)]
    pub context: Option<CandidateProfile>,
    #[serde(default)]
    pub job_context: Option<JobContext>,
}

/// Direct save of an interview that was scored elsewhere
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInterviewRequest {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub recruiter_id: Option<String>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_email: Option<String>,
    #[serde(default)]
    pub technical_score: Option<u8>,
    #[serde(default)]
    pub communication_score: Option<u8>,
    #[serde(default)]
    pub confidence_score: Option<u8>,
    #[serde(default)]
    pub feedback: Vec<FeedbackItem>,
    #[serde(default)]
    pub full_transcript: Vec<RawMessage>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}
