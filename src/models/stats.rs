use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{InterviewRecord, ResultCategory};

/// Count of interviews per result category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultBreakdown {
    #[serde(rename = "Excellent")]
    pub excellent: usize,
    #[serde(rename = "Pass")]
    pub pass: usize,
    #[serde(rename = "Review")]
    pub review: usize,
    #[serde(rename = "Fail")]
    pub fail: usize,
}

impl ResultBreakdown {
    pub fn record(&mut self, category: ResultCategory) {
        match category {
            ResultCategory::Excellent => self.excellent += 1,
            ResultCategory::Pass => self.pass += 1,
            ResultCategory::Review => self.review += 1,
            ResultCategory::Fail => self.fail += 1,
        }
    }
}

/// Dashboard statistics for one recruiter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterStats {
    pub total_interviews: usize,
    pub average_score: u32,
    pub pass_rate: u32,
    pub result_breakdown: ResultBreakdown,
}

/// Dashboard list row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub job_role: String,
    pub overall_score: u8,
    pub result: ResultCategory,
    pub completed_at: DateTime<Utc>,
    pub technical_score: u8,
    pub communication_score: u8,
    pub confidence_score: u8,
}

impl From<&InterviewRecord> for InterviewSummary {
    fn from(record: &InterviewRecord) -> Self {
        Self {
            id: record.id.clone(),
            candidate_name: record.candidate_name.clone(),
            candidate_email: record.candidate_email.clone(),
            job_role: record.job_role.clone(),
            overall_score: record.overall_score,
            result: record.result,
            completed_at: record.completed_at,
            technical_score: record.technical_score,
            communication_score: record.communication_score,
            confidence_score: record.confidence_score,
        }
    }
}
