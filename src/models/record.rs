use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FeedbackItem, JobId, RecruiterId, ScoreConfidence, Transcript};

/// Discrete verdict derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCategory {
    Excellent,
    Pass,
    Review,
    Fail,
}

impl ResultCategory {
    /// `>= 90` Excellent, `75..=89` Pass, `60..=74` Review, below 60 Fail
    pub fn from_overall(overall_score: u8) -> Self {
        match overall_score {
            90.. => Self::Excellent,
            75..=89 => Self::Pass,
            60..=74 => Self::Review,
            _ => Self::Fail,
        }
    }

    /// Pass and Excellent both count towards the pass rate
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::Excellent | Self::Pass)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Pass => "Pass",
            Self::Review => "Review",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// Persisted result of one completed interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub job_id: JobId,
    pub recruiter_id: RecruiterId,
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: Option<String>,
    pub job_role: String,
    pub difficulty: String,
    pub duration: String,
    pub technical_score: u8,
    pub communication_score: u8,
    pub confidence_score: u8,
    pub overall_score: u8,
    pub result: ResultCategory,
    pub score_confidence: ScoreConfidence,
    pub feedback: Vec<FeedbackItem>,
    pub full_transcript: Transcript,
    pub status: InterviewStatus,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl InterviewRecord {
    pub fn is_completed(&self) -> bool {
        self.status == InterviewStatus::Completed
    }
}
