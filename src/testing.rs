//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::llm::{ChatRequest, CompletionProvider, ProviderError};
use crate::models::{
    generic_feedback, AnalysisResult, InterviewRecord, JobId, RecruiterId, Role, ScoreConfidence,
    Transcript, TranscriptEntry,
};
use crate::stages::{aggregate, InterviewContext};
use crate::store::{InterviewStore, StoreError};

/// Provider that replays a fixed script of results
pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    stall: bool,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            stall: false,
        }
    }

    pub(crate) fn replies(replies: Vec<&str>) -> Self {
        Self::new(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Never answers
    pub(crate) fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::new(vec![])
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let next = {
            self.requests.lock().unwrap().push(request.clone());
            self.script.lock().unwrap().pop_front()
        };

        if self.stall {
            std::future::pending::<()>().await;
        }

        next.unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

/// Store whose every operation fails
pub(crate) struct UnavailableStore;

impl InterviewStore for UnavailableStore {
    fn insert(&self, _record: InterviewRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn increment_interview_count(&self, _job_id: &JobId) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn interview_count(&self, _job_id: &JobId) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn fetch(&self, _id: &str) -> Result<Option<InterviewRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn for_recruiter(&self, _recruiter_id: &RecruiterId) -> Result<Vec<InterviewRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Completed record whose three sub-scores all equal `score`
pub(crate) fn record(recruiter: &str, job: &str, score: u8) -> InterviewRecord {
    record_at(recruiter, job, score, Utc::now())
}

pub(crate) fn record_at(
    recruiter: &str,
    job: &str,
    score: u8,
    completed_at: DateTime<Utc>,
) -> InterviewRecord {
    let analysis = AnalysisResult {
        technical_score: score,
        communication_score: score,
        confidence_score: score,
        feedback: generic_feedback(),
        score_confidence: ScoreConfidence::Genuine,
    };
    let transcript = Transcript::from_entries(vec![
        TranscriptEntry {
            role: Role::Interviewer,
            content: "Walk me through a recent project.".to_string(),
            timestamp: completed_at,
        },
        TranscriptEntry {
            role: Role::Candidate,
            content: "I rebuilt our billing pipeline.".to_string(),
            timestamp: completed_at,
        },
    ]);
    let mut context =
        InterviewContext::new(JobId(job.to_string()), RecruiterId(recruiter.to_string()));
    context.candidate_name = Some(format!("Candidate {score}"));
    aggregate(&analysis, transcript, &context, completed_at)
}
