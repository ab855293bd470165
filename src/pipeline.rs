//! End-to-end interview analysis: normalize, score, aggregate, persist.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::dashboard;
use crate::error::AnalysisError;
use crate::llm::{complete_feedback, CompletionProvider, ValidatedAnalysis, DEFAULT_SCORE};
use crate::models::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, ChatTurnRequest, InterviewRecord,
    InterviewSummary, JobId, RecruiterId, RecruiterStats, SaveInterviewRequest, ScoreConfidence,
    Transcript,
};
use crate::stages::{
    aggregate, execute_chat, execute_scoring, normalize, persist, to_entries, InterviewContext,
    NormalizeConfig, ScoringConfig,
};
use crate::store::{InterviewStore, StoreError};

pub const DB_WARNING: &str = "Analysis completed but database save failed";
pub const SAVED_MESSAGE: &str = "Interview completed and saved successfully";

/// Phase 1 output: a scored record that has not been stored yet
#[derive(Debug, Clone)]
pub struct ComputedAnalysis {
    pub record: InterviewRecord,
    pub validated: ValidatedAnalysis,
    pub attempts: u32,
}

impl ComputedAnalysis {
    pub fn analysis(&self) -> &AnalysisResult {
        &self.validated.analysis
    }
}

/// Owns the provider and store; one instance serves every request
pub struct InterviewAnalyzer<P, S: ?Sized> {
    provider: Arc<P>,
    store: Arc<S>,
    scoring: ScoringConfig,
    normalize: NormalizeConfig,
}

impl<P, S> InterviewAnalyzer<P, S>
where
    P: CompletionProvider,
    S: InterviewStore + ?Sized + 'static,
{
    pub fn new(provider: Arc<P>, store: Arc<S>, scoring: ScoringConfig) -> Self {
        Self {
            provider,
            store,
            scoring,
            normalize: NormalizeConfig::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Phase 1: validate the request and score the transcript. Input errors
    /// are raised before the provider is contacted.
    pub async fn compute(&self, request: &AnalyzeRequest) -> Result<ComputedAnalysis, AnalysisError> {
        if request.history.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "No conversation history provided".to_string(),
            ));
        }
        let (job_id, recruiter_id) = match (
            required(request.job_id.as_deref()),
            required(request.recruiter_id.as_deref()),
        ) {
            (Some(job), Some(recruiter)) => (JobId(job), RecruiterId(recruiter)),
            _ => {
                return Err(AnalysisError::InvalidInput(
                    "recruiterId and jobId are required".to_string(),
                ));
            }
        };

        let transcript = normalize(&request.history, &self.normalize)?;
        info!(
            "Analyzing interview for job {} (recruiter {}): {} transcript entries",
            job_id,
            recruiter_id,
            transcript.len()
        );

        let outcome = execute_scoring(
            self.provider.as_ref(),
            &transcript,
            request.job_context.as_ref(),
            &self.scoring,
        )
        .await?;

        let mut context = InterviewContext::new(job_id, recruiter_id);
        context.candidate_name = request.candidate_name.clone();
        context.job_role = request
            .job_role
            .clone()
            .or_else(|| {
                request
                    .job_context
                    .as_ref()
                    .and_then(|j| j.role())
                    .map(str::to_string)
            });
        context.difficulty = request
            .difficulty
            .clone()
            .or_else(|| request.job_context.as_ref().map(|j| j.difficulty.to_string()));
        context.duration = request.duration.clone();

        let record = aggregate(&outcome.validated.analysis, transcript, &context, Utc::now());
        info!(
            "Interview scored: overall {} ({})",
            record.overall_score, record.result
        );

        Ok(ComputedAnalysis {
            record,
            validated: outcome.validated,
            attempts: outcome.attempts,
        })
    }

    /// Store calls may do blocking file I/O, so they run on the blocking pool
    async fn on_store<T, F>(&self, op: F) -> Result<T, AnalysisError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, AnalysisError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable(format!("store task failed: {}", e)))?
    }

    /// Phase 2: store a computed record. Safe to call again after a failure.
    pub async fn persist(&self, record: &InterviewRecord) -> Result<String, AnalysisError> {
        let record = record.clone();
        self.on_store(move |store| Ok(persist(store, &record)?)).await
    }

    /// Both phases. A storage failure still returns the analysis, with a
    /// warning in place of the interview id.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        let computed = self.compute(request).await?;
        let record = &computed.record;

        let mut response = AnalyzeResponse {
            success: true,
            analysis: computed.validated.analysis.clone(),
            overall_score: record.overall_score,
            result: record.result,
            interview_id: None,
            db_warning: None,
            message: None,
        };

        match self.persist(record).await {
            Ok(id) => {
                response.interview_id = Some(id);
                response.message = Some(SAVED_MESSAGE.to_string());
            }
            Err(e) => {
                warn!("Failed to store interview {}: {}", record.id, e);
                response.db_warning = Some(DB_WARNING.to_string());
            }
        }

        Ok(response)
    }

    /// The interviewer's next line in a live conversation
    pub async fn chat(&self, request: &ChatTurnRequest) -> Result<String, AnalysisError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AnalysisError::InvalidInput("Please provide a message".to_string()));
        }
        let history = to_entries(&request.history, Utc::now())?;

        Ok(execute_chat(
            self.provider.as_ref(),
            message,
            &history,
            request.context.as_ref(),
            request.job_context.as_ref(),
            self.scoring.timeout,
        )
        .await?)
    }

    /// Store an interview whose scores were computed elsewhere
    pub async fn save_scored(
        &self,
        request: &SaveInterviewRequest,
    ) -> Result<InterviewRecord, AnalysisError> {
        let (Some(job_id), Some(recruiter_id), Some(candidate_name)) = (
            required(request.job_id.as_deref()),
            required(request.recruiter_id.as_deref()),
            required(request.candidate_name.as_deref()),
        ) else {
            return Err(AnalysisError::InvalidInput(
                "jobId, recruiterId, and candidateName are required".to_string(),
            ));
        };

        let scores = [
            request.technical_score,
            request.communication_score,
            request.confidence_score,
        ];
        let missing_score = scores.iter().any(Option::is_none);
        let [technical, communication, confidence] =
            scores.map(|s| s.unwrap_or(DEFAULT_SCORE).min(100));

        let mut feedback = request.feedback.clone();
        let padded = complete_feedback(&mut feedback);

        let analysis = AnalysisResult {
            technical_score: technical,
            communication_score: communication,
            confidence_score: confidence,
            feedback,
            score_confidence: if missing_score || padded {
                ScoreConfidence::Defaulted
            } else {
                ScoreConfidence::Genuine
            },
        };

        let transcript = Transcript::from_entries(to_entries(&request.full_transcript, Utc::now())?);
        let mut context = InterviewContext::new(JobId(job_id), RecruiterId(recruiter_id));
        context.candidate_name = Some(candidate_name);
        context.candidate_email = request.candidate_email.clone();
        context.job_role = request.job_role.clone();
        context.difficulty = request.difficulty.clone();
        context.duration = request.duration.clone();

        let record = aggregate(&analysis, transcript, &context, Utc::now());
        self.persist(&record).await?;
        Ok(record)
    }

    pub async fn list(
        &self,
        recruiter_id: &RecruiterId,
        job_id: Option<&JobId>,
    ) -> Result<Vec<InterviewSummary>, AnalysisError> {
        let recruiter_id = recruiter_id.clone();
        let job_id = job_id.cloned();
        self.on_store(move |store| dashboard::list_interviews(store, &recruiter_id, job_id.as_ref()))
            .await
    }

    pub async fn details(
        &self,
        interview_id: &str,
        recruiter_id: Option<&RecruiterId>,
    ) -> Result<InterviewRecord, AnalysisError> {
        let interview_id = interview_id.to_string();
        let recruiter_id = recruiter_id.cloned();
        self.on_store(move |store| {
            dashboard::interview_details(store, &interview_id, recruiter_id.as_ref())
        })
        .await
    }

    pub async fn stats(&self, recruiter_id: &RecruiterId) -> Result<RecruiterStats, AnalysisError> {
        let recruiter_id = recruiter_id.clone();
        self.on_store(move |store| dashboard::fetch_recruiter_stats(store, &recruiter_id))
            .await
    }
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, FeedbackItem, JobContext, RawMessage, ResultCategory};
    use crate::stages::NormalizeError;
    use crate::store::InMemoryInterviewStore;
    use crate::testing::{ScriptedProvider, UnavailableStore};
    use std::sync::Mutex;
    use std::thread::ThreadId;

    const SCORED_REPLY: &str = r#"{
        "technical_score": 82,
        "communication_score": 75,
        "confidence_score": 90,
        "feedback": [
            {"topic": "Ownership", "feedback": "Solid grasp.", "better_answer": "Mention borrowing rules."},
            {"topic": "Concurrency", "feedback": "Vague on Send.", "better_answer": "Explain Send vs Sync."},
            {"topic": "Delivery", "feedback": "Clear.", "better_answer": "Use a concrete example."}
        ]
    }"#;

    fn request() -> AnalyzeRequest {
        AnalyzeRequest {
            history: vec![
                RawMessage::new("assistant", "Hello Sam! Let's begin."),
                RawMessage::new("assistant", "What does the borrow checker enforce?"),
                RawMessage::new("user", "Aliasing xor mutability."),
            ],
            job_context: Some(JobContext {
                role_title: "Backend Engineer".to_string(),
                job_description: "Rust services".to_string(),
                difficulty: Difficulty::Medium,
            }),
            candidate_name: Some("Sam".to_string()),
            recruiter_id: Some("REC_abc_01".to_string()),
            job_id: Some("job-1".to_string()),
            ..AnalyzeRequest::default()
        }
    }

    fn analyzer<S: InterviewStore + 'static>(
        provider: ScriptedProvider,
        store: S,
    ) -> (Arc<ScriptedProvider>, InterviewAnalyzer<ScriptedProvider, S>) {
        let provider = Arc::new(provider);
        let analyzer = InterviewAnalyzer::new(
            provider.clone(),
            Arc::new(store),
            ScoringConfig::default(),
        );
        (provider, analyzer)
    }

    #[tokio::test]
    async fn test_analyze_scores_and_stores() {
        let (_, analyzer) = analyzer(
            ScriptedProvider::replies(vec![SCORED_REPLY]),
            InMemoryInterviewStore::default(),
        );

        let response = analyzer.analyze(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.overall_score, 82);
        assert_eq!(response.result, ResultCategory::Pass);
        assert_eq!(response.message.as_deref(), Some(SAVED_MESSAGE));
        assert!(response.db_warning.is_none());

        let id = response.interview_id.unwrap();
        let stored = analyzer.details(&id, None).await.unwrap();
        assert_eq!(stored.candidate_name, "Sam");
        assert_eq!(stored.job_role, "Backend Engineer");
        assert_eq!(stored.difficulty, "Medium");
        assert_eq!(stored.full_transcript.len(), 2);
        assert_eq!(
            analyzer
                .store()
                .interview_count(&JobId("job-1".to_string()))
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_greeting_only_without_provider_call() {
        let (provider, analyzer) = analyzer(
            ScriptedProvider::replies(vec![SCORED_REPLY]),
            InMemoryInterviewStore::default(),
        );
        let mut request = request();
        request.history.truncate(1);

        let result = analyzer.analyze(&request).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Normalize(NormalizeError::InsufficientExchanges { .. }))
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_requires_ids() {
        let (provider, analyzer) = analyzer(
            ScriptedProvider::replies(vec![SCORED_REPLY]),
            InMemoryInterviewStore::default(),
        );
        let mut request = request();
        request.recruiter_id = Some("  ".to_string());

        let result = analyzer.analyze(&request).await;

        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_warning() {
        let (_, analyzer) = analyzer(ScriptedProvider::replies(vec![SCORED_REPLY]), UnavailableStore);

        let response = analyzer.analyze(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.overall_score, 82);
        assert!(response.interview_id.is_none());
        assert_eq!(response.db_warning.as_deref(), Some(DB_WARNING));
    }

    #[tokio::test]
    async fn test_persist_can_be_retried() {
        let (_, analyzer) = analyzer(
            ScriptedProvider::replies(vec![SCORED_REPLY]),
            InMemoryInterviewStore::default(),
        );

        let computed = analyzer.compute(&request()).await.unwrap();
        assert_eq!(computed.analysis().technical_score, 82);
        let id = analyzer.persist(&computed.record).await.unwrap();

        assert_eq!(id, computed.record.id);
        assert!(matches!(
            analyzer.persist(&computed.record).await,
            Err(AnalysisError::Store(_))
        ));
    }

    /// Records which threads the store is called from
    #[derive(Default)]
    struct ThreadTrackingStore {
        inner: InMemoryInterviewStore,
        threads: Mutex<Vec<ThreadId>>,
    }

    impl ThreadTrackingStore {
        fn track(&self) {
            self.threads.lock().unwrap().push(std::thread::current().id());
        }
    }

    impl InterviewStore for ThreadTrackingStore {
        fn insert(&self, record: InterviewRecord) -> Result<(), StoreError> {
            self.track();
            self.inner.insert(record)
        }

        fn increment_interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
            self.track();
            self.inner.increment_interview_count(job_id)
        }

        fn interview_count(&self, job_id: &JobId) -> Result<u64, StoreError> {
            self.track();
            self.inner.interview_count(job_id)
        }

        fn fetch(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError> {
            self.track();
            self.inner.fetch(id)
        }

        fn for_recruiter(&self, recruiter_id: &RecruiterId) -> Result<Vec<InterviewRecord>, StoreError> {
            self.track();
            self.inner.for_recruiter(recruiter_id)
        }
    }

    #[tokio::test]
    async fn test_store_calls_leave_the_async_thread() {
        let (_, analyzer) = analyzer(
            ScriptedProvider::replies(vec![SCORED_REPLY]),
            ThreadTrackingStore::default(),
        );
        let recruiter = RecruiterId("REC_abc_01".to_string());

        let response = analyzer.analyze(&request()).await.unwrap();
        let id = response.interview_id.unwrap();
        analyzer.details(&id, Some(&recruiter)).await.unwrap();
        assert_eq!(analyzer.list(&recruiter, None).await.unwrap().len(), 1);
        assert_eq!(analyzer.stats(&recruiter).await.unwrap().total_interviews, 1);

        let async_thread = std::thread::current().id();
        let threads = analyzer.store().threads.lock().unwrap();
        assert!(threads.len() >= 4);
        assert!(threads.iter().all(|t| *t != async_thread));
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let (provider, analyzer) = analyzer(
            ScriptedProvider::replies(vec!["Next question."]),
            InMemoryInterviewStore::default(),
        );

        let result = analyzer.chat(&ChatTurnRequest::default()).await;

        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
        assert_eq!(provider.calls(), 0);

        let reply = analyzer
            .chat(&ChatTurnRequest {
                message: "Ready".to_string(),
                ..ChatTurnRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(reply, "Next question.");
    }

    #[tokio::test]
    async fn test_save_scored_defaults_missing_scores() {
        let (_, analyzer) = analyzer(ScriptedProvider::replies(vec![]), InMemoryInterviewStore::default());
        let request = SaveInterviewRequest {
            job_id: Some("job-1".to_string()),
            recruiter_id: Some("REC_abc_01".to_string()),
            candidate_name: Some("Ada".to_string()),
            technical_score: Some(0),
            communication_score: Some(90),
            feedback: vec![FeedbackItem::new("Design", "Good trade-offs.", "N/A")],
            full_transcript: vec![RawMessage::new("assistant", "Hi"), RawMessage::new("user", "Hello")],
            ..SaveInterviewRequest::default()
        };

        let record = analyzer.save_scored(&request).await.unwrap();

        // 0 stays 0; only the missing confidence score is defaulted
        assert_eq!(record.technical_score, 0);
        assert_eq!(record.confidence_score, DEFAULT_SCORE);
        assert_eq!(record.overall_score, 53);
        assert_eq!(record.result, ResultCategory::Fail);
        assert_eq!(record.score_confidence, ScoreConfidence::Defaulted);
        assert_eq!(record.feedback.len(), 3);
        assert_eq!(record.feedback[0].topic, "Design");
        assert!(analyzer.details(&record.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_save_scored_requires_fields() {
        let (_, analyzer) = analyzer(ScriptedProvider::replies(vec![]), InMemoryInterviewStore::default());
        let request = SaveInterviewRequest {
            job_id: Some("job-1".to_string()),
            recruiter_id: Some("REC_abc_01".to_string()),
            ..SaveInterviewRequest::default()
        };

        assert!(matches!(
            analyzer.save_scored(&request).await,
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
