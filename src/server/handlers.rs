use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::AnalysisError;
use crate::llm::CompletionProvider;
use crate::models::{AnalyzeRequest, ChatTurnRequest, JobId, RecruiterId, SaveInterviewRequest};
use crate::pipeline::InterviewAnalyzer;
use crate::store::InterviewStore;

type Shared<P, S> = State<Arc<InterviewAnalyzer<P, S>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecruiterQuery {
    recruiter_id: Option<String>,
    job_id: Option<String>,
}

impl RecruiterQuery {
    fn recruiter(&self) -> Option<RecruiterId> {
        self.recruiter_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| RecruiterId(id.to_string()))
    }

    fn require_recruiter(&self) -> Result<RecruiterId, AnalysisError> {
        self.recruiter()
            .ok_or_else(|| AnalysisError::InvalidInput("Recruiter ID is required".to_string()))
    }

    fn job(&self) -> Option<JobId> {
        self.job_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| JobId(id.to_string()))
    }
}

pub(crate) async fn health_handler() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

pub(crate) async fn analyze_handler<P, S>(
    State(analyzer): Shared<P, S>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let Json(request) = body?;
    let response = analyzer.analyze(&request).await?;
    Ok(Json(response).into_response())
}

pub(crate) async fn chat_handler<P, S>(
    State(analyzer): Shared<P, S>,
    body: Result<Json<ChatTurnRequest>, JsonRejection>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let Json(request) = body?;
    let reply = analyzer.chat(&request).await?;
    Ok(Json(json!({ "success": true, "response": reply })).into_response())
}

pub(crate) async fn save_handler<P, S>(
    State(analyzer): Shared<P, S>,
    body: Result<Json<SaveInterviewRequest>, JsonRejection>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let Json(request) = body?;
    let record = analyzer.save_scored(&request).await?;
    let payload = json!({
        "success": true,
        "data": {
            "interviewId": record.id,
            "candidateName": record.candidate_name,
            "overallScore": record.overall_score,
            "result": record.result,
            "completedAt": record.completed_at,
        }
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn list_handler<P, S>(
    State(analyzer): Shared<P, S>,
    Query(query): Query<RecruiterQuery>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let recruiter = query.require_recruiter()?;
    let interviews = analyzer.list(&recruiter, query.job().as_ref()).await?;
    Ok(Json(json!({ "success": true, "data": interviews })).into_response())
}

pub(crate) async fn stats_handler<P, S>(
    State(analyzer): Shared<P, S>,
    Query(query): Query<RecruiterQuery>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let recruiter = query.require_recruiter()?;
    let stats = analyzer.stats(&recruiter).await?;
    Ok(Json(json!({ "success": true, "data": stats })).into_response())
}

pub(crate) async fn details_handler<P, S>(
    State(analyzer): Shared<P, S>,
    Path(interview_id): Path<String>,
    Query(query): Query<RecruiterQuery>,
) -> Result<Response, AnalysisError>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let record = analyzer.details(&interview_id, query.recruiter().as_ref()).await?;
    Ok(Json(json!({ "success": true, "data": record })).into_response())
}
