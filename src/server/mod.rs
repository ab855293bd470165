mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::llm::CompletionProvider;
use crate::pipeline::InterviewAnalyzer;
use crate::store::InterviewStore;

use handlers::{
    analyze_handler, chat_handler, details_handler, health_handler, list_handler, save_handler,
    stats_handler,
};

/// Router exposing the analysis, chat and dashboard endpoints
pub fn router<P, S>(analyzer: Arc<InterviewAnalyzer<P, S>>) -> Router
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ai/analyze", post(analyze_handler::<P, S>))
        .route("/api/ai/chat", post(chat_handler::<P, S>))
        .route(
            "/api/interviews",
            post(save_handler::<P, S>).get(list_handler::<P, S>),
        )
        .route("/api/interviews/stats", get(stats_handler::<P, S>))
        .route("/api/interviews/:id", get(details_handler::<P, S>))
        .with_state(analyzer)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve<P, S>(addr: SocketAddr, analyzer: Arc<InterviewAnalyzer<P, S>>) -> std::io::Result<()>
where
    P: CompletionProvider + 'static,
    S: InterviewStore + ?Sized + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "interview scorer listening");
    axum::serve(listener, router(analyzer)).await
}
