use std::time::Duration;

use tracing::{debug, info};

use crate::llm::{build_chat_request, CompletionProvider, ProviderError};
use crate::models::{CandidateProfile, JobContext, TranscriptEntry};

/// Produce the interviewer's next line for a live conversation.
///
/// One attempt under `timeout`; the candidate is waiting on the other end so
/// there is no retry.
pub async fn execute_chat<P: CompletionProvider>(
    provider: &P,
    message: &str,
    history: &[TranscriptEntry],
    candidate: Option<&CandidateProfile>,
    job: Option<&JobContext>,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let request = build_chat_request(message, history, candidate, job);
    debug!(
        "Chat: {} history messages, system prompt {} chars",
        history.len(),
        request.system.len()
    );

    let reply = tokio::time::timeout(timeout, provider.complete(&request))
        .await
        .map_err(|_| ProviderError::Timeout(timeout))??;

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    info!("Chat: interviewer replied with {} chars", reply.len());
    Ok(reply.to_string())
}
