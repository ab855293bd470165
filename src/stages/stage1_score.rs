use std::time::Duration;

use tracing::{info, warn};

use crate::llm::{
    build_scoring_request, parse_analysis, CompletionProvider, ProviderError, ValidatedAnalysis,
};
use crate::models::{JobContext, Transcript};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Upper bound on a single provider attempt
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }
}

/// Result of Stage 1 scoring
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub validated: ValidatedAnalysis,
    /// Provider attempts made, including the successful one
    pub attempts: u32,
}

/// Execute Stage 1: ask the model to score the transcript
///
/// 1. Build the scoring request from the transcript and job context
/// 2. Call the provider under a timeout, retrying retryable failures
/// 3. Parse and validate whatever text comes back
///
/// A reply that arrives but is malformed is never an error. When every attempt
/// times out the fallback analysis is returned so slow providers degrade
/// instead of failing; any other persistent transport failure is returned as
/// an error.
pub async fn execute_scoring<P: CompletionProvider>(
    provider: &P,
    transcript: &Transcript,
    job: Option<&JobContext>,
    config: &ScoringConfig,
) -> Result<ScoringOutcome, ProviderError> {
    let request = build_scoring_request(transcript, job);
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            info!("Scoring: retry {} of {}", attempt, config.max_retries);
        }

        let result = match tokio::time::timeout(config.timeout, provider.complete(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(config.timeout)),
        };

        match result {
            Ok(reply) => {
                let validated = parse_analysis(&reply);
                info!(
                    "Scoring: technical={} communication={} confidence={} ({:?})",
                    validated.analysis.technical_score,
                    validated.analysis.communication_score,
                    validated.analysis.confidence_score,
                    validated.analysis.score_confidence
                );
                return Ok(ScoringOutcome {
                    validated,
                    attempts: attempt + 1,
                });
            }
            Err(e) => {
                warn!("Scoring attempt {} failed: {}", attempt + 1, e);
                let retryable = e.is_retryable();
                last_error = Some(e);
                if !retryable {
                    break;
                }
            }
        }
    }

    match last_error {
        Some(e) if e.is_timeout() => {
            warn!("Scoring: provider timed out on every attempt, using fallback analysis");
            Ok(ScoringOutcome {
                validated: ValidatedAnalysis::fallback(),
                attempts: config.max_retries + 1,
            })
        }
        Some(e) => Err(e),
        None => Err(ProviderError::EmptyResponse),
    }
}
