use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{RawMessage, Role, Transcript, TranscriptEntry};

/// Configuration for Stage 0
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Drop the first message (the interviewer's synthetic greeting)
    pub drop_leading_greeting: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            drop_leading_greeting: true,
        }
    }
}

/// Reasons a history cannot be scored
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("no conversation history provided")]
    EmptyHistory,
    #[error("message {index} has unknown role '{role}'")]
    UnknownRole { index: usize, role: String },
    #[error(
        "interview needs at least one candidate and one interviewer turn after the greeting \
         (found {candidate_turns} candidate, {interviewer_turns} interviewer)"
    )]
    InsufficientExchanges {
        candidate_turns: usize,
        interviewer_turns: usize,
    },
}

/// Perform Stage 0: turn a raw history into a scoreable transcript
///
/// 1. Drops the leading greeting
/// 2. Maps roles onto Candidate / Interviewer
/// 3. Keeps order and timestamps, stamping missing ones with the current time
/// 4. Rejects histories without a candidate turn and an interviewer turn
pub fn normalize(
    history: &[RawMessage],
    config: &NormalizeConfig,
) -> Result<Transcript, NormalizeError> {
    normalize_at(history, config, Utc::now())
}

/// Like [`normalize`] with an explicit clock
pub fn normalize_at(
    history: &[RawMessage],
    config: &NormalizeConfig,
    now: DateTime<Utc>,
) -> Result<Transcript, NormalizeError> {
    if history.is_empty() {
        return Err(NormalizeError::EmptyHistory);
    }

    let skip = usize::from(config.drop_leading_greeting);
    let mut entries = Vec::with_capacity(history.len().saturating_sub(skip));

    for (index, message) in history.iter().enumerate().skip(skip) {
        let role = Role::from_raw(&message.role).ok_or_else(|| NormalizeError::UnknownRole {
            index,
            role: message.role.clone(),
        })?;

        if message.content.trim().is_empty() {
            debug!("Skipping blank {} message at index {}", role.label(), index);
            continue;
        }

        entries.push(TranscriptEntry {
            role,
            content: message.content.trim().to_string(),
            timestamp: message.timestamp.unwrap_or(now),
        });
    }

    let transcript = Transcript::from_entries(entries);
    let candidate_turns = transcript.turns_by(Role::Candidate);
    let interviewer_turns = transcript.turns_by(Role::Interviewer);

    if candidate_turns == 0 || interviewer_turns == 0 {
        return Err(NormalizeError::InsufficientExchanges {
            candidate_turns,
            interviewer_turns,
        });
    }

    debug!(
        "Normalized {} messages into {} entries ({} candidate, {} interviewer)",
        history.len(),
        transcript.len(),
        candidate_turns,
        interviewer_turns
    );

    Ok(transcript)
}

/// Map every message onto a transcript entry without the exchange checks.
///
/// Used for chat history and for transcripts saved with precomputed scores.
pub fn to_entries(
    history: &[RawMessage],
    now: DateTime<Utc>,
) -> Result<Vec<TranscriptEntry>, NormalizeError> {
    history
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let role = Role::from_raw(&message.role).ok_or_else(|| NormalizeError::UnknownRole {
                index,
                role: message.role.clone(),
            })?;
            Ok(TranscriptEntry {
                role,
                content: message.content.clone(),
                timestamp: message.timestamp.unwrap_or(now),
            })
        })
        .collect()
}
