use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Interviewer,
}

impl Role {
    /// Map a client-side role string onto a speaker.
    ///
    /// Clients send chat-completion style roles (`user` / `assistant`) as well
    /// as the stored form (`candidate` / `interviewer`).
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" | "candidate" => Some(Self::Candidate),
            "assistant" | "interviewer" => Some(Self::Interviewer),
            _ => None,
        }
    }

    /// Label used when rendering the transcript for the model
    pub fn label(&self) -> &'static str {
        match self {
            Self::Candidate => "Candidate",
            Self::Interviewer => "Interviewer",
        }
    }
}

/// A message exactly as the client delivered it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: None,
        }
    }
}

/// One speaker-tagged utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Chronological, normalized interview transcript.
///
/// Only the normalizer builds one, so every transcript in circulation has
/// passed the exchange checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub(crate) fn from_entries(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries spoken by `role`
    pub fn turns_by(&self, role: Role) -> usize {
        self.entries.iter().filter(|e| e.role == role).count()
    }

    /// Render as `Candidate:` / `Interviewer:` lines separated by blank lines
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.role.label(), e.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
