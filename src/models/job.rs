use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque recruiter identifier, carried explicitly on every request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecruiterId(pub String);

/// Job posting identifier (the posting itself lives in the job subsystem)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for RecruiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Difficulty tier of a job posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive; anything unrecognised reads as Medium
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Self::from_label).unwrap_or_default())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Role, description and difficulty used to calibrate questions and scoring.
/// Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl JobContext {
    /// Role title, if one was given
    pub fn role(&self) -> Option<&str> {
        Some(self.role_title.trim()).filter(|r| !r.is_empty())
    }

    /// No role and no description: nothing to calibrate against
    pub fn is_blank(&self) -> bool {
        self.role().is_none() && self.job_description.trim().is_empty()
    }
}

/// Resume-derived hints for the interviewer persona
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub full_name: String,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub most_impressive_project: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_context() {
        let json = r#"{"roleTitle": "Backend Engineer", "difficulty": "Medium"}"#;
        let job: JobContext = serde_json::from_str(json).unwrap();

        assert_eq!(job.role_title, "Backend Engineer");
        assert_eq!(job.difficulty, Difficulty::Medium);
        assert!(job.job_description.is_empty());
    }

    #[test]
    fn test_difficulty_is_lenient() {
        let json = r#"{"roleTitle": "SRE", "difficulty": "Insane"}"#;
        let job: JobContext = serde_json::from_str(json).unwrap();
        assert_eq!(job.difficulty, Difficulty::Medium);

        let job: JobContext = serde_json::from_str(r#"{"roleTitle": "SRE", "difficulty": "hard"}"#).unwrap();
        assert_eq!(job.difficulty, Difficulty::Hard);

        let job: JobContext = serde_json::from_str(r#"{"roleTitle": "SRE", "difficulty": null}"#).unwrap();
        assert_eq!(job.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_context_without_role_title() {
        let job: JobContext = serde_json::from_str(r#"{"jobDescription": "x"}"#).unwrap();

        assert_eq!(job.role(), None);
        assert_eq!(job.job_description, "x");
        assert!(!job.is_blank());
        assert!(serde_json::from_str::<JobContext>("{}").unwrap().is_blank());
    }
}
