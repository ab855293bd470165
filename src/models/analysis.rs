use serde::{Deserialize, Serialize};

use super::ResultCategory;

/// Number of feedback items every analysis carries
pub const FEEDBACK_ITEMS: usize = 3;

/// One topic of structured feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub topic: String,
    pub feedback: String,
    #[serde(alias = "betterAnswer")]
    pub better_answer: String,
}

impl FeedbackItem {
    pub fn new(
        topic: impl Into<String>,
        feedback: impl Into<String>,
        better_answer: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            feedback: feedback.into(),
            better_answer: better_answer.into(),
        }
    }
}

/// Placeholder feedback used when the model gave none
pub fn generic_feedback() -> Vec<FeedbackItem> {
    vec![
        FeedbackItem::new("General", "Interview completed.", "N/A"),
        FeedbackItem::new("Communication", "Clear speech.", "N/A"),
        FeedbackItem::new("Technical", "Good effort.", "N/A"),
    ]
}

/// How much of an analysis came from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreConfidence {
    /// Every field was taken from the model reply
    Genuine,
    /// The reply parsed but one or more fields were substituted
    Defaulted,
    /// The reply was unusable; scores and feedback are placeholders
    Fallback,
}

/// Validated scores and feedback for one completed interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub technical_score: u8,
    pub communication_score: u8,
    pub confidence_score: u8,
    pub feedback: Vec<FeedbackItem>,
    pub score_confidence: ScoreConfidence,
}

impl AnalysisResult {
    /// Zero scores with generic feedback, for replies that are not JSON at all
    pub fn fallback() -> Self {
        Self {
            technical_score: 0,
            communication_score: 0,
            confidence_score: 0,
            feedback: generic_feedback(),
            score_confidence: ScoreConfidence::Fallback,
        }
    }

    /// Rounded mean of the three sub-scores
    pub fn overall_score(&self) -> u8 {
        overall_score(
            self.technical_score,
            self.communication_score,
            self.confidence_score,
        )
    }

    pub fn result(&self) -> ResultCategory {
        ResultCategory::from_overall(self.overall_score())
    }

    pub fn is_genuine(&self) -> bool {
        self.score_confidence == ScoreConfidence::Genuine
    }
}

/// `round((technical + communication + confidence) / 3)`.
///
/// A sum divided by three never lands on .5, so adding one before the integer
/// division rounds to nearest.
pub fn overall_score(technical: u8, communication: u8, confidence: u8) -> u8 {
    let sum = technical as u16 + communication as u16 + confidence as u16;
    ((sum + 1) / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_score_matches_rounded_mean() {
        for technical in 0..=100u8 {
            for communication in 0..=100u8 {
                for confidence in (0..=100u8).step_by(7) {
                    let mean =
                        (technical as f64 + communication as f64 + confidence as f64) / 3.0;
                    assert_eq!(
                        overall_score(technical, communication, confidence) as f64,
                        mean.round(),
                        "{technical}/{communication}/{confidence}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_fallback_analysis() {
        let analysis = AnalysisResult::fallback();
        assert_eq!(analysis.overall_score(), 0);
        assert_eq!(analysis.result(), ResultCategory::Fail);
        assert_eq!(analysis.feedback.len(), FEEDBACK_ITEMS);
        assert!(!analysis.is_genuine());
    }

    #[test]
    fn test_feedback_accepts_camel_case_alias() {
        let item: FeedbackItem = serde_json::from_str(
            r#"{"topic": "APIs", "feedback": "Vague", "betterAnswer": "Mention idempotency"}"#,
        )
        .unwrap();
        assert_eq!(item.better_answer, "Mention idempotency");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["better_answer"], "Mention idempotency");
    }
}
