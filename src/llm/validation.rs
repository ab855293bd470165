use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{
    generic_feedback, AnalysisResult, FeedbackItem, ScoreConfidence, FEEDBACK_ITEMS,
};

/// Score substituted when the model omits or mistypes a score field
pub const DEFAULT_SCORE: u8 = 70;

/// Fields of the scoring reply that can be defaulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisField {
    TechnicalScore,
    CommunicationScore,
    ConfidenceScore,
    Feedback,
}

impl AnalysisField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::TechnicalScore => "technical_score",
            Self::CommunicationScore => "communication_score",
            Self::ConfidenceScore => "confidence_score",
            Self::Feedback => "feedback",
        }
    }
}

/// What the validator had to do to produce a usable analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Fields that were substituted
    pub defaulted: Vec<AnalysisField>,
    /// Score fields that were out of range or fractional and got adjusted
    pub adjusted: Vec<AnalysisField>,
    /// The reply could not be parsed as a JSON object at all
    pub used_fallback: bool,
}

impl ValidationReport {
    pub fn confidence(&self) -> ScoreConfidence {
        if self.used_fallback {
            ScoreConfidence::Fallback
        } else if self.defaulted.is_empty() {
            ScoreConfidence::Genuine
        } else {
            ScoreConfidence::Defaulted
        }
    }

    pub fn is_clean(&self) -> bool {
        !self.used_fallback && self.defaulted.is_empty() && self.adjusted.is_empty()
    }
}

/// Validated analysis plus a record of the substitutions made
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAnalysis {
    pub analysis: AnalysisResult,
    pub report: ValidationReport,
}

impl ValidatedAnalysis {
    /// Provider never produced a usable reply
    pub fn fallback() -> Self {
        Self {
            analysis: AnalysisResult::fallback(),
            report: ValidationReport {
                defaulted: vec![
                    AnalysisField::TechnicalScore,
                    AnalysisField::CommunicationScore,
                    AnalysisField::ConfidenceScore,
                    AnalysisField::Feedback,
                ],
                adjusted: vec![],
                used_fallback: true,
            },
        }
    }
}

/// Return the payload inside a Markdown code fence, or the trimmed input if
/// there is none. A language tag after the opening fence is dropped, whether
/// it sits on its own line or is glued to the payload.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };

    let body = trimmed[open + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());

    // Last fence closes; earlier ones may sit inside JSON strings
    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Parse and validate a raw scoring reply. Never fails: unusable input
/// degrades to the fallback analysis.
pub fn parse_analysis(raw: &str) -> ValidatedAnalysis {
    let trimmed = raw.trim();
    let parsed = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str::<Value>(strip_code_fences(trimmed)),
    };

    let object = match parsed {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            warn!("Scoring reply is JSON but not an object ({}), using fallback", kind(&other));
            return ValidatedAnalysis::fallback();
        }
        Err(e) => {
            warn!("Scoring reply is not valid JSON ({}), using fallback", e);
            return ValidatedAnalysis::fallback();
        }
    };

    validate_object(&object)
}

fn validate_object(object: &Map<String, Value>) -> ValidatedAnalysis {
    let mut report = ValidationReport {
        defaulted: vec![],
        adjusted: vec![],
        used_fallback: false,
    };

    let technical_score = read_score(object, AnalysisField::TechnicalScore, &mut report);
    let communication_score = read_score(object, AnalysisField::CommunicationScore, &mut report);
    let confidence_score = read_score(object, AnalysisField::ConfidenceScore, &mut report);
    let feedback = read_feedback(object, &mut report);

    if !report.defaulted.is_empty() {
        let fields: Vec<&str> = report.defaulted.iter().map(|f| f.key()).collect();
        warn!("Scoring reply missing or malformed fields, defaults applied: {:?}", fields);
    }

    let analysis = AnalysisResult {
        technical_score,
        communication_score,
        confidence_score,
        feedback,
        score_confidence: report.confidence(),
    };

    ValidatedAnalysis { analysis, report }
}

fn read_score(
    object: &Map<String, Value>,
    field: AnalysisField,
    report: &mut ValidationReport,
) -> u8 {
    let Some(value) = object.get(field.key()).and_then(Value::as_f64) else {
        report.defaulted.push(field);
        return DEFAULT_SCORE;
    };

    let score = value.round().clamp(0.0, 100.0);
    if score != value {
        warn!("{} of {} adjusted to {}", field.key(), value, score);
        report.adjusted.push(field);
    }
    score as u8
}

fn read_feedback(object: &Map<String, Value>, report: &mut ValidationReport) -> Vec<FeedbackItem> {
    let mut items: Vec<FeedbackItem> = object
        .get(AnalysisField::Feedback.key())
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(read_feedback_item).collect())
        .unwrap_or_default();

    if complete_feedback(&mut items) {
        report.defaulted.push(AnalysisField::Feedback);
    }
    items
}

/// Pad with generic entries or truncate so exactly three items remain.
/// Returns whether padding was needed.
pub fn complete_feedback(items: &mut Vec<FeedbackItem>) -> bool {
    let have = items.len();
    if have < FEEDBACK_ITEMS {
        items.extend(generic_feedback().into_iter().skip(have));
    }
    items.truncate(FEEDBACK_ITEMS);
    have < FEEDBACK_ITEMS
}

fn read_feedback_item(value: &Value) -> Option<FeedbackItem> {
    let object = value.as_object()?;
    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| object.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    };

    Some(FeedbackItem {
        topic: text(&["topic"]).unwrap_or_else(|| "General".to_string()),
        feedback: text(&["feedback"]).unwrap_or_default(),
        better_answer: text(&["better_answer", "betterAnswer"])
            .unwrap_or_else(|| "N/A".to_string()),
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
