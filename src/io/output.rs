use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::models::AnalysisResult;

const RULE: &str = "========================================";
const FEEDBACK_INDENT: &str = "   ";

/// Plain-text interview report, as handed to the candidate
pub struct ReportCard<'a> {
    analysis: &'a AnalysisResult,
    generated_at: DateTime<Utc>,
}

impl<'a> ReportCard<'a> {
    pub fn new(analysis: &'a AnalysisResult, generated_at: DateTime<Utc>) -> Self {
        Self {
            analysis,
            generated_at,
        }
    }

    /// Format the report as text
    pub fn format(&self) -> String {
        let a = self.analysis;
        let mut output = String::new();

        output.push_str(&format!("{RULE}\n         INTERVIEW REPORT\n{RULE}\n\n"));
        output.push_str(&format!(
            "Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str("SCORES\n======\n");
        output.push_str(&score_line("Technical Score:", a.technical_score));
        output.push_str(&score_line("Communication Score:", a.communication_score));
        output.push_str(&score_line("Confidence Score:", a.confidence_score));
        output.push_str(&score_line("Overall Score:", a.overall_score()));
        output.push_str(&format!("{:<23}{}\n\n", "Result:", a.result()));

        output.push_str("FEEDBACK BREAKDOWN\n==================\n");
        if a.feedback.is_empty() {
            output.push_str("No feedback available\n");
        }
        for (idx, item) in a.feedback.iter().enumerate() {
            output.push_str(&format!("\n{}. {}\n", idx + 1, item.topic));
            output.push_str(&indented("Feedback: ", &item.feedback));
            output.push_str(&indented("Better Approach: ", &item.better_answer));
        }

        output.push_str(&format!(
            "\n{RULE}\nThank you for taking the interview!\n{RULE}\n"
        ));
        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn score_line(label: &str, score: u8) -> String {
    format!("{:<23}{}/100\n", label, score)
}

/// Label plus wrapped text, continuation lines aligned under the text
fn indented(label: &str, text: &str) -> String {
    let pad = " ".repeat(FEEDBACK_INDENT.len() + label.len());
    let wrapped = wrap_text(text, 76usize.saturating_sub(pad.len()).max(20));
    let mut lines = wrapped.lines();
    let mut out = format!(
        "{FEEDBACK_INDENT}{label}{}\n",
        lines.next().unwrap_or_default()
    );
    for line in lines {
        out.push_str(&format!("{pad}{line}\n"));
    }
    out
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}
