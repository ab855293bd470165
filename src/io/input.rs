use std::path::Path;

use anyhow::{Context, Result};

use crate::models::AnalyzeRequest;

/// Load an analysis request (the same JSON body the HTTP endpoint accepts)
pub fn load_analyze_request(path: &Path) -> Result<AnalyzeRequest> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_analyze_request(&content)
}

pub fn parse_analyze_request(json: &str) -> Result<AnalyzeRequest> {
    serde_json::from_str(json).context("Failed to parse analysis request JSON")
}

/// Load a saved provider reply verbatim
pub fn load_reply(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_analyze_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{
                "history": [
                    {"role": "assistant", "content": "Welcome!"},
                    {"role": "assistant", "content": "Describe a hash map.", "timestamp": "2026-10-14T09:00:00Z"},
                    {"role": "user", "content": "Buckets keyed by hash."}
                ],
                "recruiterId": "REC_abc_01",
                "jobId": "job-1"
            }"#,
        )
        .unwrap();

        let request = load_analyze_request(&path).unwrap();

        assert_eq!(request.history.len(), 3);
        assert!(request.history[1].timestamp.is_some());
        assert!(request.job_context.is_none());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_analyze_request(Path::new("/nonexistent/request.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_malformed_request_is_error() {
        assert!(parse_analyze_request("{\"history\": 3}").is_err());
    }
}
