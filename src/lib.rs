pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod stages;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, ConfigError, ServerConfig};
pub use error::AnalysisError;
pub use io::{load_analyze_request, load_reply, ReportCard};
pub use llm::{parse_analysis, CompletionProvider, GroqClient, ProviderConfig, ProviderError};
pub use models::{AnalysisResult, AnalyzeRequest, AnalyzeResponse, InterviewRecord, ResultCategory};
pub use pipeline::{ComputedAnalysis, InterviewAnalyzer};
pub use stages::{execute_scoring, normalize, NormalizeConfig, ScoringConfig};
pub use store::{InMemoryInterviewStore, InterviewStore, JsonFileStore, StoreError};
