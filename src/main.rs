use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use interview_scorer::llm::AnalysisField;
use interview_scorer::{
    load_analyze_request, load_reply, parse_analysis, server, AppConfig, GroqClient,
    InMemoryInterviewStore, InterviewAnalyzer, InterviewStore, JsonFileStore, ReportCard,
};

#[derive(Parser)]
#[command(name = "interview-scorer")]
#[command(author, version, about = "AI interview scoring service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Override APP_HOST
        #[arg(long)]
        host: Option<String>,

        /// Override APP_PORT
        #[arg(long)]
        port: Option<u16>,

        /// JSON file store (overrides INTERVIEW_STORE_PATH)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Score one interview request file and print the report card
    Analyze {
        /// Request file (same JSON body as POST /api/ai/analyze)
        #[arg(short, long)]
        input: PathBuf,

        /// Also write the report card to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// JSON file store to save the record into (overrides INTERVIEW_STORE_PATH)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the reply validator against a saved provider reply
    Validate {
        /// File containing the raw model reply
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            store,
            verbose,
        } => {
            setup_logging(verbose);
            serve(host, port, store).await
        }
        Commands::Analyze {
            input,
            report,
            store,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_request(input, report, store).await
        }
        Commands::Validate { input, verbose } => {
            setup_logging(verbose);
            validate_reply(input)
        }
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn open_store(path: Option<PathBuf>) -> Result<Arc<dyn InterviewStore>> {
    match path {
        Some(path) => {
            info!("Using JSON file store at {:?}", path);
            Ok(Arc::new(JsonFileStore::open(path)?))
        }
        None => {
            warn!("No store path configured, interviews are kept in memory only");
            Ok(Arc::new(InMemoryInterviewStore::default()))
        }
    }
}

fn build_analyzer(
    config: &AppConfig,
    store: Arc<dyn InterviewStore>,
) -> Result<InterviewAnalyzer<GroqClient, dyn InterviewStore>> {
    let client =
        GroqClient::new(config.provider.clone()).context("Failed to build provider client")?;
    info!(
        "Provider: {} (model {}, timeout {:?}, {} retries)",
        config.provider.api_url,
        config.provider.model,
        config.provider.timeout,
        config.provider.max_retries
    );
    Ok(InterviewAnalyzer::new(
        Arc::new(client),
        store,
        config.scoring(),
    ))
}

async fn serve(host: Option<String>, port: Option<u16>, store: Option<PathBuf>) -> Result<()> {
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.override_store_path(store);

    let addr = config.server.socket_addr()?;
    let analyzer = build_analyzer(&config, open_store(config.store_path.clone())?)?;

    server::serve(addr, Arc::new(analyzer))
        .await
        .context("HTTP server failed")
}

async fn analyze_request(
    input: PathBuf,
    report: Option<PathBuf>,
    store: Option<PathBuf>,
) -> Result<()> {
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    config.override_store_path(store);
    info!("Loading analysis request from {:?}", input);
    let request = load_analyze_request(&input)?;
    info!("Loaded {} history messages", request.history.len());

    let analyzer = build_analyzer(&config, open_store(config.store_path.clone())?)?;
    let response = analyzer
        .analyze(&request)
        .await
        .context("Interview analysis failed")?;

    let card = ReportCard::new(&response.analysis, Utc::now());
    println!("{}", card.format());
    println!("Score confidence: {:?}", response.analysis.score_confidence);
    match (&response.interview_id, &response.db_warning) {
        (Some(id), _) => println!("Saved as interview {}", id),
        (None, Some(warning)) => println!("Warning: {}", warning),
        (None, None) => {}
    }

    if let Some(path) = report {
        card.write_file(&path)?;
        info!("Wrote report card to {:?}", path);
    }

    Ok(())
}

fn validate_reply(input: PathBuf) -> Result<()> {
    let raw = load_reply(&input)?;
    let validated = parse_analysis(&raw);
    let report = &validated.report;

    println!("Reply Validation");
    println!("================");
    println!("Score confidence: {:?}", report.confidence());
    println!("Fallback used: {}", report.used_fallback);
    if !report.defaulted.is_empty() {
        println!("Defaulted fields: {}", field_keys(&report.defaulted));
    }
    if !report.adjusted.is_empty() {
        println!("Adjusted fields: {}", field_keys(&report.adjusted));
    }
    println!();
    println!("{}", ReportCard::new(&validated.analysis, Utc::now()).format());

    Ok(())
}

fn field_keys(fields: &[AnalysisField]) -> String {
    fields.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
}
