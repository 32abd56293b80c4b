//! RepoLens CLI - Main entry point

mod cli;

use clap::Parser;
use repolens_foundation::{AnalyzerConfig, ContextLimits, Credentials};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RepoLens - Ask an LLM about any GitHub repository
#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository URL (https://github.com/owner/name)
    repo_url: String,

    /// What you want to know about the repository
    prompt: String,

    /// GitHub token (overrides env and config)
    #[arg(long)]
    github_token: Option<String>,

    /// Anthropic API key (overrides env and config)
    #[arg(long)]
    api_key: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Print the answer as it is generated instead of a JSON result
    #[arg(short, long)]
    stream: bool,

    /// Use smaller context limits (fewer files, shorter excerpts)
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // 로그는 stderr로 - stdout은 결과 전용
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let mut config = match AnalyzerConfig::load() {
        Ok(config) => config,
        Err(e) => return Ok(cli::report_failure(&e, args.stream)),
    };

    if let Some(model) = &args.model {
        config.model.model = model.clone();
        tracing::info!("Using model: {}", model);
    }
    if args.compact {
        config.context = ContextLimits {
            max_tree_entries: config.context.max_tree_entries,
            ..ContextLimits::compact()
        };
    }

    let mut credentials = Credentials::new();
    if let Some(token) = args.github_token {
        credentials = credentials.github_token(token);
    }
    if let Some(key) = args.api_key {
        credentials = credentials.anthropic_api_key(key);
    }

    let outcome = if args.stream {
        cli::run_streaming(&config, &credentials, &args.repo_url, &args.prompt).await
    } else {
        cli::run_once(&config, &credentials, &args.repo_url, &args.prompt).await
    };

    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => cli::report_failure(&e, args.stream),
    })
}
