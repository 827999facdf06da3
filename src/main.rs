use anyhow::{Context, Result};
use arxiv_digest::config::{
    find_config_file, openai_api_key, FetchPolicy, MailCredentials, Settings, TopicSet,
};
use arxiv_digest::mail::SmtpMailer;
use arxiv_digest::sources::ArxivSource;
use arxiv_digest::summarize::{NoopSummarizer, OpenAiSummarizer, Summarizer};
use arxiv_digest::utils::HttpClient;
use arxiv_digest::{Delivery, Notifier, RunOutcome};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv digest - filter new papers by topic and email a daily summary
#[derive(Parser, Debug)]
#[command(name = "arxiv-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Filter new arXiv papers by topic and email a digest", long_about = None)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Topics file (JSON)
    #[arg(long, short, default_value = "topics.json")]
    topics: PathBuf,

    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window in days (overrides settings and WINDOW_DAYS)
    #[arg(long)]
    window_days: Option<u32>,

    /// Skip AI summaries
    #[arg(long)]
    no_summary: bool,

    /// Abort the run on the first failed feed query
    #[arg(long)]
    fail_fast: bool,

    /// Write the digest to the artifacts directory instead of sending mail
    #[arg(long)]
    dry_run: bool,

    /// Directory for dry-run artifacts (used with --dry-run)
    #[arg(long, default_value = "artifacts")]
    artifacts: PathBuf,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_digest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Everything fallible about configuration is resolved before any network call
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut settings = Settings::load(config_path.as_deref())?;
    if let Some(days) = cli.window_days {
        settings.window_days = days;
    }
    if cli.no_summary {
        settings.summarize = false;
    }
    if cli.fail_fast {
        settings.fetch_policy = FetchPolicy::FailFast;
    }
    let settings = settings.validated()?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let topics = TopicSet::load(&cli.topics)?;

    let delivery = if cli.dry_run {
        Delivery::Artifacts(cli.artifacts.clone())
    } else {
        let credentials = MailCredentials::from_env()?;
        Delivery::Mail(Box::new(SmtpMailer::new(&settings, credentials)))
    };

    let summarizer: Box<dyn Summarizer> = if settings.summarize {
        let client = HttpClient::new(Duration::from_secs(settings.request_timeout_secs))
            .context("Failed to create HTTP client")?;
        Box::new(OpenAiSummarizer::new(
            client,
            openai_api_key()?,
            settings.model.as_str(),
            &settings.openai_base_url,
        ))
    } else {
        Box::new(NoopSummarizer)
    };

    let source = ArxivSource::new(&settings).context("Failed to create arXiv source")?;

    let notifier = Notifier::new(settings, topics, Box::new(source), summarizer, delivery);

    let outcome = notifier.run(chrono::Utc::now()).await?;
    for line in report_lines(&outcome, cli.quiet) {
        println!("{}", line);
    }

    Ok(())
}

/// Lines printed to stdout for a finished run; `quiet` drops the dry-run body
fn report_lines(outcome: &RunOutcome, quiet: bool) -> Vec<String> {
    match outcome {
        RunOutcome::Sent { entries } => vec![format!("[ok] email sent ({} papers)", entries)],
        RunOutcome::NoNewPapers => vec!["[info] no new papers".to_string()],
        RunOutcome::DryRun {
            entries,
            directory,
            text_body,
        } => {
            let mut lines = Vec::new();
            if !quiet {
                lines.push(text_body.clone());
            }
            lines.push(format!(
                "[ok] dry run: {} papers, artifacts in {}",
                entries,
                directory.display()
            ));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run() -> RunOutcome {
        RunOutcome::DryRun {
            entries: 2,
            directory: PathBuf::from("artifacts"),
            text_body: "📰  Daily arXiv Digest".to_string(),
        }
    }

    #[test]
    fn test_dry_run_prints_body() {
        let lines = report_lines(&dry_run(), false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "📰  Daily arXiv Digest");
        assert_eq!(lines[1], "[ok] dry run: 2 papers, artifacts in artifacts");
    }

    #[test]
    fn test_quiet_dry_run_omits_body() {
        let lines = report_lines(&dry_run(), true);
        assert_eq!(lines, vec!["[ok] dry run: 2 papers, artifacts in artifacts"]);
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            report_lines(&RunOutcome::Sent { entries: 3 }, true),
            vec!["[ok] email sent (3 papers)"]
        );
        assert_eq!(
            report_lines(&RunOutcome::NoNewPapers, false),
            vec!["[info] no new papers"]
        );
    }
}
