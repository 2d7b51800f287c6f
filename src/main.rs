use clap::Parser;
use indicatif::MultiProgress;
use issue_analytics::analytics::AzureTextAnalytics;
use issue_analytics::report::Reporter;
use issue_analytics::utils::{MultiProgressNew, ProgressStyleTemplate};
use issue_analytics::{attach_analytics, extract_summary, Config, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn,h2=warn,rustls=warn";

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Participant analytics for a saved GitHub issue page")]
struct Args {
    /// Saved issue page
    #[arg(default_value = "issue.html")]
    input: PathBuf,
    /// JSON configuration file
    #[arg(long = "config")]
    config_path: Option<String>,
    /// Base name for the summary, raw JSON and plot files
    #[arg(long = "output")]
    output_filename: Option<PathBuf>,
    #[arg(long = "endpoint")]
    analytics_endpoint: Option<String>,
    #[arg(long = "key")]
    analytics_key: Option<String>,
    #[arg(long = "key_phrases")]
    key_phrase_count: Option<usize>,
    #[arg(long = "language")]
    language: Option<String>,
    #[arg(long = "rps")]
    requests_per_second: Option<f64>,
    #[arg(long = "no_summary")]
    no_summary: bool,
    #[arg(long = "no_plot")]
    no_plot: bool,
    #[arg(long = "count_issue_body")]
    count_issue_body: bool,
    #[arg(long = "exclude_self_mentions")]
    exclude_self_mentions: bool,
    #[arg(long = "emojis")]
    use_emojis: bool,
    /// Hide progress bars
    #[arg(long = "quiet")]
    quiet: bool,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config_path {
            Some(path) => Config::from_config(path)?,
            None => Config::default(),
        };
        if let Some(output) = &self.output_filename {
            config.output_filename = Some(output.clone());
        }
        if let Some(endpoint) = &self.analytics_endpoint {
            config.analytics_endpoint = Some(endpoint.clone());
        }
        if let Some(key) = &self.analytics_key {
            config.analytics_key = Some(key.clone());
        }
        if let Some(count) = self.key_phrase_count {
            config.key_phrase_count = count;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(rps) = self.requests_per_second {
            config.requests_per_second = rps;
        }
        config.print_summary &= !self.no_summary;
        config.show_sentiment_plot &= !self.no_plot;
        config.count_issue_body |= self.count_issue_body;
        config.exclude_self_mentions |= self.exclude_self_mentions;
        config.use_emojis |= self.use_emojis;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    let multi_progress = MultiProgress::default();

    let parse_pb = multi_progress.add_stage(!args.quiet, ProgressStyleTemplate::stage());
    parse_pb.set_message(format!("Read file `{}` ...", args.input.display()));
    let html = std::fs::read_to_string(&args.input)?;
    let mut summary = extract_summary(&html, &config)?;
    parse_pb.finish_with_message(format!(
        "✅ Completed parsing `{}` (find {} comments, {} participants)",
        args.input.display(),
        summary.comments.len(),
        summary.participants.len()
    ));

    if let (Some(endpoint), Some(key)) = (&config.analytics_endpoint, &config.analytics_key) {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        match AzureTextAnalytics::new(endpoint, key.as_str(), config.language.as_str(), timeout) {
            Ok(provider) => {
                let pb = multi_progress.add_stage(!args.quiet, ProgressStyleTemplate::comments_bar());
                attach_analytics(&mut summary, provider, &config, &pb).await;
            }
            Err(e) => {
                warn!("Text analytics disabled: {e}");
                summary.warnings.push(format!("Text analytics disabled: {e}"));
            }
        }
    } else {
        info!("No analytics endpoint configured, skipping sentiment and key phrases");
    }

    let reporter = Reporter::new(&config);
    if config.print_summary {
        println!("{}", reporter.render_text(&summary)?);
    }
    for output in reporter.save(&summary)? {
        println!("Saved {} to {}", output.label(), absolute(output.path()).display());
    }
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
