use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use brollbot_core::{
    AnalysisConfig, AnalysisError, AnalysisRequest, Analyzer, BeatCache, ChatCompletionClient,
    ContentFormat, PipelineError, Platform, Provider, Tone,
    config::{check_aspect_ratio, check_duration},
    format_report_readable, records_to_csv, records_to_json,
};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::{fs, io::AsyncReadExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    Grok,
    #[default]
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliTone {
    Inspiring,
    Urgent,
    Calm,
    Funny,
    Serious,
    Emotional,
    Uplifting,
    Mysterious,
}

impl From<CliTone> for Tone {
    fn from(cli: CliTone) -> Self {
        match cli {
            CliTone::Inspiring => Tone::Inspiring,
            CliTone::Urgent => Tone::Urgent,
            CliTone::Calm => Tone::Calm,
            CliTone::Funny => Tone::Funny,
            CliTone::Serious => Tone::Serious,
            CliTone::Emotional => Tone::Emotional,
            CliTone::Uplifting => Tone::Uplifting,
            CliTone::Mysterious => Tone::Mysterious,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliFormat {
    Ugc,
    TalkingHead,
    Testimonial,
}

impl From<CliFormat> for ContentFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Ugc => ContentFormat::Ugc,
            CliFormat::TalkingHead => ContentFormat::TalkingHead,
            CliFormat::Testimonial => ContentFormat::Testimonial,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliPlatform {
    Facebook,
    InstagramFeed,
    InstagramStories,
    Tiktok,
    YoutubeShorts,
    Snapchat,
}

impl From<CliPlatform> for Platform {
    fn from(cli: CliPlatform) -> Self {
        match cli {
            CliPlatform::Facebook => Platform::Facebook,
            CliPlatform::InstagramFeed => Platform::InstagramFeed,
            CliPlatform::InstagramStories => Platform::InstagramStories,
            CliPlatform::Tiktok => Platform::Tiktok,
            CliPlatform::YoutubeShorts => Platform::YoutubeShorts,
            CliPlatform::Snapchat => Platform::Snapchat,
        }
    }
}

#[derive(Parser)]
#[command(name = "brollbot")]
#[command(about = "Turn a video script into B-roll scene suggestions and AI video prompts")]
struct Cli {
    /// Script file. Reads stdin when neither a file nor --text is given.
    file: Option<PathBuf>,

    /// Script text passed inline
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Desired emotional tone
    #[arg(long, default_value = "inspiring")]
    tone: CliTone,

    /// Content format the B-roll should match
    #[arg(long, default_value = "ugc")]
    format: CliFormat,

    /// Target platform; sets the aspect ratio unless --aspect-ratio is given
    #[arg(long)]
    platform: Option<CliPlatform>,

    /// Scene duration in seconds (1-30)
    #[arg(short, long)]
    duration: Option<u32>,

    /// Scene aspect ratio, e.g. 9:16
    #[arg(short, long)]
    aspect_ratio: Option<String>,

    /// AI provider for beat extraction
    #[arg(short, long, default_value = "openai")]
    provider: CliProvider,

    /// Model name, overrides the provider default
    #[arg(short, long)]
    model: Option<String>,

    /// Write scenes as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write scenes as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Seconds to wait for the AI provider
    #[arg(long)]
    timeout: Option<u64>,

    /// Ignore cached beats and ask the provider again
    #[arg(short, long)]
    force: bool,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "brollbot=debug,brollbot_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::from_env()?;

    if let Some(platform) = cli.platform.clone() {
        let platform: Platform = platform.into();
        config.scene.aspect_ratio = platform.preset().aspect_ratio.to_string();
    }
    if let Some(ratio) = &cli.aspect_ratio {
        config.scene.aspect_ratio = check_aspect_ratio("--aspect-ratio", ratio)?;
    }
    if let Some(duration) = cli.duration {
        config.scene.duration = check_duration("--duration", duration)?;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }

    Ok(config)
}

async fn read_script(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read script from {}", path.display()));
    }

    let mut script = String::new();
    tokio::io::stdin()
        .read_to_string(&mut script)
        .await
        .context("Failed to read script from stdin")?;
    Ok(script)
}

fn describe_failure(err: &PipelineError) -> String {
    match err {
        PipelineError::Validation(e) => e.to_string(),
        PipelineError::Analysis(e @ AnalysisError::Timeout { .. }) => {
            format!("{}. Try again, or raise --timeout.", e)
        }
        PipelineError::Analysis(e) if e.is_retryable() => {
            format!("{}. Nothing was saved; you can retry the same script.", e)
        }
        other => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let provider: Provider = cli.provider.clone().into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        exit_with_error(e);
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with_error(e),
    };
    let script = read_script(&cli).await?;
    let request = AnalysisRequest::new(cli.tone.clone().into(), cli.format.clone().into());

    println!(
        "\n{}  {}\n",
        style("brollbot").cyan().bold(),
        style("B-Roll Scene Planner").dim()
    );
    if let Some(platform) = cli.platform.clone() {
        let platform: Platform = platform.into();
        let preset = platform.preset();
        println!(
            "{} {}: {}, {} {}",
            style("✓").green().bold(),
            platform.name(),
            preset.aspect_ratio,
            preset.duration,
            style(format!("({})", preset.focus)).dim()
        );
    }
    println!("{}", style("─".repeat(60)).dim());

    let client = ChatCompletionClient::new(provider, config.model.clone())?;
    let service_label = format!("{} ({})", client.provider().name(), client.model());
    let mut cache = BeatCache::in_default_dir(config.cache_ttl);
    if cli.force {
        cache = cache.refreshing();
    }
    let analyzer = Analyzer::new(Arc::new(client), config).with_cache(cache);

    let total_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Finding {} beats with {}...",
        request.tone, service_label
    ));
    let report = match analyzer.analyze(&script, &request).await {
        Ok(report) => report,
        Err(e) => {
            spinner.finish_and_clear();
            exit_with_error(describe_failure(&e));
        }
    };
    spinner.finish_with_message(format!(
        "{} {} scenes, {} AI-ready {}",
        style("✓").green().bold(),
        report.scenes.len(),
        report.ai_generate_count(),
        style(format!("[{}]", format_duration(total_start.elapsed()))).dim()
    ));

    if let Some(path) = &cli.csv {
        info!(path = %path.display(), rows = report.scenes.len(), "writing csv export");
        fs::write(path, records_to_csv(&report.scenes)).await?;
        println!("{} Saved: {}", style("✓").green().bold(), path.display());
    }
    if let Some(path) = &cli.json {
        info!(path = %path.display(), rows = report.scenes.len(), "writing json export");
        fs::write(path, records_to_json(&report.scenes)?).await?;
        println!("{} Saved: {}", style("✓").green().bold(), path.display());
    }

    println!("{}\n", style("─".repeat(60)).dim());
    if report.scenes.is_empty() {
        println!(
            "{}",
            style("No B-roll moments found. Try a longer script or a different tone.").yellow()
        );
    } else {
        println!("{}", format_report_readable(&report));
    }

    Ok(())
}
