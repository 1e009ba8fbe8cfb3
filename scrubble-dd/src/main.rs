//! scrubble-dd (Duplicate Detection) - Scrobble history duplicate scrubber
//!
//! Reads a scrobble export, runs the duplicate-detection engine over it, and
//! prints a reason-tagged report of the replay and skip artifacts found.
//! Deciding what to delete, and deleting it, belongs to the upstream tooling;
//! this binary only identifies.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use scrubble_common::DetectionParams;
use scrubble_dd::engine::DetectionEngine;
use scrubble_dd::input::load_scrobbles;
use scrubble_dd::providers::{
    CachingProvider, ChainProvider, MusicBrainzProvider, TableProvider,
};
use scrubble_dd::report;
use scrubble_dd::types::DurationProvider;

/// Params file picked up from the working directory when no flag or
/// environment variable names one.
const DEFAULT_PARAMS_FILE: &str = "scrubble.toml";

/// Command-line arguments for scrubble-dd
#[derive(Parser, Debug)]
#[command(name = "scrubble-dd")]
#[command(about = "Duplicate-detection engine for scrobble histories")]
#[command(version)]
struct Args {
    /// Scrobble export file (JSON array, newest first)
    export: PathBuf,

    /// Detection params TOML file
    #[arg(short, long, env = "SCRUBBLE_PARAMS")]
    params: Option<PathBuf>,

    /// Override the session gap threshold (seconds)
    #[arg(short, long, env = "SCRUBBLE_GAP_SECONDS")]
    gap_seconds: Option<i64>,

    /// Duration table TOML file for offline lookups
    #[arg(short, long, env = "SCRUBBLE_DURATIONS")]
    durations: Option<PathBuf>,

    /// Query MusicBrainz for durations the table cannot answer
    #[arg(long, env = "SCRUBBLE_ONLINE")]
    online: bool,

    /// Duration cache file (JSON), loaded before and saved after online runs
    #[arg(short, long, env = "SCRUBBLE_CACHE")]
    cache: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Cap the number of flagged lines in the text report
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the report stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Scrubble Duplicate Detection (scrubble-dd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let params = resolve_params(&args)?;
    info!(
        gap_seconds = params.gap_seconds,
        overlap_fraction = params.overlap_fraction,
        replay_fraction = params.replay_fraction,
        "Detection params resolved"
    );

    let scrobbles = load_scrobbles(&args.export)
        .with_context(|| format!("Failed to load export {}", args.export.display()))?;
    info!("✓ Loaded {} scrobbles from export", scrobbles.len());
    if scrobbles.is_empty() {
        warn!("Export contains no scrobbles; nothing to analyze");
    }

    let (provider, cache_handle) = build_provider(&args).await?;

    let engine = DetectionEngine::with_params(provider, params);
    let result = engine.run(&scrobbles).await;

    if let (Some(cache), Some(path)) = (cache_handle, args.cache.as_deref()) {
        match cache.save_to_file(path).await {
            Ok(count) => info!("✓ Saved {} cached durations to {}", count, path.display()),
            Err(error) => warn!(
                error = %error,
                path = %path.display(),
                "Failed to save duration cache"
            ),
        }
    }

    let output = match args.format {
        OutputFormat::Text => report::render_text(&result, engine.params(), args.limit),
        OutputFormat::Json => report::render_json(&result)?,
    };
    println!("{}", output);

    Ok(())
}

/// Resolve detection params: CLI flag, then environment variable (via clap),
/// then `scrubble.toml` in the working directory, then built-in defaults.
/// A `--gap-seconds` override applies on top of whichever source won.
fn resolve_params(args: &Args) -> Result<DetectionParams> {
    let params = match &args.params {
        Some(path) => DetectionParams::from_toml_file(path)
            .with_context(|| format!("Failed to load params from {}", path.display()))?,
        None => {
            let default_path = Path::new(DEFAULT_PARAMS_FILE);
            if default_path.exists() {
                info!("Using detection params from {}", DEFAULT_PARAMS_FILE);
                DetectionParams::from_toml_file(default_path)
                    .with_context(|| format!("Failed to load params from {}", DEFAULT_PARAMS_FILE))?
            } else {
                DetectionParams::default()
            }
        }
    };

    Ok(match args.gap_seconds {
        Some(gap) => params.with_gap_seconds(gap),
        None => params,
    })
}

/// Compose the duration provider chain for this run.
///
/// Offline runs use the duration table alone. Online runs append a cached
/// MusicBrainz source behind the table; the cache handle comes back so main
/// can persist it after the run.
async fn build_provider(
    args: &Args,
) -> Result<(Arc<dyn DurationProvider>, Option<Arc<CachingProvider>>)> {
    let table = match &args.durations {
        Some(path) => {
            let table = TableProvider::from_toml_file(path)
                .with_context(|| format!("Failed to load duration table {}", path.display()))?;
            info!("✓ Loaded {} track durations from table", table.len());
            table
        }
        None => TableProvider::new(),
    };

    let mut sources: Vec<Arc<dyn DurationProvider>> = vec![Arc::new(table)];
    let mut cache_handle = None;

    if args.online {
        let cached = Arc::new(CachingProvider::new(Arc::new(MusicBrainzProvider::new())));
        if let Some(path) = &args.cache {
            if path.exists() {
                let count = cached
                    .load_from_file(path)
                    .await
                    .with_context(|| format!("Failed to load duration cache {}", path.display()))?;
                info!("✓ Loaded {} cached durations", count);
            } else {
                info!("No duration cache at {}, starting fresh", path.display());
            }
        }
        sources.push(cached.clone() as Arc<dyn DurationProvider>);
        cache_handle = Some(cached);
        info!("Online duration lookup enabled (MusicBrainz, 1 req/s)");
    } else if args.durations.is_none() {
        warn!("No duration source configured; detectors needing durations fall back to their conservative defaults");
    }

    Ok((Arc::new(ChainProvider::new(sources)), cache_handle))
}
