// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time Stream Player
//!
//! Loads a pattern file, merges its tracks and plays the result in real time,
//! logging every payload as it fires.
//!
//! Run with: cargo run --bin timestream-player -- [--dump] [pattern.json]
//!
//! Without a pattern file a built-in kick/snare beat is played. `--dump`
//! prints the merged absolute-time timeline as JSON instead of playing it.
//!
//! Environment:
//! - `TIMESTREAM_UNIT_MICROS`: length of one time unit (default 1000, i.e. ms)
//! - `TIMESTREAM_TRAILING_REST`: wait out a closing rest (default true)
//! - `RUST_LOG`: log filter

use anyhow::{Context, Result};
use cim_time_stream::{Pattern, Player, PlayerConfig};
use tracing::{info, warn};

const DEFAULT_PATTERN: &str = r#"{
    "tracks": {
        "kick":  [["kick", 0], ["kick", 500], ["kick", 500], {"rest": 500}],
        "snare": [["snare", 500], ["snare", 500]]
    },
    "join": true
}"#;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Print the timeline instead of playing it
    dump: bool,
    /// Pattern file; the built-in beat when absent
    pattern: Option<String>,
}

impl Options {
    fn from_args() -> Result<Self> {
        let mut options = Self::default();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--dump" => options.dump = true,
                flag if flag.starts_with("--") => anyhow::bail!("Unknown flag: {}", flag),
                path => options.pattern = Some(path.to_string()),
            }
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = Options::from_args()?;
    let config = PlayerConfig::from_env().context("Invalid player configuration")?;

    let pattern = match &options.pattern {
        Some(path) => {
            Pattern::load(path).with_context(|| format!("Failed to load pattern {}", path))?
        }
        None => Pattern::from_json(DEFAULT_PATTERN).context("Built-in pattern is invalid")?,
    };

    info!("🥁 Pattern loaded: {} track(s)", pattern.tracks.len());

    if options.dump {
        let timeline = pattern.timeline().context("Failed to merge tracks")?;
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    let mut stream = pattern.into_stream().context("Failed to merge tracks")?;
    let player = Player::new(config);

    let stop = player.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹ Stop requested, finishing current event");
            stop.stop();
        }
    });

    info!("▶ Playing (unit = {:?})", player.config().unit());
    let delivered = player
        .consume_with_time(&mut stream, |payloads| info!("🎵 {}", payloads.join(" + ")))
        .await
        .context("Playback failed")?;

    info!("✅ Played {} event(s)", delivered);
    Ok(())
}
