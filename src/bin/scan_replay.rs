// Воспроизведение лога распознаваний (JSON Lines) через контроллер.
//
// Формат строки:
//   {"at_ms": 0,   "event": {"payload": "A", "symbology": "qr", "corners": [{"x":0,"y":0}, ...]}}
//   {"at_ms": 900, "activate": true}
// Пустые строки и строки с '#' пропускаются.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;
use ultrascan::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "scan_replay", about = "Replay a detection log through the live-scan controller")]
struct Args {
    /// JSON Lines file; stdin when omitted.
    input: Option<PathBuf>,

    /// TOML config (overlay_hide_delay_ms, queue_capacity, symbologies).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore `at_ms` and feed events back to back.
    #[arg(long)]
    no_wait: bool,
}

#[derive(Deserialize, Debug)]
struct ReplayLine {
    #[serde(default)]
    at_ms: u64,
    #[serde(default)]
    activate: bool,
    #[serde(default)]
    event: Option<DetectionEvent>,
}

struct PrintPresenter;

impl OverlayPresenter for PrintPresenter {
    fn show(&mut self, polygon: &Polygon) {
        let pts: Vec<String> = polygon
            .points()
            .iter()
            .map(|p| format!("({:.1},{:.1})", p.x, p.y))
            .collect();
        println!("overlay show {}", pts.join(" "));
    }

    fn hide(&mut self) {
        println!("overlay hide");
    }
}

fn read_lines(input: Option<&PathBuf>) -> Result<Vec<ReplayLine>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut out = Vec::new();
    for (no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: ReplayLine = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: bad replay record", no + 1))?;
        out.push(parsed);
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    let tail = config.hide_delay() + Duration::from_millis(50);
    let lines = read_lines(args.input.as_ref())?;

    let handler = |code: &NewCode| {
        println!(
            "NEW {} {:?} (#{})",
            code.symbology, code.payload, code.detection_count
        );
    };
    let (handle, task) = ScanController::new(config, PrintPresenter, handler).spawn();

    let start = Instant::now();
    for line in lines {
        if !args.no_wait {
            tokio::time::sleep_until(start + Duration::from_millis(line.at_ms)).await;
        }
        if line.activate {
            handle.activate().await?;
        }
        if let Some(event) = line.event {
            handle.detected(event).await?;
        }
    }

    // даём последнему скрытию отработать
    tokio::time::sleep(tail).await;
    drop(handle);

    let summary = task.await.context("controller task failed")?;
    println!(
        "codes reported: {}, session count: {}",
        summary.codes_reported, summary.detection_count
    );
    Ok(())
}
