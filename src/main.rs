//! Keyscan Diagnostics - host harness
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. An optional JSON-lines event file is replayed into the
//! engine on a producer thread, standing in for the scan driver.
//!
//! ```text
//! keyscan-diag [--config PATH] [--replay EVENTS.jsonl] [--export REPORT.json]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use keyscan_diagnostics::{Config, Diagnostics, KeyEvent, RequestRouter};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Parser, Debug)]
#[command(name = "keyscan-diag")]
#[command(about = "Scan-matrix diagnostics over JSON lines on stdin/stdout")]
#[command(version)]
struct Args {
    /// Config file to use instead of the platform default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines file of key events to feed into the engine.
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Write a JSON report to this path on exit.
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Using default config: {}", e);
            Config::default()
        }),
    };
    config.validate()?;
    Ok(config)
}

/// Feed events from a JSON-lines file until it ends or `running` clears.
fn spawn_replay(
    path: PathBuf,
    diagnostics: Arc<Diagnostics>,
    running: Arc<AtomicBool>,
) -> Result<JoinHandle<Result<u64>>> {
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;

    let handle = thread::spawn(move || {
        let mut replayed = 0u64;
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: KeyEvent = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", path.display(), line_no + 1))?;
            diagnostics.record_event(event.position, event.pressed, event.timestamp_ms);
            replayed += 1;
        }
        info!("Replayed {} events from {}", replayed, path.display());
        Ok(replayed)
    });

    Ok(handle)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let diagnostics = Arc::new(Diagnostics::from_config(&config));

    // First Ctrl-C ends the session after the current request, second one exits
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            if !running.swap(false, Ordering::SeqCst) {
                std::process::exit(130);
            }
        })
        .context("installing Ctrl-C handler")?;
    }

    let producer = match args.replay {
        Some(path) => Some(spawn_replay(
            path,
            Arc::clone(&diagnostics),
            Arc::clone(&running),
        )?),
        None => None,
    };

    let mut router = RequestRouter::new(&diagnostics);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = line?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        let response = router.handle_bytes(request.as_bytes());
        stdout.write_all(&response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    running.store(false, Ordering::SeqCst);
    if let Some(handle) = producer {
        match handle.join() {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Replay stopped: {:#}", e),
            Err(_) => warn!("Replay thread panicked"),
        }
    }

    let report = router.report();
    if let Some(path) = args.export {
        report
            .export_json(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    eprintln!("\n{}", report.to_text());
    Ok(())
}
