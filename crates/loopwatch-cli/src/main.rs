//! # loopwatch-cli
//!
//! Thin command-line wrapper over the loopwatch core: `status` reconciles
//! and prints the current sessions, `rotate` prunes the event log, `cancel`
//! deletes an active loop's liveness marker.
//!
//! Exit code 0 on success (including no-op success), non-zero on any
//! failure, with the message on stderr. Diagnostics go to stderr via
//! `tracing` (filtered by `LOOPWATCH_LOG`), so stdout stays clean for
//! `status --json` consumers.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use loopwatch_events::{FileLogStore, FsLiveness, SessionQuery, cancel_loop, load_sessions, rotate};
use loopwatch_settings::LoopwatchSettings;

/// Track, inspect, and prune background loop sessions.
#[derive(Parser, Debug)]
#[command(name = "loopwatch", version, about)]
struct Cli {
    /// Settings file to use instead of `~/.loopwatch/settings.json`.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all sessions reconstructed from the event log.
    Status {
        /// Emit the full query result as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Rotate the event log, purging the oldest fully-resolved sessions.
    Rotate,
    /// Cancel an active loop by deleting its liveness marker.
    Cancel {
        /// The loop's effective identity (loop id, or session id for
        /// legacy records).
        id: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOOPWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => loopwatch_settings::load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => loopwatch_settings::load_settings().context("loading settings")?,
    };

    let store = FileLogStore::new(&settings.storage.log_file);

    match &cli.command {
        Command::Status { json } => status(&store, *json),
        Command::Rotate => run_rotate(&store, &settings),
        Command::Cancel { id } => run_cancel(&store, &settings, id),
    }
}

fn status(store: &FileLogStore, json: bool) -> Result<()> {
    let query = load_sessions(store, &FsLiveness).context("reading event log")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&query)?);
    } else {
        print_table(&query);
    }
    Ok(())
}

fn run_rotate(store: &FileLogStore, settings: &LoopwatchSettings) -> Result<()> {
    let outcome = rotate(
        store,
        settings.rotation.max_entries,
        &settings.storage.transcripts_dir,
    )
    .context("rotating event log")?;

    if !outcome.success {
        bail!(
            "rotation failed, log restored: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    println!(
        "rotated: {} -> {} entries, {} sessions purged",
        outcome.entries_before, outcome.entries_after, outcome.sessions_purged
    );
    Ok(())
}

fn run_cancel(store: &FileLogStore, settings: &LoopwatchSettings, id: &str) -> Result<()> {
    let query = load_sessions(store, &FsLiveness).context("reading event log")?;
    let record = query
        .sessions
        .iter()
        .find(|record| record.id == id)
        .with_context(|| format!("no session with id {id}"))?;

    let outcome = cancel_loop(record, store, &settings.storage.state_dir)?;
    if !outcome.success {
        bail!("{}", outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}

fn print_table(query: &SessionQuery) {
    if query.sessions.is_empty() {
        println!("no sessions recorded");
        return;
    }

    println!(
        "{:<14} {:<22} {:<16} {:<40} {:>10} {:>6}",
        "STATUS", "ID", "PROJECT", "TASK", "DURATION", "ITER"
    );
    for record in &query.sessions {
        println!(
            "{:<14} {:<22} {:<16} {:<40} {:>10} {:>6}",
            record.status.to_string(),
            truncate(&record.id, 22),
            truncate(&record.project_name, 16),
            truncate(&record.task, 40),
            format_duration(record.duration_seconds),
            record.iterations,
        );
    }
    println!();
    println!("{} sessions, {} active", query.total, query.active_count);
}

/// Compact `1h 4m` / `4m 32s` / `32s` rendering.
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}\u{2026}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
