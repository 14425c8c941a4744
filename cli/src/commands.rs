use chrono::Duration;
use quill_core::achievements::{self, NextTier};
use quill_core::actions::LoggingDispatcher;
use quill_core::context::{AppConfig, AppConfigExt, TierTableKind, config_path};
use quill_core::input::{self, CharClass, LogicalButton, Timestamp};
use quill_core::status::{StatsReport, StatusRecord};
use quill_core::{Quill, QuillHooks, SessionTracker};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Daemon
// ─────────────────────────────────────────────────────────────────────────────

pub async fn run(config: AppConfig, dry_run: bool) -> Result<(), String> {
    let mut hooks = QuillHooks::from_config(&config);
    if dry_run {
        tracing::info!("Dry run: actions are logged, not executed");
        hooks.dispatcher = Arc::new(LoggingDispatcher);
    }

    let mut quill = Quill::init(config, hooks)
        .await
        .map_err(|e| error_chain(&e))?;

    tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("Termination signal received");
        }
        _ = quill.wait() => {
            tracing::warn!("Input service exited unexpectedly");
        }
    }

    quill.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// "outer: inner: innermost" for an error and its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let _ = write!(out, ": {inner}");
        source = inner.source();
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_status(directory: &Path, json: bool) {
    if json {
        match std::fs::read_to_string(directory.join(StatusRecord::Stats.name())) {
            Ok(text) => println!("{text}"),
            Err(e) => println!("No statistics record in {}: {e}", directory.display()),
        }
        return;
    }
    print!("{}", format_status(directory));
}

pub fn format_status(directory: &Path) -> String {
    let read = |record: StatusRecord| {
        std::fs::read_to_string(directory.join(record.name()))
            .map(|v| v.trim().to_string())
            .ok()
    };
    let mut out = String::new();

    for button in LogicalButton::ALL {
        let state = read(StatusRecord::Button(button)).unwrap_or_else(|| "unknown".into());
        let _ = writeln!(out, "{:<12} {}", button.as_str(), state);
    }
    let mode = read(StatusRecord::WritingMode).unwrap_or_else(|| "unknown".into());
    let _ = writeln!(out, "{:<12} {}", "writing_mode", mode);
    let last = read(StatusRecord::LastAction)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| "none".into());
    let _ = writeln!(out, "{:<12} {}", "last_action", last);

    let stats = read(StatusRecord::Stats)
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok());
    match stats {
        Some(stats) => {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Words:    {} today, {} total ({} pages)",
                stats["stats"]["words_today"], stats["stats"]["words_total"], stats["pages"]
            );
            let _ = writeln!(
                out,
                "Sessions: {}  Streak: {} days",
                stats["stats"]["sessions_total"], stats["stats"]["streak_days"]
            );
            if let Some(title) = stats["achievement"]["current"]["title"].as_str() {
                let _ = writeln!(out, "Title:    {title}");
            }
        }
        None => {
            let _ = writeln!(out, "\nNo statistics published yet");
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tiers
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_tiers(table: TierTableKind, words: Option<u64>) {
    print!("{}", format_tiers(table, words));
}

pub fn format_tiers(table: TierTableKind, words: Option<u64>) -> String {
    let tiers = achievements::tiers_for(table);
    let current = words.and_then(|w| achievements::evaluate(w, tiers));
    let mut out = String::new();

    for (level, tier) in tiers.iter().enumerate() {
        let marker = match &current {
            Some(progress) if progress.level == level => ">",
            _ => " ",
        };
        let _ = writeln!(
            out,
            "{marker} {:>7}  {:<24} {}",
            tier.threshold, tier.title, tier.description
        );
    }

    if let (Some(words), Some(progress)) = (words, current) {
        let _ = writeln!(out);
        match progress.next {
            NextTier::Next { tier, remaining } => {
                let _ = writeln!(out, "{words} words: {remaining} more for {}", tier.title);
            }
            NextTier::MaxReached => {
                let _ = writeln!(out, "{words} words: highest title reached");
            }
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_config(config: &AppConfig) -> Result<(), String> {
    match config_path() {
        Ok(path) => println!("# {}", path.display()),
        Err(e) => println!("# config path unavailable: {e}"),
    }
    let text = config.to_toml().map_err(|e| error_chain(&e))?;
    print!("{text}");
    match config.validate() {
        Ok(()) => println!("\n# configuration is valid"),
        Err(e) => println!("\n# invalid configuration: {e}"),
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Replay
// ─────────────────────────────────────────────────────────────────────────────

/// Typing speed assumed when replaying a text file
const REPLAY_KEY_INTERVAL_MS: i64 = 200;

pub fn replay_file(path: &Path, config: &AppConfig) -> Result<(), String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let report = replay_text(&text, config, input::now());
    print!("{}", report.render());
    Ok(())
}

/// Feed `text` through a fresh tracker as if typed one key every 200ms.
pub fn replay_text(text: &str, config: &AppConfig, start: Timestamp) -> StatsReport {
    let mut tracker = SessionTracker::from_config(config);
    let mut timestamp = start;
    for c in text.chars() {
        tracker.ingest_event(timestamp, char_class(c));
        timestamp += Duration::milliseconds(REPLAY_KEY_INTERVAL_MS);
    }
    StatsReport::new(
        tracker.snapshot_at(timestamp),
        achievements::tiers_for(config.achievement_table),
    )
}

fn char_class(c: char) -> CharClass {
    if c.is_alphanumeric() {
        CharClass::Alphanumeric
    } else if c == ' ' || c == '\n' {
        CharClass::Separator
    } else {
        CharClass::Other
    }
}
