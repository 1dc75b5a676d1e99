//! Logging helpers
//!
//! Subscriber setup plus the small formatting helpers used by progress lines.
use std::fs;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialise the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, defaults to `info`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Write the header of the run log file, truncating any previous content.
///
/// # Arguments
/// - `log_file_path`: file the log consumer appends to
pub fn init_log_file(log_file_path: &str) -> std::io::Result<()> {
    let log_header = format!(
        "{}\nNewsroom bot log - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
}

/// Log process startup.
pub fn log_startup(headless: bool, catalog_version: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "🤖 Newsroom bot starting ({} browser)",
        if headless { "headless" } else { "visible" }
    );
    info!("📚 Category catalog version: {}", catalog_version);
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display.
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
