use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use newsroom_bot::utils::logging;
use newsroom_bot::{App, Catalog, ChannelSink, Config, RunConfig, RunReport, RunRequest};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    logging::init();

    // configuration and catalog
    let config = Config::from_env();
    let catalog = Catalog::load(config.catalog_path.as_deref())
        .context("failed to load category catalog")?;
    logging::log_startup(config.headless, catalog.version());

    // log channel and its file consumer
    logging::init_log_file(&config.output_log_file)
        .with_context(|| format!("failed to create log file {}", config.output_log_file))?;
    let (sink, receiver) = ChannelSink::channel(config.log_channel_capacity);
    let consumer = spawn_log_consumer(receiver, config.output_log_file.clone());

    let run = load_run(&config.run_file).await?;
    let output_log_file = config.output_log_file.clone();

    let app = App::with_chrome(config, Arc::new(catalog), Arc::new(sink));
    let report = app.start_run(run)?.await.context("run worker panicked")?;
    print_final_stats(&report, &output_log_file);

    // dropping the last sender ends the consumer
    drop(app);
    if let Err(e) = consumer.await {
        warn!("log consumer stopped abnormally: {}", e);
    }

    Ok(())
}

/// Read the run description: `.json` files hold the flat control-panel
/// payload, anything else is a TOML `RunConfig`.
async fn load_run(path: &str) -> Result<RunConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read run file {}", path))?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let run = if is_json {
        let request: RunRequest = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse run file {}", path))?;
        RunConfig::try_from(request)?
    } else {
        RunConfig::from_toml_str(&content, path)?
    };
    info!("✓ Loaded run file {} ({} slots)", path, run.slots.len());
    Ok(run)
}

fn spawn_log_consumer(mut receiver: mpsc::Receiver<String>, path: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut file = match OpenOptions::new().append(true).create(true).open(&path).await {
            Ok(file) => file,
            Err(e) => {
                error!("cannot open log file {}: {}", path, e);
                // keep draining so senders never see a full channel
                while receiver.recv().await.is_some() {}
                return;
            }
        };
        while let Some(line) = receiver.recv().await {
            if let Err(e) = file.write_all(format!("{}\n", line).as_bytes()).await {
                error!("failed to write log line: {}", e);
            }
        }
        let _ = file.flush().await;
    })
}

fn print_final_stats(report: &RunReport, output_log_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Run {} finished: {:?}", report.label, report.outcome);
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📰 Generated: {} (skipped slots: {})", report.generated, report.skipped);
    info!("✅ Submitted: {}", report.submitted);
    info!("📝 Filled, not saved: {}", report.filled_unsaved);
    info!("❌ Failed: {}", report.failed);
    info!("⚠️ Field warnings: {}", report.field_warnings);
    info!("{}", "=".repeat(60));
    info!("\nLog saved to: {}", output_log_file);
}
