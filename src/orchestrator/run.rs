//! Run trigger - orchestration layer
//!
//! `App` holds what every run shares (config, catalog, log sink, browser
//! launcher). `start_run` checks the request, spawns one worker task and
//! returns at once; the worker runs Phase 1 and, if anything was generated,
//! Phase 2.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::browser::{ChromeLauncher, SessionLauncher};
use crate::config::{Config, RunConfig, RunRequest};
use crate::error::AppResult;
use crate::infrastructure::{LogSink, RunLog};
use crate::models::Catalog;
use crate::orchestrator::form_driver::{DriverReport, FormDriver};
use crate::orchestrator::pipeline::generate_articles;
use crate::services::{ApiKey, ModelGateway, SourceFetcher};
use crate::workflow::{ArticleFlow, FormFlow};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Phase 1 produced nothing; no browser was launched
    NoArticles,
    Completed,
    /// Some article failed, or the session was lost
    CompletedWithErrors,
}

/// Summary returned by a finished worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub label: String,
    pub generated: usize,
    pub skipped: usize,
    pub submitted: usize,
    pub filled_unsaved: usize,
    pub failed: usize,
    pub field_warnings: usize,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn from_phases(
        label: String,
        generated: usize,
        skipped: usize,
        driver: Option<DriverReport>,
    ) -> Self {
        let Some(driver) = driver else {
            return Self {
                label,
                generated,
                skipped,
                submitted: 0,
                filled_unsaved: 0,
                failed: 0,
                field_warnings: 0,
                outcome: RunOutcome::NoArticles,
            };
        };
        let outcome = if driver.fatal.is_some() || driver.failed > 0 {
            RunOutcome::CompletedWithErrors
        } else {
            RunOutcome::Completed
        };
        Self {
            label,
            generated,
            skipped,
            submitted: driver.submitted,
            filled_unsaved: driver.filled_unsaved,
            failed: driver.failed,
            field_warnings: driver.field_warnings,
            outcome,
        }
    }
}

/// Process-wide application state
pub struct App {
    config: Config,
    catalog: Arc<Catalog>,
    sink: Arc<dyn LogSink>,
    launcher: Arc<dyn SessionLauncher>,
    runs: AtomicUsize,
}

impl App {
    pub fn new(
        config: Config,
        catalog: Arc<Catalog>,
        sink: Arc<dyn LogSink>,
        launcher: Arc<dyn SessionLauncher>,
    ) -> Self {
        Self {
            config,
            catalog,
            sink,
            launcher,
            runs: AtomicUsize::new(0),
        }
    }

    /// App that drives a local Chrome.
    pub fn with_chrome(config: Config, catalog: Arc<Catalog>, sink: Arc<dyn LogSink>) -> Self {
        let launcher = Arc::new(ChromeLauncher::from_config(&config));
        Self::new(config, catalog, sink, launcher)
    }

    /// Validate `run` and hand it to a new worker.
    ///
    /// Errors are returned before anything is spawned.
    pub fn start_run(&self, run: RunConfig) -> AppResult<JoinHandle<RunReport>> {
        run.validate()?;

        let fetcher = SourceFetcher::new(self.config.timings.fetch_timeout)?;
        let api_key = ApiKey::new(run.api_key.clone());
        let gateway = ModelGateway::for_run(run.ai_model, api_key, &self.config)?;
        let flow = ArticleFlow::new(fetcher, gateway, self.catalog.clone());

        let number = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let label = format!("run-{}", number);
        info!("📨 Run {} accepted ({} slots)", label, run.slots.len());

        let worker = RunWorker {
            log: RunLog::new(label, self.sink.clone()),
            flow,
            form: FormFlow::new(&run, self.config.timings.clone()),
            launcher: self.launcher.clone(),
            run,
        };
        Ok(tokio::spawn(worker.execute()))
    }

    /// Same as `start_run`, from the flat control-panel payload.
    pub fn start_request(&self, request: RunRequest) -> AppResult<JoinHandle<RunReport>> {
        let run = RunConfig::try_from(request)?;
        self.start_run(run)
    }
}

/// One run, owned by its task
struct RunWorker {
    log: RunLog,
    flow: ArticleFlow,
    form: FormFlow,
    launcher: Arc<dyn SessionLauncher>,
    run: RunConfig,
}

impl RunWorker {
    async fn execute(self) -> RunReport {
        let log = self.log;
        log.info("🤖 Bot thread started. Phase 1: Generating all article content...");
        log.info(format!(
            "🤖 Using {} model for generation.",
            self.run.ai_model.label()
        ));

        let phase1 = generate_articles(&self.flow, &self.run.slots, &log).await;
        let generated = phase1.records.len();
        let skipped = phase1.skipped.len();

        if phase1.is_empty() {
            log.info("🤖 Bot thread finished.");
            return RunReport::from_phases(log.label().to_string(), generated, skipped, None);
        }

        log.info("🚀 Phase 2: Starting browser automation...");
        let driver = FormDriver::new(self.launcher.as_ref(), self.form, log.clone());
        let driver_report = driver.run(&phase1.records).await;

        RunReport::from_phases(log.label().to_string(), generated, skipped, Some(driver_report))
    }
}
