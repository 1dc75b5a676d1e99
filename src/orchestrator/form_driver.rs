//! Form automation driver - orchestration layer
//!
//! Phase 2 of a run as an explicit state machine:
//!
//! ```text
//! Launch -> Authenticate -> Article{i, Navigate -> FillFields -> InjectBody ->
//!     ExpandGroups -> TickCheckboxes -> SelectDropdowns -> Submit -> Throttle}
//!     -> Teardown -> Finished
//! ```
//!
//! `transition` is the whole failure policy:
//! - field-level problems are counted and never change the path
//! - an article-level failure abandons that article and moves on
//! - a fatal failure (launch, login, panic) jumps to teardown
//! - teardown always runs once a session exists
//!
//! Only this module holds the browser session.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::browser::{BrowserSession, SessionLauncher};
use crate::error::BrowserError;
use crate::infrastructure::RunLog;
use crate::models::ArticleRecord;
use crate::workflow::{ArticleCtx, FormFlow, SubmitOutcome};

/// Steps of one article, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStep {
    Navigate,
    FillFields,
    InjectBody,
    ExpandGroups,
    TickCheckboxes,
    SelectDropdowns,
    Submit,
    Throttle,
}

impl ArticleStep {
    /// Next step within the same article; `None` after `Submit` and `Throttle`.
    pub fn next(self) -> Option<ArticleStep> {
        match self {
            ArticleStep::Navigate => Some(ArticleStep::FillFields),
            ArticleStep::FillFields => Some(ArticleStep::InjectBody),
            ArticleStep::InjectBody => Some(ArticleStep::ExpandGroups),
            ArticleStep::ExpandGroups => Some(ArticleStep::TickCheckboxes),
            ArticleStep::TickCheckboxes => Some(ArticleStep::SelectDropdowns),
            ArticleStep::SelectDropdowns => Some(ArticleStep::Submit),
            ArticleStep::Submit | ArticleStep::Throttle => None,
        }
    }
}

impl fmt::Display for ArticleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArticleStep::Navigate => "navigate",
            ArticleStep::FillFields => "fill fields",
            ArticleStep::InjectBody => "inject body",
            ArticleStep::ExpandGroups => "expand groups",
            ArticleStep::TickCheckboxes => "tick checkboxes",
            ArticleStep::SelectDropdowns => "select dropdowns",
            ArticleStep::Submit => "submit",
            ArticleStep::Throttle => "throttle",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Launch,
    Authenticate,
    /// `index` is 0-based into the record list
    Article { index: usize, step: ArticleStep },
    Teardown,
    Finished,
}

/// Result of executing the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Advance,
    /// The current article cannot be completed
    ArticleFailed,
    /// Nothing more can be done in this session
    Fatal,
}

/// The transition table.
pub fn transition(state: DriverState, event: StepEvent, total: usize) -> DriverState {
    use DriverState::*;

    let after_article = |index: usize| {
        if index + 1 < total {
            Article {
                index,
                step: ArticleStep::Throttle,
            }
        } else {
            Teardown
        }
    };

    match (state, event) {
        (Launch, StepEvent::Advance) => Authenticate,
        // no session to release
        (Launch, _) => Finished,

        (Authenticate, StepEvent::Advance) if total > 0 => Article {
            index: 0,
            step: ArticleStep::Navigate,
        },
        (Authenticate, _) => Teardown,

        (Article { .. }, StepEvent::Fatal) => Teardown,
        (
            Article {
                index,
                step: ArticleStep::Throttle,
            },
            _,
        ) => Article {
            index: index + 1,
            step: ArticleStep::Navigate,
        },
        (Article { index, .. }, StepEvent::ArticleFailed) => after_article(index),
        (Article { index, step }, StepEvent::Advance) => match step.next() {
            Some(step) => Article { index, step },
            None => after_article(index),
        },

        (Teardown, _) | (Finished, _) => Finished,
    }
}

/// What Phase 2 did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub submitted: usize,
    pub filled_unsaved: usize,
    pub failed: usize,
    pub field_warnings: usize,
    /// Set when the session was lost to a fatal failure
    pub fatal: Option<String>,
}

/// Form automation driver
pub struct FormDriver<'a> {
    launcher: &'a dyn SessionLauncher,
    flow: FormFlow,
    log: RunLog,
}

impl<'a> FormDriver<'a> {
    pub fn new(launcher: &'a dyn SessionLauncher, flow: FormFlow, log: RunLog) -> Self {
        Self { launcher, flow, log }
    }

    pub async fn run(&self, records: &[ArticleRecord]) -> DriverReport {
        let total = records.len();
        let mut report = DriverReport::default();
        let mut session: Option<Box<dyn BrowserSession>> = None;
        let mut state = DriverState::Launch;

        while state != DriverState::Finished {
            let event = match state {
                DriverState::Launch => match self.launcher.launch().await {
                    Ok(s) => {
                        session = Some(s);
                        StepEvent::Advance
                    }
                    Err(e) => self.fatal(&mut report, format!("could not launch browser: {}", e)),
                },
                DriverState::Authenticate => match session.as_deref() {
                    Some(s) => {
                        let outcome = AssertUnwindSafe(self.flow.authenticate(s, &self.log))
                            .catch_unwind()
                            .await;
                        match outcome {
                            Ok(Ok(())) => StepEvent::Advance,
                            Ok(Err(e)) => self.fatal(&mut report, format!("login failed: {}", e)),
                            Err(panic) => self.fatal(&mut report, panic_message(panic)),
                        }
                    }
                    None => self.fatal(&mut report, "no browser session".to_string()),
                },
                DriverState::Article { index, step } => match session.as_deref() {
                    Some(s) => {
                        let ctx = ArticleCtx::new(index + 1, total);
                        let step_future = self.run_step(s, &records[index], ctx, step, &mut report);
                        let outcome = AssertUnwindSafe(step_future).catch_unwind().await;
                        match outcome {
                            Ok(event) => event,
                            Err(panic) => self.fatal(&mut report, panic_message(panic)),
                        }
                    }
                    None => self.fatal(&mut report, "no browser session".to_string()),
                },
                DriverState::Teardown => {
                    if report.fatal.is_none() {
                        self.log.info("✅✅✅ Batch processing complete! ✅✅✅");
                    }
                    if let Some(s) = session.take() {
                        if let Err(e) = s.close().await {
                            self.log.warn(format!("⚠️ Browser did not close cleanly: {}", e));
                        }
                    }
                    StepEvent::Advance
                }
                DriverState::Finished => StepEvent::Advance,
            };
            state = transition(state, event, total);
        }

        self.log.info("🤖 Bot thread finished.");
        report
    }

    async fn run_step(
        &self,
        session: &dyn BrowserSession,
        record: &ArticleRecord,
        ctx: ArticleCtx,
        step: ArticleStep,
        report: &mut DriverReport,
    ) -> StepEvent {
        let flow = &self.flow;
        let log = &self.log;
        match step {
            ArticleStep::Navigate => {
                log.info(format!("--- Posting Article {}/{} ---", ctx.index, ctx.total));
                match flow.open_form(session, log).await {
                    Ok(()) => StepEvent::Advance,
                    Err(e) => self.article_failed(report, ctx, step, e),
                }
            }
            ArticleStep::FillFields => {
                report.field_warnings += flow.fill_text_fields(session, record, log).await;
                StepEvent::Advance
            }
            ArticleStep::InjectBody => match flow.inject_body(session, record).await {
                Ok(()) => StepEvent::Advance,
                Err(e) => self.article_failed(report, ctx, step, e),
            },
            ArticleStep::ExpandGroups => {
                report.field_warnings += flow.expand_groups(session, log).await;
                StepEvent::Advance
            }
            ArticleStep::TickCheckboxes => {
                report.field_warnings += flow.tick_checkboxes(session, record, log).await;
                StepEvent::Advance
            }
            ArticleStep::SelectDropdowns => {
                report.field_warnings += flow.select_dropdowns(session, record, log).await;
                StepEvent::Advance
            }
            ArticleStep::Submit => match flow.submit(session, ctx, log).await {
                Ok(SubmitOutcome::Saved) => {
                    report.submitted += 1;
                    StepEvent::Advance
                }
                Ok(SubmitOutcome::FilledNotSaved) => {
                    report.filled_unsaved += 1;
                    StepEvent::Advance
                }
                Err(e) => self.article_failed(report, ctx, step, e),
            },
            ArticleStep::Throttle => {
                flow.throttle(log).await;
                StepEvent::Advance
            }
        }
    }

    fn article_failed(
        &self,
        report: &mut DriverReport,
        ctx: ArticleCtx,
        step: ArticleStep,
        error: BrowserError,
    ) -> StepEvent {
        self.log
            .error(format!("🔥 {} abandoned at step '{}': {}", ctx, step, error));
        report.failed += 1;
        StepEvent::ArticleFailed
    }

    fn fatal(&self, report: &mut DriverReport, message: String) -> StepEvent {
        self.log.error(format!(
            "🔥🔥🔥 A critical error occurred in the main worker: {}",
            message
        ));
        report.fatal = Some(message);
        StepEvent::Fatal
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic with non-string payload".to_string()
    }
}
