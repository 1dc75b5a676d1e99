//! # Newsroom Bot
//!
//! Turns a handful of source URLs into CMS-ready news articles and files them
//! through the CMS's article form in a headless browser.
//!
//! ## Architecture
//!
//! Four layers, each depending only on the ones below it:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - holds scarce resources, exposes capabilities only
//! - `JsExecutor` - the only owner of the Chrome page, implements `BrowserSession`
//! - `RunLog` / `LogSink` - per-run logging into the shared, bounded log channel
//!
//! ### ② Services
//! - `services/` - what the bot can do, one item at a time
//! - `SourceFetcher` - URL to paragraph text
//! - `ModelGateway` - prompt to JSON object over Gemini or OpenAI (`clients/`)
//! - `prompt_builder` - article and metadata prompts
//! - `taxonomy_resolver` - ancestor-complete category selections
//!
//! ### ③ Workflow
//! - `workflow/` - what happens to one slot, and to one article form
//! - `ArticleFlow` - fetch, article call, metadata call, resolve
//! - `FormFlow` - login and the individual form steps
//!
//! ### ④ Orchestration
//! - `orchestrator/run` - `App::start_run`, one worker task per run
//! - `orchestrator/pipeline` - Phase 1 over all slots
//! - `orchestrator/form_driver` - Phase 2 state machine, session owner
//!
//! ## Modules

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// common re-exports
pub use browser::{BrowserSession, ChromeLauncher, SessionLauncher};
pub use config::{AiModel, Config, RunConfig, RunRequest, SourceSlot};
pub use error::{AppError, AppResult};
pub use infrastructure::{ChannelSink, JsExecutor, LogSink, RunLog};
pub use models::{ArticleRecord, Catalog, MetadataRecord};
pub use orchestrator::{App, RunOutcome, RunReport};
pub use workflow::{ArticleCtx, ArticleFlow, FormFlow};
