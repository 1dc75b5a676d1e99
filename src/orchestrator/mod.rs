//! Orchestration layer
//!
//! ## Modules
//!
//! ### `run` - run trigger
//! - process-wide state (`App`)
//! - validates a run and spawns its worker
//! - builds the final `RunReport`
//!
//! ### `pipeline` - Phase 1
//! - every slot in order through `ArticleFlow`
//!
//! ### `form_driver` - Phase 2
//! - owns the browser session
//! - the step state machine and its failure policy
//!
//! ## Layering
//!
//! ```text
//! run (one worker per trigger)
//!     ↓
//! pipeline / form_driver
//!     ↓
//! workflow::{ArticleFlow, FormFlow}
//!     ↓
//! services (fetch / gateway / prompts / resolver)
//!     ↓
//! infrastructure (JsExecutor, log sink)
//! ```
//!
//! Only this layer holds a browser session or spawns tasks.

pub mod form_driver;
pub mod pipeline;
pub mod run;

pub use form_driver::{DriverReport, FormDriver};
pub use pipeline::{generate_articles, PipelineOutcome};
pub use run::{App, RunOutcome, RunReport};
