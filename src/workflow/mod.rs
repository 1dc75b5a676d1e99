pub mod article_ctx;
pub mod article_flow;
pub mod form_flow;

pub use article_ctx::ArticleCtx;
pub use article_flow::{ArticleFlow, SkipReason, SlotResult};
pub use form_flow::{FormFlow, SubmitOutcome};
