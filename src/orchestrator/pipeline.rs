//! Article pipeline - orchestration layer
//!
//! Phase 1 of a run: every slot in order through `ArticleFlow`. No browser is
//! involved, and a failing slot never stops the others.

use crate::config::SourceSlot;
use crate::infrastructure::RunLog;
use crate::models::ArticleRecord;
use crate::workflow::{ArticleCtx, ArticleFlow, SkipReason, SlotResult};

/// What Phase 1 produced
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Ready records, in slot order
    pub records: Vec<ArticleRecord>,
    /// (1-based slot number, reason) for every slot that produced nothing
    pub skipped: Vec<(usize, SkipReason)>,
}

impl PipelineOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub async fn generate_articles(
    flow: &ArticleFlow,
    slots: &[SourceSlot],
    log: &RunLog,
) -> PipelineOutcome {
    let mut outcome = PipelineOutcome::default();
    let total = slots.len();

    for (i, slot) in slots.iter().enumerate() {
        let ctx = ArticleCtx::new(i + 1, total);
        match flow.run(slot, ctx, log).await {
            SlotResult::Ready(record) => outcome.records.push(record),
            SlotResult::Skipped(reason) => outcome.skipped.push((ctx.index, reason)),
        }
    }

    if outcome.is_empty() {
        log.warn("No articles were generated. Stopping.");
    } else {
        log.info(format!(
            "✅ Phase 1 Complete. {} article(s) ready.",
            outcome.records.len()
        ));
    }
    outcome
}
