//! Article flow - workflow layer
//!
//! Defines what happens to one source slot:
//! 1. fetch the source text
//! 2. article call
//! 3. metadata call
//! 4. coerce and resolve the metadata, merge into an `ArticleRecord`
//!
//! Every failure skips the slot; nothing here aborts the run.

use std::sync::Arc;

use tracing::debug;

use crate::config::SourceSlot;
use crate::infrastructure::RunLog;
use crate::models::{ArticleRecord, Catalog, GeneratedArticle, MetadataRecord};
use crate::services::model_gateway::ModelGateway;
use crate::services::prompt_builder::{article_prompt, metadata_prompt};
use crate::services::source_fetcher::SourceFetcher;
use crate::services::taxonomy_resolver::resolve_record;
use crate::utils::truncate_text;
use crate::workflow::article_ctx::ArticleCtx;

/// Why a slot produced no article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// URL or instruction missing
    EmptySlot,
    NoSourceContent,
    ArticleGenerationFailed,
    /// Model answered, but without a usable title and body
    MalformedArticle,
    MetadataGenerationFailed,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::EmptySlot => "source URL or prompt missing",
            SkipReason::NoSourceContent => "could not get content from URL",
            SkipReason::ArticleGenerationFailed => "article generation failed",
            SkipReason::MalformedArticle => "article response had no title or body",
            SkipReason::MetadataGenerationFailed => "metadata generation failed",
        }
    }
}

/// Outcome of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResult {
    Ready(ArticleRecord),
    Skipped(SkipReason),
}

/// Article flow
///
/// - owns the capabilities a slot needs
/// - holds no browser
pub struct ArticleFlow {
    fetcher: SourceFetcher,
    gateway: ModelGateway,
    catalog: Arc<Catalog>,
}

impl ArticleFlow {
    pub fn new(fetcher: SourceFetcher, gateway: ModelGateway, catalog: Arc<Catalog>) -> Self {
        Self {
            fetcher,
            gateway,
            catalog,
        }
    }

    pub async fn run(&self, slot: &SourceSlot, ctx: ArticleCtx, log: &RunLog) -> SlotResult {
        let Some((url, instruction)) = slot.parts() else {
            debug!("slot {} is empty, skipping", ctx.index);
            return SlotResult::Skipped(SkipReason::EmptySlot);
        };

        log.info(format!("--- Preparing {} from URL: {} ---", ctx, url));
        debug!("{} instruction: {}", ctx, truncate_text(instruction, 80));

        let Some(source_text) = self.fetcher.fetch(url, log).await else {
            return self.skip(ctx, SkipReason::NoSourceContent, log);
        };

        log.info("--- AI Step 1: Generating Article ---");
        let Some(article_obj) = self
            .gateway
            .generate(&article_prompt(instruction, &source_text), "article generation", log)
            .await
        else {
            return self.skip(ctx, SkipReason::ArticleGenerationFailed, log);
        };
        let Some(article) = GeneratedArticle::from_json(&article_obj) else {
            return self.skip(ctx, SkipReason::MalformedArticle, log);
        };

        log.info("--- AI Step 2: Generating Metadata ---");
        let prompt = metadata_prompt(&self.catalog, &article.title, &article.body);
        let Some(metadata_obj) = self
            .gateway
            .generate(&prompt, "metadata generation", log)
            .await
        else {
            return self.skip(ctx, SkipReason::MetadataGenerationFailed, log);
        };

        let (mut metadata, coercion_warnings) =
            MetadataRecord::from_json(&metadata_obj, &self.catalog);
        let resolution_warnings = resolve_record(&mut metadata, &self.catalog);
        for warning in coercion_warnings.iter().chain(&resolution_warnings) {
            log.warn(format!("⚠️ {}: {}", ctx, warning));
        }

        log.info(format!("✅ Content for {} is ready.", ctx));
        SlotResult::Ready(ArticleRecord::new(article, metadata))
    }

    fn skip(&self, ctx: ArticleCtx, reason: SkipReason, log: &RunLog) -> SlotResult {
        log.warn(format!("🔥 Skipping {}: {}.", ctx, reason.describe()));
        SlotResult::Skipped(reason)
    }
}
