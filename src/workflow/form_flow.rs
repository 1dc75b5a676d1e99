//! Form flow - workflow layer
//!
//! The individual steps of logging in and filling one article form. Steps that
//! touch many fields isolate each field and return how many of them failed;
//! steps that make or break the whole article return an error instead.
//! Ordering of the steps is the driver's business.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::browser::BrowserSession;
use crate::config::{RunConfig, Timings};
use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::RunLog;
use crate::models::form::{
    is_none_sentinel, BODY_EDITOR_INSTANCE, COLLAPSED_GROUP_TOGGLE_SELECTOR, LOGIN_PASSWORD_ID,
    LOGIN_SUBMIT_ID, LOGIN_USERNAME_ID,
};
use crate::models::{ArticleRecord, DropdownField, ForestKind, TextField};
use crate::utils::strip_non_bmp;
use crate::workflow::article_ctx::ArticleCtx;

/// Checkbox sets in the order they are ticked
pub const TICK_ORDER: [ForestKind; 3] = [
    ForestKind::Country,
    ForestKind::Publication,
    ForestKind::Industry,
];

/// How the submit step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// No save button configured
    FilledNotSaved,
}

/// Form flow
pub struct FormFlow {
    login_url: String,
    username: String,
    password: String,
    add_article_url: String,
    save_button_id: Option<String>,
    timings: Timings,
}

impl FormFlow {
    pub fn new(run: &RunConfig, timings: Timings) -> Self {
        Self {
            login_url: run.login_url.clone(),
            username: run.username.clone(),
            password: run.password.clone(),
            add_article_url: run.add_article_url.clone(),
            save_button_id: run.save_button().map(str::to_string),
            timings,
        }
    }

    /// Log in once. Success of the login itself is not verified.
    pub async fn authenticate(
        &self,
        session: &dyn BrowserSession,
        log: &RunLog,
    ) -> BrowserResult<()> {
        log.info("Navigating to login URL...");
        session.navigate(&self.login_url).await?;
        log.info("Entering credentials...");
        session.set_value(LOGIN_USERNAME_ID, &self.username).await?;
        session.set_value(LOGIN_PASSWORD_ID, &self.password).await?;
        log.info("Clicking login button...");
        session.click(LOGIN_SUBMIT_ID).await?;
        pause(self.timings.after_login).await;
        log.info("✅ Login successful.");
        Ok(())
    }

    pub async fn open_form(&self, session: &dyn BrowserSession, log: &RunLog) -> BrowserResult<()> {
        log.info("Navigating to the 'Add Article' page...");
        session.navigate(&self.add_article_url).await?;
        pause(self.timings.after_navigate).await;
        Ok(())
    }

    /// Title and the six metadata text fields. Empty values are not typed.
    pub async fn fill_text_fields(
        &self,
        session: &dyn BrowserSession,
        record: &ArticleRecord,
        log: &RunLog,
    ) -> usize {
        log.info("📝 Filling article form...");
        let mut failed = 0;
        for field in TextField::ALL {
            let value = strip_non_bmp(record.text(field));
            if value.trim().is_empty() {
                debug!("{} is empty, not filled", field.label());
                continue;
            }
            if let Err(e) = session.set_value(field.element_id(), &value).await {
                log.warn(format!("   - ⚠️ Could not fill {}: {}", field.label(), e));
                failed += 1;
            }
        }
        failed
    }

    /// Push the body into the rich-text editor instance.
    pub async fn inject_body(
        &self,
        session: &dyn BrowserSession,
        record: &ArticleRecord,
    ) -> BrowserResult<()> {
        session.run_script(&body_script(&record.body)?).await?;
        Ok(())
    }

    /// Open every collapsed category group so its checkboxes exist in the page.
    pub async fn expand_groups(&self, session: &dyn BrowserSession, log: &RunLog) -> usize {
        log.info("   - Expanding all collapsible sections...");
        match session
            .click_all(COLLAPSED_GROUP_TOGGLE_SELECTOR, self.timings.expand_settle)
            .await
        {
            Ok(clicked) => {
                debug!("expanded {} groups", clicked);
                log.info("   - All sections expanded.");
                0
            }
            Err(e) => {
                log.warn(format!("   - ⚠️ Could not expand sections: {}", e));
                1
            }
        }
    }

    pub async fn tick_checkboxes(
        &self,
        session: &dyn BrowserSession,
        record: &ArticleRecord,
        log: &RunLog,
    ) -> usize {
        let mut failed = 0;
        for kind in TICK_ORDER {
            let ids = record.selections(kind);
            if ids.is_empty() {
                continue;
            }
            log.info(format!("   - Selecting {} checkboxes by ID...", kind));
            for id in ids {
                match session.tick_checkbox(id).await {
                    Ok(true) => log.info(format!("       - Ticked '{}'", id)),
                    Ok(false) => debug!("'{}' already ticked", id),
                    Err(e) => {
                        log.warn(format!(
                            "     - ⚠️ Could not find or tick checkbox with ID '{}': {}",
                            id, e
                        ));
                        failed += 1;
                    }
                }
            }
        }
        failed
    }

    /// Daily subject, key point, then the regional sections. The "- None -"
    /// sentinel leaves a dropdown untouched.
    pub async fn select_dropdowns(
        &self,
        session: &dyn BrowserSession,
        record: &ArticleRecord,
        log: &RunLog,
    ) -> usize {
        let mut failed = 0;
        for field in DropdownField::ALL {
            let Some(value) = record.dropdown(field) else {
                continue;
            };
            if value.trim().is_empty() || is_none_sentinel(value) {
                debug!("{} left unset", field.label());
                continue;
            }
            match session.select_by_visible_text(field.element_id(), value).await {
                Ok(()) => log.info(format!("   - Selected {}: '{}'", field.label(), value)),
                Err(e) => {
                    log.warn(format!(
                        "   - ⚠️ Could not select {} ('{}'): {}",
                        field.label(),
                        value,
                        e
                    ));
                    failed += 1;
                }
            }
        }
        failed
    }

    pub async fn submit(
        &self,
        session: &dyn BrowserSession,
        ctx: ArticleCtx,
        log: &RunLog,
    ) -> BrowserResult<SubmitOutcome> {
        let Some(save_button_id) = &self.save_button_id else {
            log.warn("⚠️ Save button ID not configured. Form filled but not saved.");
            return Ok(SubmitOutcome::FilledNotSaved);
        };
        log.info("🚀 Clicking the final 'Save' button...");
        session.click(save_button_id).await?;
        pause(self.timings.after_save).await;
        log.info(format!("✅ {} submitted successfully!", ctx));
        Ok(SubmitOutcome::Saved)
    }

    pub async fn throttle(&self, log: &RunLog) {
        log.info(format!(
            "--- Pausing for {} seconds before next article ---",
            self.timings.between_articles.as_secs()
        ));
        pause(self.timings.between_articles).await;
    }
}

/// Editor call with the body embedded as a JSON string literal.
pub fn body_script(body: &str) -> BrowserResult<String> {
    let literal = serde_json::to_string(&strip_non_bmp(body))
        .map_err(|e| BrowserError::Script(e.to_string()))?;
    Ok(format!(
        "CKEDITOR.instances['{}'].setData({});",
        BODY_EDITOR_INSTANCE, literal
    ))
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}
