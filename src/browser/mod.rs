//! Browser capability consumed by the form driver.
//!
//! The driver only talks to these traits; `headless::ChromeLauncher` provides
//! the Chrome implementation and tests substitute in-memory fakes.

pub mod headless;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::BrowserResult;

pub use headless::ChromeLauncher;

/// An exclusive, authenticated-or-not browser session.
///
/// Element lookups by id honour the session-wide implicit wait.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Locate the element by id and enter `value` into it.
    async fn set_value(&self, element_id: &str, value: &str) -> BrowserResult<()>;

    /// Pointer click on the element with the given id.
    async fn click(&self, element_id: &str) -> BrowserResult<()>;

    /// Script-invoked click on a checkbox unless it is already checked.
    ///
    /// Returns `true` when the checkbox was ticked by this call.
    async fn tick_checkbox(&self, element_id: &str) -> BrowserResult<bool>;

    /// Select the option whose visible text equals `text`.
    async fn select_by_visible_text(&self, element_id: &str, text: &str) -> BrowserResult<()>;

    /// Script-click every element currently matching `selector`, pausing
    /// `settle` after each click. Returns how many were clicked.
    async fn click_all(&self, selector: &str, settle: Duration) -> BrowserResult<usize>;

    /// Run a script in the page and return its value (`null` for undefined).
    async fn run_script(&self, script: &str) -> BrowserResult<JsonValue>;

    /// Release the session.
    async fn close(&self) -> BrowserResult<()>;
}

/// Acquires browser sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>>;
}
