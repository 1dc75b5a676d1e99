//! JS executor - infrastructure layer
//!
//! Owns the one Chrome page of a run and exposes it only as the
//! `BrowserSession` capability.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::{CallFunctionOnReturns, ExceptionDetails};
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::browser::BrowserSession;
use crate::error::{BrowserError, BrowserResult};

/// Polling interval of the implicit wait
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const TICK_CHECKBOX_FN: &str =
    "function() { if (this.checked) { return false; } this.click(); return true; }";

const SCRIPT_CLICK_FN: &str = "function() { this.click(); }";

/// JS executor
///
/// - holds the only `Page` of the session
/// - knows nothing about articles or taxonomies
pub struct JsExecutor {
    browser: Mutex<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
    implicit_wait: Duration,
}

impl JsExecutor {
    pub fn new(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        implicit_wait: Duration,
    ) -> Self {
        Self {
            browser: Mutex::new(browser),
            page,
            handler_task,
            implicit_wait,
        }
    }

    /// Evaluate `js_code` and return its JSON value.
    pub async fn eval(&self, js_code: impl Into<String>) -> BrowserResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    /// Find an element by id, polling until the implicit wait runs out.
    async fn find_by_id(&self, element_id: &str) -> BrowserResult<Element> {
        let selector = id_selector(element_id);
        let started = Instant::now();
        loop {
            match self.page.find_element(selector.as_str()).await {
                Ok(element) => return Ok(element),
                Err(e) => {
                    if started.elapsed() >= self.implicit_wait {
                        debug!("lookup of '{}' gave up: {}", element_id, e);
                        return Err(BrowserError::ElementNotFound {
                            id: element_id.to_string(),
                            waited_ms: started.elapsed().as_millis(),
                        });
                    }
                }
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

/// CSS attribute selector matching an exact id. Ids from the catalog contain
/// only `[a-z0-9-]`, but quoting keeps odd ids from breaking the selector.
fn id_selector(element_id: &str) -> String {
    let quoted =
        serde_json::to_string(element_id).unwrap_or_else(|_| format!("\"{}\"", element_id));
    format!("[id={}]", quoted)
}

/// Boolean result of a page function, or the exception it threw.
fn script_result(ret: CallFunctionOnReturns) -> BrowserResult<Option<bool>> {
    let exception = ret.exception_details.as_ref().map(exception_message);
    script_bool(ret.result.value, exception)
}

fn script_bool(value: Option<JsonValue>, exception: Option<String>) -> BrowserResult<Option<bool>> {
    match exception {
        Some(message) => Err(BrowserError::Script(message)),
        None => Ok(value.and_then(|v| v.as_bool())),
    }
}

fn exception_message(details: &ExceptionDetails) -> String {
    details
        .exception
        .as_ref()
        .and_then(|e| e.description.clone())
        .unwrap_or_else(|| details.text.clone())
}

fn select_option_fn(text: &str) -> BrowserResult<String> {
    let wanted = serde_json::to_string(text).map_err(|e| BrowserError::Script(e.to_string()))?;
    Ok(format!(
        r#"function() {{
            const wanted = {wanted};
            const option = Array.from(this.options).find(o => o.text.trim() === wanted);
            if (!option) {{ return false; }}
            this.value = option.value;
            this.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }}"#
    ))
}

#[async_trait]
impl BrowserSession for JsExecutor {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn set_value(&self, element_id: &str, value: &str) -> BrowserResult<()> {
        let element = self.find_by_id(element_id).await?;
        element.focus().await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn click(&self, element_id: &str) -> BrowserResult<()> {
        let element = self.find_by_id(element_id).await?;
        element.click().await?;
        Ok(())
    }

    async fn tick_checkbox(&self, element_id: &str) -> BrowserResult<bool> {
        let element = self.find_by_id(element_id).await?;
        let ret = element.call_js_fn(TICK_CHECKBOX_FN, false).await?;
        Ok(script_result(ret)?.unwrap_or(false))
    }

    async fn select_by_visible_text(&self, element_id: &str, text: &str) -> BrowserResult<()> {
        let element = self.find_by_id(element_id).await?;
        let ret = element.call_js_fn(select_option_fn(text)?, false).await?;
        match script_result(ret)? {
            Some(true) => Ok(()),
            _ => Err(BrowserError::OptionNotFound {
                id: element_id.to_string(),
                option: text.to_string(),
            }),
        }
    }

    async fn click_all(&self, selector: &str, settle: Duration) -> BrowserResult<usize> {
        let elements = self.page.find_elements(selector).await?;
        let mut clicked = 0;
        for element in &elements {
            let outcome = match element.call_js_fn(SCRIPT_CLICK_FN, false).await {
                Ok(ret) => script_result(ret).map(|_| ()),
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok(()) => clicked += 1,
                Err(e) => warn!("script click on '{}' failed: {}", selector, e),
            }
            sleep(settle).await;
        }
        Ok(clicked)
    }

    async fn run_script(&self, script: &str) -> BrowserResult<JsonValue> {
        self.eval(script).await
    }

    async fn close(&self) -> BrowserResult<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("waiting for the browser process failed: {}", e);
        }
        self.handler_task.abort();
        closed?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_selector_quotes_id() {
        assert_eq!(id_selector("edit-title"), r#"[id="edit-title"]"#);
        assert_eq!(id_selector(r#"a"b"#), r#"[id="a\"b"]"#);
    }

    #[test]
    fn test_select_option_fn_escapes_text() {
        let js = select_option_fn("Central America & \"Caribbean\"").unwrap();
        assert!(js.contains(r#"const wanted = "Central America & \"Caribbean\"";"#));
    }

    #[test]
    fn test_script_exception_is_an_error() {
        let err =
            script_bool(Some(JsonValue::Bool(false)), Some("TypeError: x".into())).unwrap_err();
        assert!(matches!(err, BrowserError::Script(ref m) if m == "TypeError: x"));
    }

    #[test]
    fn test_script_bool_values() {
        assert_eq!(script_bool(Some(JsonValue::Bool(true)), None).unwrap(), Some(true));
        assert_eq!(script_bool(Some(JsonValue::Bool(false)), None).unwrap(), Some(false));
        assert_eq!(script_bool(None, None).unwrap(), None);
    }

    /// Needs a local Chrome: `cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_live_session_roundtrip() {
        use crate::browser::{ChromeLauncher, SessionLauncher};

        let launcher = ChromeLauncher::new(true, None, Duration::from_secs(2));
        let session = launcher.launch().await.unwrap();
        session
            .navigate("data:text/html,<input id='edit-title'><input type='checkbox' id='cb'>")
            .await
            .unwrap();
        session.set_value("edit-title", "Hello").await.unwrap();
        assert!(session.tick_checkbox("cb").await.unwrap());
        assert!(!session.tick_checkbox("cb").await.unwrap());
        let value = session
            .run_script("document.getElementById('edit-title').value")
            .await
            .unwrap();
        assert_eq!(value, "Hello");
        session.close().await.unwrap();
    }
}
