//! In-memory fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use newsroom_bot::browser::{BrowserSession, SessionLauncher};
use newsroom_bot::config::RunConfig;
use newsroom_bot::error::{BrowserError, BrowserResult, GatewayError};
use newsroom_bot::infrastructure::LogSink;
use newsroom_bot::services::model_gateway::JsonObject;
use newsroom_bot::services::GenerationBackend;
use newsroom_bot::{AiModel, SourceSlot};
use serde_json::Value as JsonValue;

/// Every browser action a fake session saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    SetValue(String, String),
    Click(String),
    Tick(String),
    Select(String, String),
    ClickAll(String),
    Script(String),
    Close,
}

#[derive(Default)]
pub struct FakeBrowser {
    pub actions: Mutex<Vec<Action>>,
    /// Element ids that do not exist in the fake page
    pub missing: HashSet<String>,
    /// Dropdown ids whose requested option text is absent
    pub missing_options: HashSet<String>,
    /// Panic when a script is run
    pub panic_on_script: bool,
    /// How many of the next scripts throw
    pub failing_scripts: AtomicUsize,
    ticked: Mutex<HashSet<String>>,
}

impl FakeBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_missing(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            missing: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    pub fn with_missing_options(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            missing_options: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    pub fn with_failing_scripts(count: usize) -> Arc<Self> {
        Arc::new(Self {
            failing_scripts: AtomicUsize::new(count),
            ..Default::default()
        })
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            panic_on_script: true,
            ..Default::default()
        })
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn ticked(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Tick(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn selects(&self) -> Vec<(String, String)> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Select(id, v) => Some((id, v)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }

    fn lookup(&self, id: &str) -> BrowserResult<()> {
        if self.missing.contains(id) {
            Err(BrowserError::ElementNotFound {
                id: id.to_string(),
                waited_ms: 0,
            })
        } else {
            Ok(())
        }
    }
}

/// Session handed out by `FakeLauncher`; forwards to the shared `FakeBrowser`.
pub struct FakeSession(pub Arc<FakeBrowser>);

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.0.record(Action::Navigate(url.to_string()));
        Ok(())
    }

    async fn set_value(&self, element_id: &str, value: &str) -> BrowserResult<()> {
        self.0.lookup(element_id)?;
        self.0
            .record(Action::SetValue(element_id.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&self, element_id: &str) -> BrowserResult<()> {
        self.0.lookup(element_id)?;
        self.0.record(Action::Click(element_id.to_string()));
        Ok(())
    }

    async fn tick_checkbox(&self, element_id: &str) -> BrowserResult<bool> {
        self.0.lookup(element_id)?;
        self.0.record(Action::Tick(element_id.to_string()));
        Ok(self.0.ticked.lock().unwrap().insert(element_id.to_string()))
    }

    async fn select_by_visible_text(&self, element_id: &str, text: &str) -> BrowserResult<()> {
        self.0.lookup(element_id)?;
        if self.0.missing_options.contains(element_id) {
            return Err(BrowserError::OptionNotFound {
                id: element_id.to_string(),
                option: text.to_string(),
            });
        }
        self.0
            .record(Action::Select(element_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn click_all(&self, selector: &str, _settle: Duration) -> BrowserResult<usize> {
        self.0.record(Action::ClickAll(selector.to_string()));
        Ok(2)
    }

    async fn run_script(&self, script: &str) -> BrowserResult<JsonValue> {
        if self.0.panic_on_script {
            panic!("editor script blew up");
        }
        let failing = self
            .0
            .failing_scripts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(BrowserError::Script("CKEDITOR is not defined".to_string()));
        }
        self.0.record(Action::Script(script.to_string()));
        Ok(JsonValue::Null)
    }

    async fn close(&self) -> BrowserResult<()> {
        self.0.record(Action::Close);
        Ok(())
    }
}

pub struct FakeLauncher {
    pub browser: Arc<FakeBrowser>,
    pub launches: AtomicUsize,
    pub fail: bool,
}

impl FakeLauncher {
    pub fn new(browser: Arc<FakeBrowser>) -> Arc<Self> {
        Arc::new(Self {
            browser,
            launches: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BrowserError::Launch("no chrome here".to_string()));
        }
        Ok(Box::new(FakeSession(self.browser.clone())))
    }
}

/// Backend answering from a fixed queue of results.
pub struct StubBackend {
    replies: Mutex<Vec<Result<JsonObject, GatewayError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    /// `replies` are served in order.
    pub fn new(replies: Vec<Result<JsonObject, GatewayError>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    fn provider(&self) -> &'static str {
        "Stub"
    }

    async fn generate(&self, prompt: &str) -> Result<JsonObject, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(GatewayError::EmptyPayload { provider: "Stub" }))
    }
}

/// Sink keeping every line.
#[derive(Default)]
pub struct CollectingSink {
    pub lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl LogSink for CollectingSink {
    fn send(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

pub fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(obj) => obj,
        other => panic!("not an object: {}", other),
    }
}

pub fn run_config(slots: Vec<SourceSlot>, save_button_id: Option<&str>) -> RunConfig {
    RunConfig {
        ai_model: AiModel::Gemini,
        api_key: "test-key".to_string(),
        login_url: "https://cms.example.com/user/login".to_string(),
        username: "editor".to_string(),
        password: "secret".to_string(),
        add_article_url: "https://cms.example.com/node/add/article".to_string(),
        save_button_id: save_button_id.map(str::to_string),
        slots,
    }
}

pub const KENYA: &str = "edit-field-country-und-0-720-720-children-721-721-children-727-727";
pub const AFRICA: &str = "edit-field-country-und-0-720-720";
pub const EASTERN_AFRICA: &str = "edit-field-country-und-0-720-720-children-721-721";
