use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::{BrowserSession, SessionLauncher};
use crate::config::Config;
use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::JsExecutor;

/// Launches a local Chrome for one run.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    headless: bool,
    chrome_executable: Option<PathBuf>,
    implicit_wait: Duration,
}

impl ChromeLauncher {
    pub fn new(
        headless: bool,
        chrome_executable: Option<PathBuf>,
        implicit_wait: Duration,
    ) -> Self {
        Self {
            headless,
            chrome_executable,
            implicit_wait,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.headless,
            config.chrome_executable.clone(),
            config.timings.implicit_wait,
        )
    }

    fn browser_config(&self) -> BrowserResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder();
        builder = if self.headless {
            builder.new_headless_mode().args(vec![
                "--disable-gpu",           // no GPU in containers
                "--no-sandbox",            // containers run as root
                "--disable-dev-shm-usage", // small /dev/shm
            ])
        } else {
            builder.with_head()
        };
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(|e| {
            error!("Failed to configure browser: {}", e);
            BrowserError::Launch(e)
        })
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        if self.headless {
            info!("🚀 Launching headless browser...");
        } else {
            info!("🖥️ Launching visible browser for local debugging...");
        }

        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("Failed to launch browser: {}", e);
            BrowserError::Launch(e.to_string())
        })?;
        debug!("Browser process started");

        // drive the CDP connection in the background
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // give the browser a moment to settle its targets
        sleep(Duration::from_millis(300)).await;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to open page: {}", e);
                handler_task.abort();
                return Err(e.into());
            }
        };

        Ok(Box::new(JsExecutor::new(
            browser,
            page,
            handler_task,
            self.implicit_wait,
        )))
    }
}
