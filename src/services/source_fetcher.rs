//! Source fetch service - capability layer
//!
//! Turns a source URL into plain paragraph text. Failures are soft: the caller
//! gets "no content" and skips the slot.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::FetchError;
use crate::infrastructure::RunLog;

/// Browser-like identification; several news sites refuse bare clients.
const USER_AGENT: &str = "Mozilla/5.0";

/// Source text fetcher
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    /// # Arguments
    /// - `timeout`: bound on the whole request, body included
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its paragraph text, or `None` on any failure.
    pub async fn fetch(&self, url: &str, log: &RunLog) -> Option<String> {
        if !is_web_url(url) {
            debug!("not fetching '{}': not a web URL", url);
            return None;
        }
        log.info(format!("🕸️ Fetching content from {}...", url));
        match self.fetch_text(url).await {
            Ok(text) => {
                log.info(format!("✅ Successfully scraped {} characters.", text.chars().count()));
                Some(text)
            }
            Err(e) => {
                log.warn(format!("🔥 URL scraping failed: {}", e));
                None
            }
        }
    }

    /// Single GET, no retry.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if !is_web_url(url) {
            return Err(FetchError::UnsupportedUrl(url.to_string()));
        }
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
            });
        }
        let html = response.text().await?;
        let text = extract_paragraph_text(&html);
        if text.is_empty() {
            return Err(FetchError::EmptyContent);
        }
        Ok(text)
    }
}

/// Cheap scheme guard, not a URL validator.
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

/// Text of every `<p>` in document order, joined by single spaces.
/// Paragraphs with no text are left out.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    document
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("https://example.com"));
        assert!(is_web_url("HTTP://example.com"));
        assert!(!is_web_url(""));
        assert!(!is_web_url("ftp://example.com"));
        assert!(!is_web_url("example.com"));
    }

    #[test]
    fn test_extract_paragraph_text_in_order() {
        let html = r#"
            <html><head><title>Ignored</title></head>
            <body>
              <h1>Headline</h1>
              <p>First <b>bold</b> line.</p>
              <div><p>Second</p></div>
              <p>   </p>
              <p>Third</p>
            </body></html>"#;
        assert_eq!(extract_paragraph_text(html), "First bold line. Second Third");
    }

    #[test]
    fn test_extract_without_paragraphs() {
        assert_eq!(extract_paragraph_text("<div>no paragraphs</div>"), "");
    }

    #[tokio::test]
    async fn test_rejects_non_web_url_without_request() {
        let fetcher = SourceFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch_text("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedUrl(_)));
        assert!(fetcher.fetch("", &RunLog::detached("t")).await.is_none());
    }
}
