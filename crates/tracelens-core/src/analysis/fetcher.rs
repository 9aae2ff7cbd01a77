//! Content fetching.
//!
//! Best effort: a failed fetch never fails the analysis, the placeholder
//! text is analyzed instead.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::model::FetchOrigin;
use super::upstream::ContentSource;

/// Largest page body read, in bytes (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Plain GET over reqwest. Stops reading once the body reaches
/// `max_body_bytes`.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str, max_body_bytes: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self {
            client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl ContentSource for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Fetching {} returned HTTP {}", url, status);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read response body")?
        {
            let room = self.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(url, max_bytes = self.max_body_bytes, "Response body capped");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Text to analyze and where it came from.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub text: String,
    pub origin: FetchOrigin,
}

/// Placeholder analyzed when the page can't be retrieved.
pub fn placeholder_text(url: &str) -> String {
    format!(
        "Unable to fetch content from {}. Analysis is based on the URL alone.",
        url
    )
}

/// Wraps a [`ContentSource`], swallows its failures and caps what it
/// returns at `max_body_bytes`.
#[derive(Clone)]
pub struct ContentFetcher {
    source: Arc<dyn ContentSource>,
    max_body_bytes: usize,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub async fn fetch(&self, url: &str) -> FetchedContent {
        match self.source.fetch_text(url).await {
            Ok(mut text) => {
                let kept = tracelens_token::truncate_to_char_boundary(&text, self.max_body_bytes).len();
                text.truncate(kept);
                debug!(url, bytes = text.len(), "Fetched content");
                FetchedContent {
                    text,
                    origin: FetchOrigin::Live,
                }
            }
            Err(e) => {
                warn!(url, error = %e, "Content fetch failed, using placeholder");
                FetchedContent {
                    text: placeholder_text(url),
                    origin: FetchOrigin::Placeholder,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::get,
        Router,
    };

    struct StaticSource(&'static str);

    #[async_trait]
    impl ContentSource for StaticSource {
        async fn fetch_text(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            anyhow::bail!("Fetching {} returned HTTP 404 Not Found", url)
        }
    }

    #[tokio::test]
    async fn test_live_content() {
        let fetcher = ContentFetcher::new(Arc::new(StaticSource("<p>hello</p>")));
        let fetched = fetcher.fetch("https://example.com").await;
        assert_eq!(fetched.text, "<p>hello</p>");
        assert_eq!(fetched.origin, FetchOrigin::Live);
    }

    #[tokio::test]
    async fn test_failure_yields_placeholder() {
        let fetcher = ContentFetcher::new(Arc::new(FailingSource));
        let fetched = fetcher.fetch("https://example.com/missing").await;
        assert_eq!(fetched.origin, FetchOrigin::Placeholder);
        assert!(fetched.text.contains("https://example.com/missing"));
        assert_eq!(fetched.text, placeholder_text("https://example.com/missing"));
    }

    #[tokio::test]
    async fn test_oversized_source_is_capped() {
        struct HugeSource;

        #[async_trait]
        impl ContentSource for HugeSource {
            async fn fetch_text(&self, _url: &str) -> Result<String> {
                Ok("é".repeat(1000))
            }
        }

        let fetcher = ContentFetcher::new(Arc::new(HugeSource)).with_max_body_bytes(101);
        let fetched = fetcher.fetch("https://example.com/huge").await;
        assert_eq!(fetched.origin, FetchOrigin::Live);
        assert_eq!(fetched.text.len(), 100);
        assert!(fetched.text.chars().all(|c| c == 'é'));
    }

    fn http_fetcher(max_body_bytes: usize) -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(2), "tracelens-test", max_body_bytes)
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_fetcher_live_page() {
        let router = Router::new().route(
            "/article",
            get(|headers: HeaderMap| async move {
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("<h1>Breaking</h1> fetched by {}", agent)
            }),
        );
        let base = spawn_server(router).await;

        let fetcher = ContentFetcher::new(Arc::new(http_fetcher(DEFAULT_MAX_BODY_BYTES)));
        let fetched = fetcher.fetch(&format!("{}/article", base)).await;
        assert_eq!(fetched.origin, FetchOrigin::Live);
        assert_eq!(fetched.text, "<h1>Breaking</h1> fetched by tracelens-test");
    }

    #[tokio::test]
    async fn test_http_fetcher_error_status_yields_placeholder() {
        let router = Router::new().route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "no such page") }),
        );
        let base = spawn_server(router).await;
        let url = format!("{}/gone", base);

        let err = http_fetcher(DEFAULT_MAX_BODY_BYTES)
            .fetch_text(&url)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));

        let fetcher = ContentFetcher::new(Arc::new(http_fetcher(DEFAULT_MAX_BODY_BYTES)));
        let fetched = fetcher.fetch(&url).await;
        assert_eq!(fetched.origin, FetchOrigin::Placeholder);
        assert_eq!(fetched.text, placeholder_text(&url));
    }

    #[tokio::test]
    async fn test_http_fetcher_stops_at_body_cap() {
        let router = Router::new().route("/big", get(|| async { "x".repeat(50_000) }));
        let base = spawn_server(router).await;

        let text = http_fetcher(1024)
            .fetch_text(&format!("{}/big", base))
            .await
            .unwrap();
        assert_eq!(text.len(), 1024);
    }

    #[tokio::test]
    async fn test_http_fetcher_unreachable_host() {
        let fetcher = ContentFetcher::new(Arc::new(http_fetcher(DEFAULT_MAX_BODY_BYTES)));
        let fetched = fetcher.fetch("http://127.0.0.1:9/article").await;
        assert_eq!(fetched.origin, FetchOrigin::Placeholder);
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_malformed_url() {
        let fetcher = http_fetcher(DEFAULT_MAX_BODY_BYTES);
        assert!(fetcher.fetch_text("not a url").await.is_err());
    }
}
