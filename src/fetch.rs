//! Static HTTP acquisition.
//!
//! Not a browser. Plain GET with redirects, a browser-like user agent,
//! retry on 5xx, backoff on 429, and an HTTP/1.1 fallback for servers
//! that reject HTTP/2.

use crate::config::EngineConfig;
use crate::error::ScrapeError;
use std::time::Duration;

/// HTTP client for the static-first fetch stage.
#[derive(Clone)]
pub struct StaticFetcher {
    client: reqwest::Client,
    /// HTTP/1.1-only fallback client for sites that reject HTTP/2.
    h1_client: reqwest::Client,
}

impl StaticFetcher {
    pub fn new(config: &EngineConfig) -> Self {
        let timeout = Duration::from_secs(config.static_timeout_secs);

        // Building only fails when the TLS backend cannot initialize,
        // which nothing downstream can recover from.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(&config.user_agent)
            .build()
            .expect("failed to initialize HTTP client");

        let h1_client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(&config.user_agent)
            .http1_only()
            .build()
            .expect("failed to initialize HTTP/1.1 client");

        Self { client, h1_client }
    }

    /// Fetch a page body as text.
    ///
    /// Non-2xx statuses are errors. Falls back to HTTP/1.1 on protocol
    /// errors (some CDNs close HTTP/2 connections mid-handshake).
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        match self.fetch_inner(&self.client, url).await {
            Ok(body) => Ok(body),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("http2")
                    || err_str.contains("protocol")
                    || err_str.contains("connection closed")
                {
                    self.fetch_inner(&self.h1_client, url).await
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn fetch_inner(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<String, ScrapeError> {
        let mut retries = 0u32;
        let max_retries = 2;

        loop {
            match client.get(url).send().await {
                Ok(r) => {
                    let status = r.status();

                    // Retry on 5xx
                    if status.is_server_error() && retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    // Backoff on 429
                    if status.as_u16() == 429 && retries < max_retries {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        tokio::time::sleep(Duration::from_secs(retry_after.min(10))).await;
                        continue;
                    }

                    let r = r.error_for_status()?;
                    return Ok(r.text().await?);
                }
                Err(e) => {
                    if retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_fetcher_creation() {
        let fetcher = StaticFetcher::new(&EngineConfig::default());
        let _ = fetcher;
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header(
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&EngineConfig::default());
        let body = fetcher
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&EngineConfig::default());
        let body = fetcher.fetch(&format!("{}/old", server.uri())).await.unwrap();
        assert_eq!(body, "moved here");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&EngineConfig::default());
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("fetch failed"));
    }

    #[tokio::test]
    async fn test_fetch_retries_on_5xx() {
        let server = MockServer::start().await;
        // First two responses are 500, the retry budget covers both.
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&EngineConfig::default());
        let body = fetcher
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "recovered");
    }
}
