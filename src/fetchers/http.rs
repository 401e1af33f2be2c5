use crate::fetchers::{FetchError, Fetcher};
use crate::results::FetchResult;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// User agent sent with every homepage request
pub const DEFAULT_USER_AGENT: &str = concat!("site-scan/", env!("CARGO_PKG_VERSION"));

/// Fetches homepages over HTTP with a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a fetcher that identifies itself with `user_agent`
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Performs the GET and reads the whole body, bounded by `timeout`
    async fn try_fetch(
        &self,
        origin: &str,
        timeout: Duration,
    ) -> Result<(u16, String), FetchError> {
        let url = Url::parse(origin)?;

        let request = async {
            let response = self.client.get(url).send().await?;
            // No status filtering: error pages are scanned like any other
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FetchError::Timeout(timeout)),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, origin: &str, timeout: Duration) -> FetchResult {
        let start = Instant::now();
        ::log::debug!("FETCH: {}", origin);

        match self.try_fetch(origin, timeout).await {
            Ok((status, body)) => {
                ::log::debug!(
                    "Fetched {} ({}, {} bytes) in {:.2} seconds",
                    origin,
                    status,
                    body.len(),
                    start.elapsed().as_secs_f64()
                );
                FetchResult::fetched(origin, status, body)
            }
            Err(e) => {
                ::log::error!("Failed to fetch the homepage of {}: {}", origin, e);
                FetchResult::failed(origin, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::FetchOutcome;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a random local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let origin = serve_once(
            "200 OK",
            "<script src=\"https://www.googletagmanager.com/gtm.js\"></script>",
        )
        .await;
        let fetcher = HttpFetcher::new().unwrap();

        let result = fetcher.fetch(&origin, Duration::from_secs(5)).await;

        assert!(result.succeeded());
        assert_eq!(result.origin, origin);
        assert!(result.body.contains("googletagmanager.com"));
        assert!(matches!(result.outcome, FetchOutcome::Fetched { status: 200 }));
    }

    #[tokio::test]
    async fn test_fetch_keeps_error_page_body() {
        let origin = serve_once("404 Not Found", "nothing here").await;
        let fetcher = HttpFetcher::new().unwrap();

        let result = fetcher.fetch(&origin, Duration::from_secs(5)).await;

        assert!(result.succeeded());
        assert_eq!(result.body, "nothing here");
        assert!(matches!(result.outcome, FetchOutcome::Fetched { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher
            .fetch(&format!("http://{}", addr), Duration::from_millis(200))
            .await;

        assert!(!result.succeeded());
        assert!(result.body.is_empty());
        assert!(matches!(result.error(), Some(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher
            .fetch(&format!("http://{}", addr), Duration::from_secs(5))
            .await;

        assert!(!result.succeeded());
        assert!(matches!(result.error(), Some(FetchError::Request(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url", Duration::from_secs(1)).await;

        assert!(!result.succeeded());
        assert!(matches!(result.error(), Some(FetchError::InvalidUrl(_))));
    }
}
