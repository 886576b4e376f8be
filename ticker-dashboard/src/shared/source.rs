/// Payload sources
///
/// A source fetches and decodes one [`DashboardPayload`]. The poller owns a
/// source and calls it once per tick.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use url::Url;

use super::config::DashboardConfig;
use super::error::FetchError;
use super::types::DashboardPayload;

/// Query parameter used to defeat intermediate caches
const CACHE_BUST_PARAM: &str = "t";

/// Fetches one dashboard payload
#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch(&self) -> Result<DashboardPayload, FetchError>;

    /// Human readable location, for logs and the UI footer
    fn describe(&self) -> String;
}

/// `GET <url>?t=<epoch-ms>`
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Source(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }
}

#[async_trait]
impl PayloadSource for HttpSource {
    async fn fetch(&self) -> Result<DashboardPayload, FetchError> {
        let url = cache_busted_url(&self.url, Utc::now().timestamp_millis());
        debug!("Fetching dashboard payload from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        DashboardPayload::from_slice(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Local `data.json` written by the payload producer
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PayloadSource for FileSource {
    async fn fetch(&self) -> Result<DashboardPayload, FetchError> {
        debug!("Reading dashboard payload from {}", self.path.display());
        let body = tokio::fs::read(&self.path).await?;
        DashboardPayload::from_slice(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a source for the configured location
///
/// `http(s)://` → [`HttpSource`]; `file://` or anything else → [`FileSource`].
pub fn source_from_config(config: &DashboardConfig) -> Result<Arc<dyn PayloadSource>, FetchError> {
    let location = config.source.trim();

    if location.starts_with("http://") || location.starts_with("https://") {
        let url = Url::parse(location)
            .map_err(|e| FetchError::Source(format!("{}: {}", location, e)))?;
        return Ok(Arc::new(HttpSource::new(url, config.request_timeout)?));
    }

    if location.starts_with("file://") {
        let path = Url::parse(location)
            .ok()
            .and_then(|url| url.to_file_path().ok())
            .ok_or_else(|| FetchError::Source(format!("{}: not a local file URL", location)))?;
        return Ok(Arc::new(FileSource::new(path)));
    }

    Ok(Arc::new(FileSource::new(location)))
}

/// Append `t=<epoch_ms>`, replacing any previous cache-busting value
pub fn cache_busted_url(base: &Url, epoch_ms: i64) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != CACHE_BUST_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(CACHE_BUST_PARAM, &epoch_ms.to_string());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_url_appends_timestamp() {
        let base = Url::parse("http://localhost:8080/data.json").unwrap();
        let url = cache_busted_url(&base, 1_700_000_000_000);
        assert_eq!(url.as_str(), "http://localhost:8080/data.json?t=1700000000000");
    }

    #[test]
    fn test_cache_busted_url_keeps_other_params() {
        let base = Url::parse("http://localhost/data.json?ticker=ACME&t=1").unwrap();
        let url = cache_busted_url(&base, 42);
        assert_eq!(url.as_str(), "http://localhost/data.json?ticker=ACME&t=42");
    }

    #[test]
    fn test_source_from_config_picks_kind() {
        let http = source_from_config(&DashboardConfig::new("https://dash.example/data.json")).unwrap();
        assert_eq!(http.describe(), "https://dash.example/data.json");

        let file = source_from_config(&DashboardConfig::new("public/data.json")).unwrap();
        assert_eq!(file.describe(), "public/data.json");
    }

    #[test]
    fn test_source_from_config_rejects_bad_url() {
        let result = source_from_config(&DashboardConfig::new("http://"));
        assert!(matches!(result, Err(FetchError::Source(_))));
    }

    #[tokio::test]
    async fn test_file_source_reads_payload() {
        let path = std::env::temp_dir().join(format!(
            "ticker-dashboard-source-{}.json",
            std::process::id()
        ));
        let json = r#"{"ticker":"ACME","metricas_fundamentales":{},"grafico":{"fechas":["2024-01-01"],"precios":[100]},"noticias":[]}"#;
        tokio::fs::write(&path, json).await.unwrap();

        let payload = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(payload.ticker, "ACME");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let result = FileSource::new("/definitely/not/here/data.json").fetch().await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    /// Serve one canned `(status line, body)` per connection and report each
    /// request line back
    async fn serve_canned(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (Url, tokio::sync::mpsc::UnboundedReceiver<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                let request = String::from_utf8_lossy(&request);
                let _ = request_tx.send(request.lines().next().unwrap_or_default().to_string());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        let url = Url::parse(&format!("http://{}/data.json", addr)).unwrap();
        (url, request_rx)
    }

    #[tokio::test]
    async fn test_http_source_fetch_outcomes() {
        let json = r#"{"ticker":"ACME","metricas_fundamentales":{},"grafico":{"fechas":["2024-01-01","2024-01-02"],"precios":[100,110]},"noticias":[]}"#;
        let (url, mut requests) = serve_canned(vec![
            ("200 OK", json),
            ("404 Not Found", "{}"),
            ("200 OK", "<html>"),
        ])
        .await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();

        let payload = source.fetch().await.unwrap();
        assert_eq!(payload.ticker, "ACME");
        assert_eq!(payload.chart.prices, vec![100.0, 110.0]);

        let request_line = requests.recv().await.unwrap();
        assert!(request_line.starts_with("GET /data.json?t="), "{}", request_line);
        let stamp = request_line
            .trim_start_matches("GET /data.json?t=")
            .split_whitespace()
            .next()
            .unwrap();
        assert!(stamp.parse::<i64>().unwrap() > 0);

        let result = source.fetch().await;
        assert_eq!(result, Err(FetchError::Status(404)));

        let result = source.fetch().await;
        assert!(matches!(result, Err(FetchError::Decode(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_http_source_unreachable_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/data.json", addr)).unwrap();
        let result = HttpSource::new(url, Duration::from_secs(5)).unwrap().fetch().await;

        assert!(matches!(result, Err(FetchError::Transport(_))), "{:?}", result);
        assert!(result.unwrap_err().is_transient());
    }
}
