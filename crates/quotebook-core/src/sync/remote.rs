//! Remote quote collection
//!
//! The remote is a plain REST collection: `GET <url>` returns an array of
//! `{ title, body, ... }` records and `POST <url>` creates one record.
//! Records map to quotes as `title -> category`, `body -> text`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::NetworkError;
use crate::models::Quote;

/// Default remote endpoint
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// A remote collection of quotes
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Endpoint description used in logs and errors
    fn endpoint(&self) -> &str;

    /// Fetch every remote record as a quote
    async fn fetch(&self) -> Result<Vec<Quote>, NetworkError>;

    /// Create one remote record from a quote
    async fn create(&self, quote: &Quote) -> Result<(), NetworkError>;
}

/// Record shape served by the remote
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl From<RemoteRecord> for Quote {
    fn from(record: RemoteRecord) -> Self {
        Quote::new(record.body, record.title)
    }
}

/// HTTP implementation backed by reqwest
pub struct HttpRemote {
    url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client for the collection at `url`
    pub fn new(url: impl Into<String>) -> Result<Self, NetworkError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| NetworkError::Request {
                url: url.clone(),
                source,
            })?;
        Ok(Self { url, client })
    }

    fn request_error(&self, source: reqwest::Error) -> NetworkError {
        NetworkError::Request {
            url: self.url.clone(),
            source,
        }
    }

    fn check_status(&self, response: &reqwest::Response) -> Result<(), NetworkError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NetworkError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl RemoteCollection for HttpRemote {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<Quote>, NetworkError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        self.check_status(&response)?;

        let records: Vec<RemoteRecord> =
            response.json().await.map_err(|source| NetworkError::Decode {
                url: self.url.clone(),
                source,
            })?;
        debug!(count = records.len(), url = %self.url, "Fetched remote records");

        Ok(records.into_iter().map(Quote::from).collect())
    }

    async fn create(&self, quote: &Quote) -> Result<(), NetworkError> {
        let response = self
            .client
            .post(&self.url)
            .json(quote)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        self.check_status(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A request as seen by the test server
    struct Captured {
        head: String,
        body: String,
    }

    /// Serve one canned response on a local port, capturing the request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/posts", listener.local_addr().unwrap());

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers ended");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while raw.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before body ended");
                raw.extend_from_slice(&buf[..n]);
            }
            let request_body = String::from_utf8_lossy(&raw[header_end..]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            Captured {
                head,
                body: request_body,
            }
        });

        (url, task)
    }

    #[tokio::test]
    async fn test_http_fetch_maps_records() {
        let (url, server) = serve_once(
            "200 OK",
            r#"[{"userId": 1, "id": 1, "title": "A", "body": "X"}, {"title": "B", "body": "Y"}]"#,
        )
        .await;
        let remote = HttpRemote::new(url).unwrap();

        let quotes = remote.fetch().await.unwrap();

        assert_eq!(quotes, vec![Quote::new("X", "A"), Quote::new("Y", "B")]);
        let request = server.await.unwrap();
        assert!(request.head.starts_with("GET /posts HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_http_create_posts_text_and_category() {
        let (url, server) = serve_once("201 Created", r#"{"id": 101}"#).await;
        let remote = HttpRemote::new(url).unwrap();

        remote.create(&Quote::new("X", "A")).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.head.starts_with("POST /posts HTTP/1.1"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body, serde_json::json!({"text": "X", "category": "A"}));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, server) = serve_once("500 Internal Server Error", "{}").await;
        let remote = HttpRemote::new(url).unwrap();

        let err = remote.fetch().await.unwrap_err();

        assert!(matches!(err, NetworkError::Status { status: 500, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_unexpected_body_is_decode_error() {
        let (url, server) = serve_once("200 OK", r#"{"not": "a list"}"#).await;
        let remote = HttpRemote::new(url).unwrap();

        let err = remote.fetch().await.unwrap_err();

        assert!(matches!(err, NetworkError::Decode { .. }));
        server.await.unwrap();
    }

    #[test]
    fn test_record_maps_title_to_category() {
        let record: RemoteRecord =
            serde_json::from_str(r#"{"userId": 1, "id": 7, "title": "A", "body": "X"}"#).unwrap();
        assert_eq!(Quote::from(record), Quote::new("X", "A"));
    }

    #[test]
    fn test_record_missing_fields_become_empty() {
        let record: RemoteRecord = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        let quote = Quote::from(record);
        assert!(quote.text.is_empty());
        assert!(quote.category.is_empty());
    }

    #[test]
    fn test_http_remote_endpoint() {
        let remote = HttpRemote::new(DEFAULT_REMOTE_URL).unwrap();
        assert_eq!(remote.endpoint(), DEFAULT_REMOTE_URL);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_network_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let remote = HttpRemote::new("http://127.0.0.1:9/posts").unwrap();
        let err = remote.fetch().await.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Request { .. } | NetworkError::Status { .. } | NetworkError::Decode { .. }
        ));
    }
}
