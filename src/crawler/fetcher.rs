//! HTTP transport used by the crawl engine
//!
//! This module handles the network side of a crawl:
//! - The `Transport` trait the engine drives, one GET per call
//! - Building HTTP clients with proper user agent strings and timeouts
//! - Error classification for connection failures
//!
//! Redirects are never followed here. The engine sees every 3xx response and
//! decides itself whether to follow it.

use crate::config::Config;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Streamed response body
pub type BodyStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Network-level failure reaching a server
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

/// A response whose body has not been read yet
///
/// Dropping the value releases the underlying connection without reading the
/// rest of the body.
pub struct FetchedResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// Response headers
    pub headers: HeaderMap,

    /// Body, streamed in chunks
    pub body: BodyStream,
}

impl FetchedResponse {
    /// Creates a response with a body that is already in memory
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self {
            status,
            headers,
            body: stream::once(async move { Ok::<_, std::io::Error>(body) }).boxed(),
        }
    }

    /// Creates a response from a streamed body
    pub fn from_stream(status: StatusCode, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

impl fmt::Debug for FetchedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A capability that issues one HTTP GET
///
/// Implementations must not follow redirects.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a GET request to `url`
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedResponse)` - Any HTTP response, whatever its status
    /// * `Err(TransportError)` - The server could not be reached
    async fn get(&self, url: &Url) -> Result<FetchedResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with a client configured from `config`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    ///
    /// The client must be built with `Policy::none()`, otherwise redirects are
    /// resolved before the engine can count them.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<FetchedResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)))
            .boxed();

        Ok(FetchedResponse::from_stream(status, headers, body))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use adstxt::config::Config;
/// use adstxt::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.user_agent())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}
