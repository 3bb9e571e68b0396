//! Crawler module for ads.txt fetching
//!
//! This module contains the crawling logic, including:
//! - The transport seam and its `reqwest` implementation
//! - The single-file crawl engine with manual redirect handling
//! - Expiration resolution from HTTP caching headers
//! - Bounded-concurrency batch crawling

mod batch;
mod engine;
mod expires;
mod fetcher;
mod types;

pub use batch::{BatchStats, Handler};
pub use engine::Crawler;
pub use expires::{resolve_expires, DEFAULT_EXPIRATION_DAYS};
pub use fetcher::{
    build_http_client, BodyStream, FetchedResponse, HttpTransport, Transport, TransportError,
};
pub use types::{Request, Response};

use crate::config::Config;
use crate::Result;

/// Fetches and parses one ads.txt file with the default configuration
///
/// Builds a fresh HTTP client per call. Keep a [`Crawler`] around when
/// crawling repeatedly.
///
/// # Arguments
///
/// * `request` - The domain and URL to crawl
///
/// # Returns
///
/// * `Ok(Response)` - The parsed file and its expiry
/// * `Err(AdsTxtError)` - The crawl failed
pub async fn get(request: &Request) -> Result<Response> {
    Crawler::new(&Config::default())?.get(request).await
}

/// Crawls many ads.txt files with the default configuration
///
/// Every outcome is handed to `handler` exactly once before this returns.
/// Fails only if the HTTP client cannot be built.
pub async fn get_multiple<H: Handler>(requests: Vec<Request>, handler: H) -> Result<BatchStats> {
    let crawler = Crawler::new(&Config::default())?;
    Ok(crawler.get_multiple(requests, handler).await)
}
