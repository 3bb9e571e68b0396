//! Single-file crawl engine
//!
//! One crawl is a small state machine:
//!
//! ```text
//! Fetching -> Classifying -> Redirecting -> Fetching ...
//!                         -> Succeeded
//!                         -> Failed
//! ```
//!
//! # Status Handling
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | HTTP 200 | Read body, parse records, resolve expiry |
//! | HTTP 3xx | Follow `Location` (max hops from config) |
//! | HTTP 4xx | `ClientError`, no further fetch |
//! | Anything else | `ServerError` |
//! | Transport failure | `Transport`, no retry |
//! | Redirect back to a visited URL | `RedirectLoop` |

use crate::config::{Config, CrawlerConfig};
use crate::crawler::expires::resolve_expires;
use crate::crawler::fetcher::{BodyStream, FetchedResponse, HttpTransport, Transport};
use crate::crawler::types::{Request, Response};
use crate::parser::parse_body;
use crate::{AdsTxtError, Result};
use chrono::Utc;
use futures::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LOCATION};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Largest buffer reserved up front from a declared `Content-Length`
const MAX_BODY_PREALLOC: u64 = 64 * 1024;

/// Crawls ads.txt files through a [`Transport`]
///
/// Cloning is cheap; clones share the transport.
pub struct Crawler<T = HttpTransport> {
    pub(crate) transport: Arc<T>,
    pub(crate) config: CrawlerConfig,
}

impl<T> Clone for Crawler<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl Crawler<HttpTransport> {
    /// Creates a crawler backed by a `reqwest` client built from `config`
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport, config.crawler.clone()))
    }
}

impl<T: Transport> Crawler<T> {
    /// Creates a crawler over any transport
    pub fn with_transport(transport: T, config: CrawlerConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Returns the crawler configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Returns the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches and parses the ads.txt file for one request
    ///
    /// The request is never modified. Redirects are followed on a private
    /// copy of the URL; the URL that was finally read is reported in
    /// [`Response::final_url`].
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The file was fetched with HTTP 200 and parsed
    /// * `Err(AdsTxtError)` - The crawl ended in a terminal failure
    pub async fn get(&self, request: &Request) -> Result<Response> {
        let domain = request.domain.as_str();
        let mut current = request.url.clone();
        let mut visited = HashSet::from([current.clone()]);
        let mut hops = 0u32;

        loop {
            tracing::debug!("Fetching {} for {} (hop {})", current, domain, hops);

            let fetched = self
                .transport
                .get(&current)
                .await
                .map_err(|source| AdsTxtError::Transport {
                    domain: domain.to_string(),
                    url: current.to_string(),
                    source,
                })?;

            let FetchedResponse {
                status,
                headers,
                body,
            } = fetched;
            let code = status.as_u16();

            match code {
                300..=399 => {
                    // Release the connection before the next hop
                    drop(body);

                    let next = redirect_target(&current, &headers).map_err(|reason| {
                        AdsTxtError::InvalidRedirect {
                            domain: domain.to_string(),
                            url: current.to_string(),
                            reason,
                        }
                    })?;

                    if !visited.insert(next.clone()) {
                        return Err(AdsTxtError::RedirectLoop {
                            domain: domain.to_string(),
                            url: next.to_string(),
                        });
                    }

                    if hops >= self.config.max_redirects {
                        return Err(AdsTxtError::TooManyRedirects {
                            domain: domain.to_string(),
                            url: next.to_string(),
                            max: self.config.max_redirects,
                        });
                    }

                    tracing::debug!("{} redirected ({}) {} -> {}", domain, code, current, next);
                    hops += 1;
                    current = next;
                }
                400..=499 => {
                    tracing::debug!("{} returned HTTP {} at {}", domain, code, current);
                    return Err(AdsTxtError::ClientError {
                        status: code,
                        domain: domain.to_string(),
                        url: current.to_string(),
                    });
                }
                200 => {
                    let bytes =
                        read_body(body, &headers, self.config.max_body_bytes, domain).await?;
                    let records = parse_body(&bytes);
                    let expires = resolve_expires(&headers, Utc::now());

                    tracing::info!(
                        "Fetched ads.txt for {}: {} records ({} bytes), expires {}",
                        domain,
                        records.len(),
                        bytes.len(),
                        expires
                    );

                    return Ok(Response {
                        request: request.clone(),
                        final_url: current,
                        records,
                        expires,
                    });
                }
                _ => {
                    tracing::debug!("{} returned HTTP {} at {}", domain, code, current);
                    return Err(AdsTxtError::ServerError {
                        status: code,
                        domain: domain.to_string(),
                        url: current.to_string(),
                    });
                }
            }
        }
    }
}

/// Resolves the `Location` header of a redirect against the current URL
fn redirect_target(current: &Url, headers: &HeaderMap) -> std::result::Result<Url, String> {
    let location = headers
        .get(LOCATION)
        .ok_or_else(|| "missing Location header".to_string())?
        .to_str()
        .map_err(|_| "Location header is not valid ASCII".to_string())?
        .trim();

    let next = current
        .join(location)
        .map_err(|e| format!("invalid Location '{}': {}", location, e))?;

    match next.scheme() {
        "http" | "https" => Ok(next),
        scheme => Err(format!("unsupported redirect scheme '{}'", scheme)),
    }
}

/// Reads the whole body, refusing anything larger than `limit` bytes
async fn read_body(
    mut body: BodyStream,
    headers: &HeaderMap,
    limit: u64,
    domain: &str,
) -> Result<Vec<u8>> {
    let too_large = || AdsTxtError::BodyTooLarge {
        domain: domain.to_string(),
        limit,
    };

    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    let capacity = declared.unwrap_or(0).min(MAX_BODY_PREALLOC) as usize;
    let mut bytes = Vec::with_capacity(capacity);
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|source| AdsTxtError::Read {
            domain: domain.to_string(),
            source,
        })?;

        if (bytes.len() + chunk.len()) as u64 > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
