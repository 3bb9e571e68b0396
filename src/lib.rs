//! adstxt: an ads.txt crawler and parser
//!
//! This crate fetches `ads.txt` authorization files from publisher domains,
//! follows redirects, classifies HTTP outcomes, works out how long a result stays
//! fresh and parses the file into typed records. Many domains can be crawled at
//! once under a bounded concurrency ceiling.
//!
//! # Example
//!
//! ```no_run
//! use adstxt::{get, Request};
//!
//! # async fn example() -> adstxt::Result<()> {
//! let request = Request::for_domain("example.com")?;
//! let response = get(&request).await?;
//! for record in response.records.data() {
//!     println!(
//!         "{} {} {}",
//!         record.ad_system_domain, record.publisher_account_id, record.relationship
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod parser;
pub mod record;

use thiserror::Error;

/// Main error type for ads.txt crawling
///
/// Every crawl failure is terminal; nothing here is retried internally. A record
/// that fails to parse is not an error: malformed lines are dropped by the parser.
#[derive(Debug, Error)]
pub enum AdsTxtError {
    #[error("Transport error for {domain} ({url}): {source}")]
    Transport {
        domain: String,
        url: String,
        source: crawler::TransportError,
    },

    #[error("HTTP client error {status} for {domain} ({url})")]
    ClientError {
        status: u16,
        domain: String,
        url: String,
    },

    #[error("HTTP error {status} for {domain} ({url})")]
    ServerError {
        status: u16,
        domain: String,
        url: String,
    },

    #[error("Too many redirects (max {max}) for {domain}, last at {url}")]
    TooManyRedirects {
        domain: String,
        url: String,
        max: u32,
    },

    #[error("Redirect loop detected for {domain} at {url}")]
    RedirectLoop { domain: String, url: String },

    #[error("Invalid redirect for {domain} from {url}: {reason}")]
    InvalidRedirect {
        domain: String,
        url: String,
        reason: String,
    },

    #[error("Failed to read ads.txt body for {domain}: {source}")]
    Read {
        domain: String,
        source: std::io::Error,
    },

    #[error("ads.txt body for {domain} exceeds {limit} bytes")]
    BodyTooLarge { domain: String, limit: u64 },

    #[error("Crawl task for {domain} panicked")]
    TaskPanicked { domain: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdsTxtError {
    /// Returns the HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ClientError { status, .. } | Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for 4xx outcomes
    ///
    /// These usually mean the domain publishes no ads.txt file, which callers
    /// may want to cache like a successful result.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientError { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for ads.txt operations
pub type Result<T> = std::result::Result<T, AdsTxtError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{get, get_multiple, BatchStats, Crawler, Handler, Request, Response};
pub use parser::{parse_body, parse_reader, split_lines};
pub use record::{DataRecord, Record, Records, Relationship, VariableRecord};
