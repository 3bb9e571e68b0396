//! Configuration module for the ads.txt crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so an empty file (or no file) is a valid setup.
//!
//! # Example
//!
//! ```no_run
//! use adstxt::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("adstxt.toml")).unwrap();
//! println!("Following at most {} redirects", config.crawler.max_redirects);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
