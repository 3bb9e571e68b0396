//! Batch crawling with a bounded number of crawls in flight
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - One tokio task per admitted request
//! - Fan-in of outcomes over a channel to the caller's handler
//!
//! A failed or panicking crawl never affects the others. Each request's outcome
//! reaches the handler exactly once, in completion order.

use crate::crawler::engine::Crawler;
use crate::crawler::fetcher::Transport;
use crate::crawler::types::{Request, Response};
use crate::{AdsTxtError, Result};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Receives the outcome of each crawl in a batch
///
/// Handlers run on the task that called [`Crawler::get_multiple`], one call at
/// a time, so they need not be thread-safe.
pub trait Handler {
    /// Handles one completed crawl
    fn handle(&mut self, request: &Request, outcome: Result<Response>);
}

impl<F> Handler for F
where
    F: FnMut(&Request, Result<Response>),
{
    fn handle(&mut self, request: &Request, outcome: Result<Response>) {
        self(request, outcome)
    }
}

/// Summary of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Requests in the batch
    pub total: usize,

    /// Crawls that produced a response
    pub succeeded: usize,

    /// Crawls that ended in an error
    pub failed: usize,
}

impl<T: Transport + 'static> Crawler<T> {
    /// Crawls every request concurrently and hands each outcome to `handler`
    ///
    /// At most `max_concurrent_requests` crawls are in flight at any time. A
    /// crawl holds its permit from before its first fetch until it ends, on
    /// every path including a panic.
    ///
    /// Returns once every request has completed and every handler call has
    /// returned.
    pub async fn get_multiple<H: Handler>(
        &self,
        requests: Vec<Request>,
        mut handler: H,
    ) -> BatchStats {
        let total = requests.len();
        let limit = self.config.max_concurrent_requests.max(1);
        tracing::info!(
            "Batch crawling {} ads.txt files (max {} concurrent)",
            total,
            limit
        );

        let semaphore = Arc::new(Semaphore::new(limit));
        let (tx, mut rx) = mpsc::unbounded_channel::<(Request, Result<Response>)>();

        let dispatcher = {
            let crawler = self.clone();
            tokio::spawn(async move {
                for request in requests {
                    // Wait for a free slot before starting the next crawl
                    let permit = match Arc::clone(&semaphore).acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            tracing::error!("Admission gate closed: {}", e);
                            break;
                        }
                    };

                    let crawler = crawler.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let outcome = AssertUnwindSafe(crawler.get(&request))
                            .catch_unwind()
                            .await
                            .unwrap_or_else(|_| {
                                Err(AdsTxtError::TaskPanicked {
                                    domain: request.domain.clone(),
                                })
                            });
                        drop(permit);

                        // The receiver outlives every sender
                        let _ = tx.send((request, outcome));
                    });
                }
            })
        };

        let mut stats = BatchStats {
            total,
            ..BatchStats::default()
        };

        // Ends once the dispatcher and every crawl task dropped their sender
        while let Some((request, outcome)) = rx.recv().await {
            match &outcome {
                Ok(_) => stats.succeeded += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!("Failed to crawl ads.txt for {}: {}", request.domain, e);
                }
            }

            handler.handle(&request, outcome);

            let done = stats.succeeded + stats.failed;
            if done % 100 == 0 {
                tracing::info!("Progress: {}/{} ads.txt files crawled", done, total);
            }
        }

        if let Err(e) = dispatcher.await {
            tracing::error!("Batch dispatcher failed: {}", e);
        }

        tracing::info!(
            "Batch complete: {} succeeded, {} failed",
            stats.succeeded,
            stats.failed
        );

        stats
    }
}
