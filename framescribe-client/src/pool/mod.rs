//! Bounded-concurrency task pool
//!
//! Runs an async worker over a fixed list of items with at most `limit`
//! items in flight. Workers are cooperative futures joined on the calling
//! task; each one loops claiming the next unclaimed index from a shared
//! [`WorkQueue`] until the queue is drained.
//!
//! Completions are funnelled through a channel and handed to the caller's
//! callback one at a time, in completion order. A failed item is logged and
//! reported as `None`; it never stops the others.

use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Hands out each index in `0..len` exactly once
#[derive(Debug)]
pub struct WorkQueue {
    cursor: AtomicUsize,
    len: usize,
}

impl WorkQueue {
    pub fn new(len: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(0),
            len,
        }
    }

    /// Claim the next unprocessed index, or `None` once all are claimed
    pub fn claim(&self) -> Option<usize> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        (index < self.len).then_some(index)
    }

    /// Number of indices handed out so far
    pub fn claimed(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).min(self.len)
    }
}

/// Outcome counters of one pool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub total: usize,
    /// Items reported to the completion callback
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Pool limited to `limit` concurrent items
#[derive(Debug, Clone, Copy)]
pub struct TaskPool {
    limit: usize,
}

impl TaskPool {
    /// Create a pool; a limit of 0 is treated as 1
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Process every item, calling `on_item_done(index, item, result)` once
    /// per item as results come in.
    ///
    /// Returns after every item has been reported, or as soon as `cancel`
    /// fires. After cancellation no new item is started and no further
    /// result is reported; in-flight work is dropped.
    pub async fn run<'a, T, R, E, W, Fut, D>(
        &self,
        items: &'a [T],
        worker: W,
        mut on_item_done: D,
        cancel: &CancellationToken,
    ) -> PoolSummary
    where
        W: Fn(&'a T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
        D: FnMut(usize, &'a T, Option<R>),
    {
        let mut summary = PoolSummary {
            total: items.len(),
            ..Default::default()
        };

        if items.is_empty() {
            return summary;
        }

        let queue = WorkQueue::new(items.len());
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Option<R>)>();
        let worker_count = self.limit.min(items.len());

        debug!(
            total = items.len(),
            workers = worker_count,
            "Starting task pool"
        );

        let queue_ref = &queue;
        let worker_ref = &worker;
        let tx_ref = &tx;
        let workers: Vec<_> = (0..worker_count)
            .map(move |_| {
                let queue = queue_ref;
                let worker = worker_ref;
                let tx = tx_ref.clone();
                async move {
                    while !cancel.is_cancelled() {
                        let Some(index) = queue.claim() else {
                            break;
                        };

                        let outcome = match worker(&items[index], index).await {
                            Ok(result) => Some(result),
                            Err(e) => {
                                warn!(index = index, error = %e, "Work item failed");
                                None
                            }
                        };

                        if tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                }
            })
            .collect();
        drop(tx);

        let work = join_all(workers);
        let drain = async {
            while let Some((index, outcome)) = rx.recv().await {
                if cancel.is_cancelled() {
                    break;
                }
                summary.processed += 1;
                if outcome.is_some() {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
                on_item_done(index, &items[index], outcome);
            }
        };

        let cancelled = tokio::select! {
            biased;
            _ = cancel.cancelled() => true,
            _ = futures::future::join(work, drain) => cancel.is_cancelled(),
        };

        summary.cancelled = cancelled;
        if cancelled {
            debug!(
                claimed = queue.claimed(),
                processed = summary.processed,
                "Task pool cancelled"
            );
        }

        summary
    }
}
