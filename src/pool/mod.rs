//! Bounded worker pool for per-pilot detail fetches.
//!
//! A fixed group of worker tasks pulls from a shared bounded queue; the size
//! of the group is the concurrency ceiling, and the queue capacity is the
//! backpressure point that suspends `submit` during large paginated syncs.

use crate::core::{GameMode, Result, SyncError};
use crate::fetch::DetailFetch;
use crate::storage::RawPayload;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// A unit of enrichment work. Immutable once created; fetch parameters live
/// in the fetcher's configuration, and results travel out-of-band through
/// the pool's result channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichTask {
    pub handle: String,
    pub mode: GameMode,
}

/// A completed `(task, result)` pair, delivered exactly once per task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub task: EnrichTask,
    pub result: Result<RawPayload>,
}

pub struct WorkerPool {
    queue: mpsc::Sender<EnrichTask>,
    workers: Vec<JoinHandle<()>>,
    outcomes: mpsc::UnboundedReceiver<TaskOutcome>,
    submitted: usize,
}

impl WorkerPool {
    /// Spawn a pool of `concurrency` workers executing detail fetches, with
    /// a submit backlog of `backlog` tasks. Both floors are clamped to 1.
    pub fn spawn<F>(fetcher: Arc<F>, concurrency: usize, backlog: usize) -> Self
    where
        F: DetailFetch + Send + Sync + 'static,
    {
        let concurrency = concurrency.max(1);
        let backlog = backlog.max(1);

        let (queue, receiver) = mpsc::channel(backlog);
        let receiver = Arc::new(Mutex::new(receiver));
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();

        let workers = (0..concurrency)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&receiver),
                    Arc::clone(&fetcher),
                    outcome_tx.clone(),
                ))
            })
            .collect();

        Self {
            queue,
            workers,
            outcomes,
            submitted: 0,
        }
    }

    /// Enqueue a task for eventual execution. Suspends while the backlog is
    /// full; never fails unless every worker has died.
    pub async fn submit(&mut self, task: EnrichTask) -> Result<()> {
        self.queue
            .send(task)
            .await
            .map_err(|e| SyncError::Pool(format!("Task queue closed: {}", e)))?;
        self.submitted += 1;
        Ok(())
    }

    /// Number of tasks accepted so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Drain barrier: signal that no further tasks are coming, wait until
    /// every submitted task has run to completion or error, and collect the
    /// delivered outcomes. Returns only once the delivered count equals the
    /// submitted count.
    pub async fn drain(mut self) -> Vec<TaskOutcome> {
        // Closing the submit side is the no-more-tasks signal; idle workers
        // wake with `None` and exit.
        drop(self.queue);

        for join in join_all(self.workers).await {
            if let Err(err) = join {
                warn!("worker terminated abnormally: {}", err);
            }
        }

        let mut delivered = Vec::with_capacity(self.submitted);
        while let Ok(outcome) = self.outcomes.try_recv() {
            delivered.push(outcome);
        }
        debug_assert_eq!(delivered.len(), self.submitted);
        delivered
    }
}

async fn worker_loop<F>(
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<EnrichTask>>>,
    fetcher: Arc<F>,
    outcomes: mpsc::UnboundedSender<TaskOutcome>,
) where
    F: DetailFetch + Send + Sync + 'static,
{
    loop {
        // Hold the queue lock only across the blocking recv, never across a
        // fetch, so a slow request does not starve the other workers.
        let task = {
            let mut queue = queue.lock().await;
            match queue.recv().await {
                Some(task) => task,
                None => break,
            }
        };

        debug!("worker {}: fetching detail for '{}'", id, task.handle);
        let result = fetcher.fetch_detail(task.mode, &task.handle).await;

        if outcomes.send(TaskOutcome { task, result }).is_err() {
            // Receiver gone; the pool was dropped without draining.
            break;
        }
    }
}
