/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::Arc;
use std::thread::{Scope, ScopedJoinHandle};

use super::{PendingCounter, TaskQueue};
use crate::error::{Error, Result};

/// A fixed-size pool of scoped worker threads consuming tasks from a
/// [`TaskQueue`].
///
/// Every worker runs the same handler on the tasks it pops. The pool keeps a
/// [`PendingCounter`] of the submitted tasks, so that the submitting thread
/// can [`wait`](TaskPool::wait) until all of them have been handled, and then
/// submit a new batch to the same workers.
///
/// Workers are spawned in a [`Scope`], so tasks and the handler can borrow
/// data living outside the scope. Dropping the pool stops the workers (after
/// they have drained the queue) and joins them.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pagerank_pools::utils::sync::TaskPool;
///
/// let sum = AtomicUsize::new(0);
/// std::thread::scope(|s| -> pagerank_pools::Result<()> {
///     let pool = TaskPool::new(s, 4, |x: usize| {
///         sum.fetch_add(x, Ordering::Relaxed);
///     })?;
///     for x in 0..100 {
///         pool.submit(x);
///     }
///     pool.wait()?;
///     assert_eq!(sum.load(Ordering::Relaxed), 4950);
///     pool.shutdown()
/// })?;
/// # Ok::<(), pagerank_pools::Error>(())
/// ```
pub struct TaskPool<'scope, T> {
    shared: Arc<Shared<T>>,
    workers: Vec<ScopedJoinHandle<'scope, ()>>,
}

struct Shared<T> {
    queue: TaskQueue<T>,
    pending: PendingCounter,
}

/// Completes a task when dropped, reporting a failure instead if the thread
/// is unwinding.
struct CompletionGuard<'a>(&'a PendingCounter);

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.fail();
        } else {
            self.0.complete();
        }
    }
}

impl<T> std::fmt::Debug for TaskPool<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("num_threads", &self.workers.len())
            .field("pending", &self.shared.pending.pending())
            .finish_non_exhaustive()
    }
}

impl<'scope, T: Send + 'scope> TaskPool<'scope, T> {
    /// Spawns `num_threads` workers in `scope`, each running `handler` on the
    /// tasks it pops from the queue.
    ///
    /// If a worker cannot be spawned, the workers spawned so far are stopped
    /// and joined, and [`Error::Spawn`] is returned.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is zero.
    pub fn new<'env, F>(
        scope: &'scope Scope<'scope, 'env>,
        num_threads: usize,
        handler: F,
    ) -> Result<Self>
    where
        F: Fn(T) + Send + Sync + 'scope,
    {
        assert!(num_threads > 0, "A pool needs at least one thread");
        let shared = Arc::new(Shared {
            queue: TaskQueue::new(),
            pending: PendingCounter::new(),
        });
        let handler = Arc::new(handler);
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(num_threads),
        };

        for index in 0..num_threads {
            let shared = Arc::clone(&pool.shared);
            let handler = Arc::clone(&handler);
            let worker = std::thread::Builder::new()
                .name(format!("task-worker-{index}"))
                .spawn_scoped(scope, move || {
                    log::trace!("Worker {index} started");
                    while let Some(task) = shared.queue.pop() {
                        let _guard = CompletionGuard(&shared.pending);
                        (*handler)(task);
                    }
                    log::trace!("Worker {index} stopped");
                })
                // Dropping the pool stops and joins the workers spawned so far
                .map_err(|source| Error::Spawn { index, source })?;
            pool.workers.push(worker);
        }

        Ok(pool)
    }

    /// Returns the number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Submits a task to the pool.
    pub fn submit(&self, task: T) {
        // The task must be counted before any worker can complete it
        self.shared.pending.add(1);
        self.shared.queue.push(task);
    }

    /// Blocks until all tasks submitted so far have been handled.
    ///
    /// Returns [`Error::WorkerPanicked`] as soon as the handler panics on some
    /// task, in which case other tasks might still be running.
    pub fn wait(&self) -> Result<()> {
        if self.shared.pending.wait() {
            Ok(())
        } else {
            Err(Error::WorkerPanicked)
        }
    }

    /// Stops the workers once the queue is empty and joins them.
    ///
    /// Returns [`Error::WorkerPanicked`] if some worker panicked.
    pub fn shutdown(mut self) -> Result<()> {
        self.shared.queue.stop();
        let mut result = Ok(());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                result = Err(Error::WorkerPanicked);
            }
        }
        result
    }
}

impl<T> Drop for TaskPool<'_, T> {
    fn drop(&mut self) {
        self.shared.queue.stop();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
