/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

use super::lock;

/// A counter of in-flight units of work that a thread can wait on.
///
/// Producers [`add`](PendingCounter::add) to the counter before handing out
/// work, and consumers [`complete`](PendingCounter::complete) each unit when
/// they are done with it. [`wait`](PendingCounter::wait) blocks until the
/// counter is back to zero.
///
/// A consumer that cannot complete a unit (e.g., because it panicked) must
/// call [`fail`](PendingCounter::fail), which releases waiters immediately:
/// otherwise, they would wait forever.
///
/// Completing a unit has release semantics and a successful wait has acquire
/// semantics, so everything written by consumers before completing their
/// units is visible to the waiter after [`wait`](PendingCounter::wait)
/// returns.
#[derive(Debug, Default)]
pub struct PendingCounter {
    pending: AtomicUsize,
    failed: AtomicBool,
    lock: Mutex<()>,
    /// Broadcast when the counter reaches zero or a failure is reported.
    done: Condvar,
}

impl PendingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `count` new units of work.
    #[inline]
    pub fn add(&self, count: usize) {
        self.pending.fetch_add(count, Ordering::AcqRel);
    }

    /// Marks a unit of work as completed, waking up waiters if it was the
    /// last one.
    #[inline]
    pub fn complete(&self) {
        let previous = self.pending.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "Completed more units than were added");
        if previous == 1 {
            // Taking the lock orders this notification after the check of a
            // waiter that saw a positive count.
            let _guard = lock(&self.lock);
            self.done.notify_all();
        }
    }

    /// Reports that a unit of work will never be completed.
    pub fn fail(&self) {
        self.failed.store(true, Ordering::Release);
        let _guard = lock(&self.lock);
        self.done.notify_all();
    }

    /// Blocks until all units of work have been completed or a failure has
    /// been reported.
    ///
    /// Returns false if a failure has been reported.
    pub fn wait(&self) -> bool {
        let _guard = self
            .done
            .wait_while(lock(&self.lock), |_| {
                self.pending.load(Ordering::Acquire) != 0 && !self.failed.load(Ordering::Acquire)
            })
            .unwrap_or_else(PoisonError::into_inner);
        !self.failed.load(Ordering::Acquire)
    }

    /// Returns the number of units of work not completed yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns true if a failure has been reported.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }
}
