/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Blocking synchronization primitives used by the parallel solvers.
//!
//! All waits in this module are untimed: a thread blocks until the condition
//! it is waiting for holds. The primitives are built on [`Mutex`] and
//! [`Condvar`], and every predicate is checked under the mutex that the
//! corresponding notification is sent under, so wakeups cannot be lost.
//!
//! Mutex poisoning is ignored: the critical sections in this module never
//! panic, so a poisoned mutex still protects consistent state.
//!
//! [`Mutex`]: std::sync::Mutex
//! [`Condvar`]: std::sync::Condvar

mod task_queue;
pub use task_queue::TaskQueue;

mod pending;
pub use pending::PendingCounter;

mod task_pool;
pub use task_pool::TaskPool;

mod phase_barrier;
pub use phase_barrier::{BrokenBarrier, PhaseBarrier};
pub(crate) use phase_barrier::BreakOnPanic;

use std::sync::{Mutex, MutexGuard, PoisonError};

#[inline(always)]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
