/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::{Condvar, Mutex, PoisonError};

use super::lock;

/// The barrier was broken by some party before all parties arrived.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("The barrier was broken")]
pub struct BrokenBarrier;

/// A reusable barrier that can be broken.
///
/// Like [`std::sync::Barrier`], a `PhaseBarrier` blocks the threads calling
/// [`wait`](PhaseBarrier::wait) until the fixed number of parties has
/// arrived, releases all of them together, and can then be reused for the
/// next phase. Phases are counted by a generation number, so a fast party
/// starting the next phase cannot be confused with a slow party leaving the
/// previous one.
///
/// Differently from [`std::sync::Barrier`], a party that is not going to
/// arrive (e.g., because it could not be spawned, or because it panicked)
/// can [break](PhaseBarrier::break_barrier) the barrier: all current and
/// future waits fail with [`BrokenBarrier`] instead of blocking forever.
///
/// Everything a party does before arriving at the barrier is visible to all
/// other parties after they leave it.
#[derive(Debug)]
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<State>,
    /// Broadcast when the last party arrives or when the barrier is broken.
    released: Condvar,
}

#[derive(Debug)]
struct State {
    arrived: usize,
    generation: u64,
    broken: bool,
}

impl PhaseBarrier {
    /// Creates a barrier for `parties` threads.
    ///
    /// # Panics
    ///
    /// Panics if `parties` is zero.
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "A barrier needs at least one party");
        Self {
            parties,
            state: Mutex::new(State {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            released: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Blocks until all parties have called this method in the current
    /// phase.
    ///
    /// Returns true for exactly one party per phase (the last one to
    /// arrive), and an error if the barrier is, or becomes, broken before
    /// the phase completes.
    pub fn wait(&self) -> Result<bool, BrokenBarrier> {
        let mut state = lock(&self.state);
        if state.broken {
            return Err(BrokenBarrier);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            drop(state);
            self.released.notify_all();
            return Ok(true);
        }

        let generation = state.generation;
        let state = self
            .released
            .wait_while(state, |state| {
                state.generation == generation && !state.broken
            })
            .unwrap_or_else(PoisonError::into_inner);
        // A phase completed before the barrier was broken is still completed
        if state.generation != generation {
            Ok(false)
        } else {
            Err(BrokenBarrier)
        }
    }

    /// Breaks the barrier, releasing all waiting parties with an error.
    pub fn break_barrier(&self) {
        lock(&self.state).broken = true;
        self.released.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        lock(&self.state).broken
    }
}

/// Breaks a barrier if dropped during a panic.
///
/// Parties should hold one of these while taking part in the phases of a
/// barrier, so that a panicking party does not leave the other ones blocked.
#[derive(Debug)]
pub(crate) struct BreakOnPanic<'a>(pub(crate) &'a PhaseBarrier);

impl Drop for BreakOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.break_barrier();
        }
    }
}
