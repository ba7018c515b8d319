/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power iteration, in four variants.
//!
//! All variants compute the same fixed number of iterations of the update
//!
//! > *xᵢ*⁽*ᵗ* ⁺ ¹⁾ = *D* / *n* + (1 − *D*) (*Aᵢ* + *B*),
//!
//! where *D* is the damping factor (the probability of a random jump),
//! *Aᵢ* = ∑_(*j* → *i*) *xⱼ*⁽*ᵗ*⁾ / *d*⁺(*j*) is the rank flowing from the
//! predecessors of *i*, and *B* = ∑_(*d*⁺(*j*) = 0) *xⱼ*⁽*ᵗ*⁾ / *n* is the rank of
//! dangling nodes, distributed uniformly. The initial vector is uniform.
//!
//! The variants differ in how they obtain *Aᵢ* and *B*, and in how they
//! distribute the work:
//!
//! - [`SerialPageRank`](serial::SerialPageRank) finds the predecessors of
//!   each node by scanning the successor lists of all other nodes, and
//!   computes *B* again for each node. It is quadratic in the number of nodes
//!   per iteration, and it is meant as a baseline.
//! - [`SinglePassPageRank`](single_pass::SinglePassPageRank) computes *B*
//!   once per iteration and enumerates predecessors directly.
//! - [`TaskQueuePageRank`](task_queue::TaskQueuePageRank) splits the nodes in
//!   blocks and hands them out to a [pool](crate::utils::sync::TaskPool) of
//!   workers fed by a task queue.
//! - [`BarrierPageRank`](barrier::BarrierPageRank) assigns a fixed range of
//!   nodes to each worker, and synchronizes workers with the main thread
//!   using a [barrier](crate::utils::sync::PhaseBarrier).
//!
//! Ranks are stored as `f32`, while sums are accumulated as `f64`.
//! Predecessor contributions are added in the order of
//! [`DualGraph::predecessors`]. Since the last three variants perform
//! exactly the same floating-point operations for each node, they return
//! identical vectors. The serial variant adds contributions in node order
//! and counts each predecessor once (even if there are multiple arcs), so it
//! agrees with the others only up to rounding on graphs without duplicate
//! arcs or loops.

use dsi_progress_logger::{no_logging, ProgressLog};
use sync_cell_slice::{SyncCell, SyncSlice};

use crate::error::{try_filled, Result};
use crate::graphs::dual_graph::DualGraph;

pub mod barrier;
pub mod serial;
pub mod single_pass;
pub mod task_queue;

pub mod prelude {
    pub use super::barrier::BarrierPageRank;
    pub use super::serial::SerialPageRank;
    pub use super::single_pass::SinglePassPageRank;
    pub use super::task_queue::TaskQueuePageRank;
    pub use super::{first_mismatch, l_inf_distance, RankSolver, Variant, DEFAULT_DAMPING};
}

/// The default damping factor, that is, the probability of a random jump.
pub const DEFAULT_DAMPING: f64 = 0.15;

/// A PageRank solver running a fixed number of iterations.
pub trait RankSolver {
    /// Returns a short name for the variant.
    fn name(&self) -> &'static str;

    /// Computes `iterations` iterations of PageRank on `graph`, starting from
    /// the uniform vector, logging one update per iteration on `pl`.
    ///
    /// The returned vector is indexed by node. The graph is not modified.
    fn solve_with_logging(
        &self,
        graph: &DualGraph,
        iterations: usize,
        pl: &mut impl ProgressLog,
    ) -> Result<Box<[f32]>>;

    /// Computes `iterations` iterations of PageRank on `graph` without
    /// logging progress.
    fn solve(&self, graph: &DualGraph, iterations: usize) -> Result<Box<[f32]>> {
        self.solve_with_logging(graph, iterations, no_logging![])
    }
}

/// The available PageRank variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Serial,
    SinglePass,
    TaskQueue,
    Barrier,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Serial,
        Variant::SinglePass,
        Variant::TaskQueue,
        Variant::Barrier,
    ];
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Serial => f.write_str("serial"),
            Variant::SinglePass => f.write_str("single-pass"),
            Variant::TaskQueue => f.write_str("task-queue"),
            Variant::Barrier => f.write_str("barrier"),
        }
    }
}

/// Returns the ℓ∞ distance (maximum absolute difference) between two
/// vectors of the same length.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn l_inf_distance(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "The vectors have different lengths");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as f64 - y as f64).abs())
        .fold(0.0, f64::max)
}

/// Returns the first index at which two vectors differ by more than
/// `tolerance`, or `None` if there is no such index.
///
/// With a tolerance of zero the comparison is exact. NaNs are always
/// different. If the vectors have different lengths and agree on their
/// common prefix, the length of the shorter one is returned.
pub fn first_mismatch(a: &[f32], b: &[f32], tolerance: f64) -> Option<usize> {
    a.iter()
        .zip(b.iter())
        .position(|(&x, &y)| !((x as f64 - y as f64).abs() <= tolerance))
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Panics if `damping` is not a probability.
pub(crate) fn check_damping(damping: f64) {
    assert!(
        (0.0..=1.0).contains(&damping),
        "The damping factor must be in [0 . . 1], got {damping}"
    );
}

/// The arithmetic shared by all variants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Kernel<'a> {
    graph: &'a DualGraph,
    damping: f64,
    /// D / n
    teleport: f64,
}

impl<'a> Kernel<'a> {
    pub(crate) fn new(graph: &'a DualGraph, damping: f64) -> Self {
        Self {
            graph,
            damping,
            teleport: damping / graph.num_nodes() as f64,
        }
    }

    /// The contribution of the dangling node `j` to *B*.
    #[inline(always)]
    pub(crate) fn dangling_term(&self, rank_j: f32) -> f64 {
        (rank_j / self.graph.num_nodes() as f32) as f64
    }

    /// The contribution of the predecessor `j` to *Aᵢ*.
    #[inline(always)]
    pub(crate) fn predecessor_term(&self, j: usize, rank_j: f32) -> f64 {
        (rank_j / self.graph.outdegree(j) as f32) as f64
    }

    /// Combines *Aᵢ* and *B* into the new rank of a node.
    #[inline(always)]
    pub(crate) fn combine(&self, sum_a: f64, sum_b: f64) -> f32 {
        (self.teleport + (1.0 - self.damping) * (sum_a + sum_b)) as f32
    }

    /// Computes *B*, adding the terms of dangling nodes in node order.
    pub(crate) fn dangling_rank(&self, rank: impl Fn(usize) -> f32) -> f64 {
        let mut sum_b = 0.0;
        for j in 0..self.graph.num_nodes() {
            if self.graph.is_dangling(j) {
                sum_b += self.dangling_term(rank(j));
            }
        }
        sum_b
    }

    /// Computes the new rank of `i` given *B*.
    #[inline(always)]
    pub(crate) fn node_rank(&self, i: usize, rank: impl Fn(usize) -> f32, sum_b: f64) -> f32 {
        let mut sum_a = 0.0;
        for j in self.graph.predecessors(i) {
            sum_a += self.predecessor_term(j, rank(j));
        }
        self.combine(sum_a, sum_b)
    }

    /// Computes the new ranks of the nodes in `range`, reading from `current`
    /// and writing to `next`.
    ///
    /// # Safety
    ///
    /// No other thread may write `current`, or access `next` in `range`,
    /// during the call.
    #[inline]
    pub(crate) unsafe fn update_range(
        &self,
        range: std::ops::Range<usize>,
        current: &[SyncCell<f32>],
        next: &[SyncCell<f32>],
        sum_b: f64,
    ) {
        for i in range {
            let rank = self.node_rank(i, |j| unsafe { current[j].get() }, sum_b);
            unsafe { next[i].set(rank) };
        }
    }
}

/// The current and next rank vectors of a computation.
///
/// The roles of the two vectors are swapped at the end of each iteration by
/// flipping an index, without copying.
#[derive(Debug)]
pub(crate) struct RankBuffers {
    slots: [Box<[f32]>; 2],
    current: usize,
}

impl RankBuffers {
    /// Allocates the buffers for `n` nodes, filling the current one with the
    /// uniform vector.
    pub(crate) fn new(n: usize) -> Result<Self> {
        let uniform = (1.0 / n as f64) as f32;
        Ok(Self {
            slots: [
                try_filled("rank vector", n, uniform)?,
                try_filled("rank vector", n, 0.0)?,
            ],
            current: 0,
        })
    }

    pub(crate) fn current(&self) -> &[f32] {
        &self.slots[self.current]
    }

    /// Returns the current vector and the next one.
    pub(crate) fn split(&mut self) -> (&[f32], &mut [f32]) {
        let [a, b] = &mut self.slots;
        if self.current == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub(crate) fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Copies the next vector into the current one.
    pub(crate) fn copy_back(&mut self) {
        let [a, b] = &mut self.slots;
        if self.current == 0 {
            a.copy_from_slice(b);
        } else {
            b.copy_from_slice(a);
        }
    }

    /// Returns views of both vectors that can be shared among threads.
    pub(crate) fn share(&mut self) -> SharedBuffers<'_> {
        let [a, b] = &mut self.slots;
        SharedBuffers {
            cells: [a.as_sync_slice(), b.as_sync_slice()],
            current: &mut self.current,
        }
    }

    pub(crate) fn into_current(self) -> Box<[f32]> {
        let [a, b] = self.slots;
        if self.current == 0 {
            a
        } else {
            b
        }
    }
}

/// Thread-shareable views of [`RankBuffers`].
///
/// The cells are [`Copy`] and can be handed out to workers, which
/// receive the index of the current vector along with their work. The main
/// thread keeps this struct to swap the roles of the vectors.
pub(crate) struct SharedBuffers<'a> {
    pub(crate) cells: [&'a [SyncCell<f32>]; 2],
    current: &'a mut usize,
}

impl SharedBuffers<'_> {
    pub(crate) fn current_index(&self) -> usize {
        *self.current
    }

    /// Reads the current vector.
    ///
    /// # Safety
    ///
    /// No thread may write the current vector while the returned closure is
    /// in use.
    pub(crate) unsafe fn current_reader(&self) -> impl Fn(usize) -> f32 + '_ {
        let current = self.cells[*self.current];
        move |j| unsafe { current[j].get() }
    }

    pub(crate) fn swap(&mut self) {
        *self.current ^= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mismatch() {
        let a = [0.1, 0.2, 0.3];
        assert_eq!(first_mismatch(&a, &a, 0.0), None);
        assert_eq!(first_mismatch(&a, &[0.1, 0.25, 0.3], 0.0), Some(1));
        assert_eq!(first_mismatch(&a, &[0.1, 0.25, 0.3], 0.1), None);
        assert_eq!(first_mismatch(&a, &a[..2], 0.0), Some(2));
        assert_eq!(first_mismatch(&[f32::NAN], &[f32::NAN], 1.0), Some(0));
    }

    #[test]
    fn test_l_inf_distance() {
        assert_eq!(l_inf_distance(&[], &[]), 0.0);
        assert!((l_inf_distance(&[0.5, 0.25], &[0.5, 0.75]) - 0.5).abs() < 1E-12);
    }

    #[test]
    fn test_buffers() -> anyhow::Result<()> {
        let mut buffers = RankBuffers::new(4)?;
        assert_eq!(buffers.current(), &[0.25; 4]);
        {
            let (current, next) = buffers.split();
            next.copy_from_slice(current);
            next[0] = 1.0;
        }
        buffers.swap();
        assert_eq!(buffers.current(), &[1.0, 0.25, 0.25, 0.25]);
        {
            let mut shared = buffers.share();
            assert_eq!(shared.current_index(), 1);
            shared.swap();
        }
        assert_eq!(buffers.into_current().as_ref(), &[0.25; 4]);
        Ok(())
    }
}
