/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use dsi_progress_logger::ProgressLog;

use super::{check_damping, Kernel, RankBuffers, RankSolver, DEFAULT_DAMPING};
use crate::error::Result;
use crate::graphs::dual_graph::DualGraph;

/// Sequential PageRank with a single pass over the arcs per iteration.
///
/// Each iteration computes the rank of dangling nodes once, and then the new
/// rank of each node by enumerating its predecessors, for a cost of
/// Θ(*n* + *m*). The current and next vectors are swapped, not copied.
///
/// This is the reference for the parallel variants, which return exactly the
/// same vector.
#[derive(Debug, Clone)]
pub struct SinglePassPageRank {
    damping: f64,
}

impl Default for SinglePassPageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl SinglePassPageRank {
    pub fn new() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
        }
    }

    /// Sets the damping factor.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in [0 . . 1].
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        check_damping(damping);
        self.damping = damping;
        self
    }
}

impl RankSolver for SinglePassPageRank {
    fn name(&self) -> &'static str {
        "single-pass"
    }

    fn solve_with_logging(
        &self,
        graph: &DualGraph,
        iterations: usize,
        pl: &mut impl ProgressLog,
    ) -> Result<Box<[f32]>> {
        log::info!("Damping factor: {}", self.damping);
        log::info!("Dangling nodes: {}", graph.num_dangling());

        let mut buffers = RankBuffers::new(graph.num_nodes())?;
        let kernel = Kernel::new(graph, self.damping);

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start("Computing single-pass PageRank...");

        for _ in 0..iterations {
            let (current, next) = buffers.split();
            let sum_b = kernel.dangling_rank(|j| current[j]);
            log::debug!("Dangling rank: {sum_b}");
            for (i, next_i) in next.iter_mut().enumerate() {
                *next_i = kernel.node_rank(i, |j| current[j], sum_b);
            }
            buffers.swap();
            pl.update();
        }

        pl.done();
        Ok(buffers.into_current())
    }
}
