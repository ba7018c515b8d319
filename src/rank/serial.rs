/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use dsi_progress_logger::ProgressLog;

use super::{check_damping, Kernel, RankBuffers, RankSolver, DEFAULT_DAMPING};
use crate::error::Result;
use crate::graphs::dual_graph::DualGraph;

/// Quadratic PageRank, used as a baseline.
///
/// For each node *i*, the predecessors of *i* are found by scanning the
/// successor lists of all other nodes, and the rank of dangling nodes is
/// summed again. An iteration thus costs Θ(*n*² + *nm*), and the new vector
/// is copied back into the current one at the end of each iteration.
///
/// Predecessor contributions are added in node order, and each predecessor
/// is counted once even if it has several arcs towards *i*. Loops are
/// ignored. On graphs without duplicate arcs and loops the result agrees
/// with the other variants up to rounding.
///
/// # Examples
///
/// ```
/// use pagerank_pools::prelude::*;
///
/// let graph = DualGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0)]);
/// let rank = SerialPageRank::new().solve(&graph, 10)?;
/// assert!(rank.iter().all(|&r| (r - 1.0 / 3.0).abs() < 1E-6));
/// # Ok::<(), pagerank_pools::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SerialPageRank {
    damping: f64,
}

impl Default for SerialPageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialPageRank {
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

/// Returns true if `i` is a successor of `j`.
fn out2i(graph: &DualGraph, j: usize, i: usize) -> bool {
    graph.successors(j).any(|k| k == i)
}

impl RankSolver for SerialPageRank {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn solve_with_logging(
        &self,
        graph: &DualGraph,
        iterations: usize,
        pl: &mut impl ProgressLog,
    ) -> Result<Box<[f32]>> {
        let num_nodes = graph.num_nodes();
        log::info!("Damping factor: {}", self.damping);

        let mut buffers = RankBuffers::new(num_nodes)?;
        let kernel = Kernel::new(graph, self.damping);

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start("Computing serial PageRank...");

        for _ in 0..iterations {
            let (current, next) = buffers.split();
            for (i, next_i) in next.iter_mut().enumerate() {
                let mut sum_a = 0.0;
                let mut sum_b = 0.0;
                for j in 0..num_nodes {
                    if j != i && out2i(graph, j, i) {
                        sum_a += kernel.predecessor_term(j, current[j]);
                    }
                    if graph.is_dangling(j) {
                        sum_b += kernel.dangling_term(current[j]);
                    }
                }
                *next_i = kernel.combine(sum_a, sum_b);
            }
            buffers.copy_back();
            pl.update();
        }

        pl.done();
        Ok(buffers.into_current())
    }
}
