/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::ops::Range;

use dsi_progress_logger::ProgressLog;

use super::{check_damping, Kernel, RankBuffers, RankSolver, DEFAULT_DAMPING};
use crate::error::Result;
use crate::graphs::dual_graph::DualGraph;
use crate::utils::partition::blocks;
use crate::utils::sync::TaskPool;
use crate::utils::Granularity;

/// Parallel PageRank using a pool of workers fed by a task queue.
///
/// At each iteration, the main thread computes the rank of dangling nodes,
/// splits the nodes in blocks (see [`granularity`](Self::granularity)), and
/// submits a task for each block to a [`TaskPool`]. It then waits for all
/// tasks to complete before swapping the current and next vectors.
///
/// The workers are created once per call and live across iterations. The
/// result is identical to that of
/// [`SinglePassPageRank`](super::single_pass::SinglePassPageRank).
///
/// # Examples
///
/// ```
/// use pagerank_pools::prelude::*;
///
/// let graph = UniformArcs::new(1000, 5000, 0).generate();
/// let mut solver = TaskQueuePageRank::new();
/// solver.num_threads(4).granularity(Granularity::Nodes(64));
/// let rank = solver.solve(&graph, 10)?;
/// assert_eq!(rank, SinglePassPageRank::new().solve(&graph, 10)?);
/// # Ok::<(), pagerank_pools::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaskQueuePageRank {
    damping: f64,
    num_threads: usize,
    granularity: Granularity,
}

/// The update of a block of nodes.
#[derive(Debug, Clone)]
struct BlockTask {
    range: Range<usize>,
    /// The index of the current vector.
    current: usize,
    sum_b: f64,
}

impl Default for TaskQueuePageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueuePageRank {
    /// Creates a solver using as many threads as there are CPUs.
    pub fn new() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            num_threads: num_cpus::get(),
            granularity: Granularity::default(),
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

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is zero.
    pub fn num_threads(&mut self, num_threads: usize) -> &mut Self {
        assert!(num_threads > 0, "The number of threads must be positive");
        self.num_threads = num_threads;
        self
    }

    /// Sets the size of the blocks of nodes forming a task.
    ///
    /// The last block of an iteration absorbs the remainder, so it can be
    /// up to twice as large.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }
}

impl RankSolver for TaskQueuePageRank {
    fn name(&self) -> &'static str {
        "task-queue"
    }

    fn solve_with_logging(
        &self,
        graph: &DualGraph,
        iterations: usize,
        pl: &mut impl ProgressLog,
    ) -> Result<Box<[f32]>> {
        let num_nodes = graph.num_nodes();
        let block_size = self
            .granularity
            .node_granularity(num_nodes, graph.num_arcs());
        log::info!("Damping factor: {}", self.damping);
        log::info!("Threads: {}", self.num_threads);
        log::info!(
            "Block size: {} nodes ({} blocks)",
            block_size,
            blocks(num_nodes, block_size).len()
        );
        log::info!("Dangling nodes: {}", graph.num_dangling());

        let mut buffers = RankBuffers::new(num_nodes)?;
        let kernel = Kernel::new(graph, self.damping);
        let mut shared = buffers.share();
        let cells = shared.cells;

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start(format!(
            "Computing task-queue PageRank with {} threads...",
            self.num_threads
        ));

        std::thread::scope(|scope| -> Result<()> {
            let pool = TaskPool::new(scope, self.num_threads, move |task: BlockTask| {
                // SAFETY: the blocks of an iteration are disjoint, and the
                // current vector is written only after all of them are done.
                unsafe {
                    kernel.update_range(
                        task.range,
                        cells[task.current],
                        cells[task.current ^ 1],
                        task.sum_b,
                    )
                };
            })?;

            for _ in 0..iterations {
                // SAFETY: no task is running
                let sum_b = kernel.dangling_rank(unsafe { shared.current_reader() });
                log::debug!("Dangling rank: {sum_b}");
                let current = shared.current_index();
                for range in blocks(num_nodes, block_size) {
                    pool.submit(BlockTask {
                        range,
                        current,
                        sum_b,
                    });
                }
                pool.wait()?;
                shared.swap();
                pl.update();
            }

            pool.shutdown()
        })?;

        pl.done();
        drop(shared);
        Ok(buffers.into_current())
    }
}
