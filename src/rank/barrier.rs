/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::atomic::AtomicCell;
use crossbeam_utils::CachePadded;
use dsi_progress_logger::ProgressLog;

use super::{check_damping, Kernel, RankBuffers, RankSolver, DEFAULT_DAMPING};
use crate::error::{Error, Result};
use crate::graphs::dual_graph::DualGraph;
use crate::utils::partition::even_ranges;
use crate::utils::sync::{BreakOnPanic, BrokenBarrier, PhaseBarrier};

/// Parallel PageRank using workers bound to fixed ranges of nodes.
///
/// Each of the workers is assigned a contiguous range of nodes of (almost)
/// equal size when it is spawned. Workers and the main thread synchronize
/// on a [`PhaseBarrier`] with one party more than the number of workers,
/// which they wait on twice per iteration:
///
/// 1. the main thread computes the rank of dangling nodes, publishes it
///    together with the index of the current vector, and arrives at the
///    barrier; after leaving the barrier, each worker reads the published
///    values and updates its range of the next vector;
/// 2. workers arrive at the barrier when they are done, so that the main
///    thread can swap the vectors after leaving it.
///
/// If a worker cannot be spawned or panics, the barrier is broken and the
/// computation fails instead of blocking forever. The result is identical to
/// that of [`SinglePassPageRank`](super::single_pass::SinglePassPageRank).
#[derive(Debug, Clone)]
pub struct BarrierPageRank {
    damping: f64,
    num_threads: usize,
}

/// The values the main thread publishes at each iteration.
#[derive(Debug, Default)]
struct Published {
    sum_b: AtomicCell<f64>,
    current: AtomicUsize,
}

impl Default for BarrierPageRank {
    fn default() -> Self {
        Self::new()
    }
}

impl BarrierPageRank {
    /// Creates a solver using as many threads as there are CPUs.
    pub fn new() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            num_threads: num_cpus::get(),
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
}

impl RankSolver for BarrierPageRank {
    fn name(&self) -> &'static str {
        "barrier"
    }

    fn solve_with_logging(
        &self,
        graph: &DualGraph,
        iterations: usize,
        pl: &mut impl ProgressLog,
    ) -> Result<Box<[f32]>> {
        let num_nodes = graph.num_nodes();
        log::info!("Damping factor: {}", self.damping);
        log::info!("Threads: {}", self.num_threads);
        log::info!("Dangling nodes: {}", graph.num_dangling());

        let mut buffers = RankBuffers::new(num_nodes)?;
        let kernel = Kernel::new(graph, self.damping);
        let mut shared = buffers.share();
        let cells = shared.cells;
        let barrier = PhaseBarrier::new(self.num_threads + 1);
        let published = CachePadded::new(Published::default());

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start(format!(
            "Computing barrier PageRank with {} threads...",
            self.num_threads
        ));

        std::thread::scope(|scope| -> Result<()> {
            let _guard = BreakOnPanic(&barrier);
            let mut workers = Vec::with_capacity(self.num_threads);

            for (index, range) in even_ranges(num_nodes, self.num_threads).enumerate() {
                let barrier = &barrier;
                let published = &published;
                let spawned = std::thread::Builder::new()
                    .name(format!("barrier-worker-{index}"))
                    .spawn_scoped(scope, move || -> std::result::Result<(), BrokenBarrier> {
                        let _guard = BreakOnPanic(barrier);
                        log::trace!("Worker {index} started on nodes {range:?}");
                        for _ in 0..iterations {
                            barrier.wait()?;
                            // Ordered by the barrier
                            let current = published.current.load(Ordering::Relaxed);
                            let sum_b = published.sum_b.load();
                            // SAFETY: ranges are disjoint, and the main thread
                            // does not touch the vectors until the next wait.
                            unsafe {
                                kernel.update_range(
                                    range.clone(),
                                    cells[current],
                                    cells[current ^ 1],
                                    sum_b,
                                )
                            };
                            barrier.wait()?;
                        }
                        log::trace!("Worker {index} stopped");
                        Ok(())
                    });
                match spawned {
                    Ok(worker) => workers.push(worker),
                    Err(source) => {
                        // Releases the workers spawned so far, which the
                        // scope joins
                        barrier.break_barrier();
                        return Err(Error::Spawn { index, source });
                    }
                }
            }

            let mut result: Result<()> = Ok(());
            for _ in 0..iterations {
                // SAFETY: workers are waiting for the first phase
                let sum_b = kernel.dangling_rank(unsafe { shared.current_reader() });
                log::debug!("Dangling rank: {sum_b}");
                published.sum_b.store(sum_b);
                published
                    .current
                    .store(shared.current_index(), Ordering::Relaxed);
                if let Err(err) = barrier.wait().and_then(|_| barrier.wait()) {
                    result = Err(err.into());
                    break;
                }
                shared.swap();
                pl.update();
            }

            for worker in workers {
                if worker.join().is_err() {
                    result = Err(Error::WorkerPanicked);
                }
            }
            result
        })?;

        pl.done();
        drop(shared);
        Ok(buffers.into_current())
    }
}
