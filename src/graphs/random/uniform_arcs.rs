/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::graphs::dual_graph::DualGraph;

/// Random graphs obtained by drawing a fixed number of arcs.
///
/// The generator draws `m` pairs of nodes uniformly at random and keeps those
/// that are not loops. Thus, the resulting graph has at most `m` arcs, and it
/// might contain duplicates. Generation is linear in `m`, which makes this
/// model suitable for large sparse graphs.
#[derive(Debug, Clone)]
pub struct UniformArcs {
    n: usize,
    m: u64,
    seed: u64,
}

impl UniformArcs {
    /// Creates a new generator, given the number of nodes, the number of
    /// draws and a seed for the [pseudorandom number generator](SmallRng).
    pub fn new(n: usize, m: u64, seed: u64) -> Self {
        Self { n, m, seed }
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Returns the arcs of the graph in the order in which they were drawn.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.n;
        let draws = if n == 0 { 0 } else { self.m };
        let mut rng = SmallRng::seed_from_u64(self.seed);
        (0..draws)
            .map(move |_| (rng.random_range(0..n), rng.random_range(0..n)))
            .filter(|&(x, y)| x != y)
    }

    /// Builds the graph.
    pub fn generate(&self) -> DualGraph {
        DualGraph::from_arcs(self.n, self.arcs())
    }
}
