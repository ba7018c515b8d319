/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::graphs::dual_graph::DualGraph;

/// Provides an implementation of Erdös-Rényi random graphs.
///
/// The Erdös-Rényi random graph model is a simple model for generating random
/// graphs. It is parameterized by the number of nodes `n` and the probability
/// `p` of an arc between any two nodes. In this implementation, loops are never
/// included, and since every ordered pair is considered exactly once there are
/// no duplicate arcs.
///
/// To obtain on average *m* arcs, use *p* = *m* / (*n* (*n* − 1)), as done by
/// [`with_expected_arcs`](Self::with_expected_arcs).
///
/// Note that the time required to generate the graph is quadratic in `n`.
#[derive(Debug, Clone)]
pub struct ErdosRenyi {
    n: usize,
    p: f64,
    seed: u64,
}

impl ErdosRenyi {
    /// Create a new Erdös-Rényi random graph, given the number of
    /// nodes, the probability of an arc between any two nodes, and a
    /// seed for the [pseudorandom number generator](SmallRng).
    pub fn new(n: usize, p: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p), "p must be in [0..1]");
        Self { n, p, seed }
    }

    /// Create a new Erdös-Rényi random graph with `m` expected arcs.
    pub fn with_expected_arcs(n: usize, m: u64, seed: u64) -> Self {
        let pairs = n as f64 * n.saturating_sub(1) as f64;
        let p = if pairs == 0.0 {
            0.0
        } else {
            (m as f64 / pairs).min(1.0)
        };
        Self::new(n, p, seed)
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Returns the arcs of the graph, sorted lexicographically.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> {
        let (n, p) = (self.n, self.p);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        (0..n)
            .flat_map(move |x| (0..n).map(move |y| (x, y)))
            .filter(move |&(x, y)| x != y && rng.random_bool(p))
    }

    /// Builds the graph.
    pub fn generate(&self) -> DualGraph {
        DualGraph::from_arcs(self.n, self.arcs())
    }
}
