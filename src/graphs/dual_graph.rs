/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};

/// A mutable directed graph keeping both successor and predecessor lists.
///
/// Nodes are the integers in [0 . . *n*). Each node owns a vector of
/// successors and a vector of predecessors: [`add_arc`](Self::add_arc)
/// appends to both, so the two views always mirror each other, and the
/// outdegree and indegree of a node are just the lengths of its two vectors.
///
/// Arcs can only be added. Duplicate arcs and loops are stored as given: it is
/// up to the caller to avoid them if they are not wanted (the
/// [random generators](crate::graphs::random) never produce loops).
///
/// [Successors](Self::successors) and [predecessors](Self::predecessors) are
/// enumerated starting from the most recently added arc. The rank solvers
/// sum contributions in this order, so the order is part of the numerical
/// contract of the crate.
///
/// The graph is meant to be built once and then shared immutably among
/// threads: all query methods take `&self`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DualGraph {
    /// The number of arcs in the graph.
    num_arcs: u64,
    /// For each node, its list of successors, in insertion order.
    succ: Vec<Vec<usize>>,
    /// For each node, its list of predecessors, in insertion order.
    pred: Vec<Vec<usize>>,
}

impl DualGraph {
    /// Creates a new graph with `n` nodes and no arcs.
    ///
    /// Allocation failures abort the process, as with any standard
    /// collection; use [`try_empty`](Self::try_empty) to handle them.
    pub fn empty(n: usize) -> Self {
        Self {
            num_arcs: 0,
            succ: Vec::from_iter((0..n).map(|_| Vec::new())),
            pred: Vec::from_iter((0..n).map(|_| Vec::new())),
        }
    }

    /// Creates a new graph with `n` nodes and no arcs, reporting allocation
    /// failures as [`Error::Alloc`].
    pub fn try_empty(n: usize) -> Result<Self> {
        let mut succ = Vec::new();
        succ.try_reserve_exact(n).map_err(|source| Error::Alloc {
            what: "successor lists",
            len: n,
            source,
        })?;
        let mut pred = Vec::new();
        pred.try_reserve_exact(n).map_err(|source| Error::Alloc {
            what: "predecessor lists",
            len: n,
            source,
        })?;
        succ.resize_with(n, Vec::new);
        pred.resize_with(n, Vec::new);
        Ok(Self {
            num_arcs: 0,
            succ,
            pred,
        })
    }

    /// Creates a new graph with `n` nodes from an iterator of arcs.
    pub fn from_arcs(n: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::empty(n);
        g.add_arcs(arcs);
        g
    }

    /// Adds the arc (`u`, `v`) to the graph.
    ///
    /// # Panics
    ///
    /// This method will panic if one of the given nodes is greater or equal
    /// than the number of nodes in the graph.
    pub fn add_arc(&mut self, u: usize, v: usize) {
        let max = u.max(v);
        if max >= self.succ.len() {
            panic!(
                "Node {} does not exist (the graph has {} nodes)",
                max,
                self.succ.len(),
            );
        }
        self.succ[u].push(v);
        self.pred[v].push(u);
        self.num_arcs += 1;
    }

    /// Adds the arcs returned by an iterator, in order.
    ///
    /// # Panics
    ///
    /// See [`add_arc`](Self::add_arc).
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) -> &mut Self {
        for (u, v) in arcs {
            self.add_arc(u, v);
        }
        self
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    /// Returns the number of arcs.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Returns the successors of `node`, most recently added first.
    #[inline(always)]
    pub fn successors(
        &self,
        node: usize,
    ) -> impl ExactSizeIterator<Item = usize> + DoubleEndedIterator + '_ {
        self.succ[node].iter().rev().copied()
    }

    /// Returns the predecessors of `node`, most recently added first.
    #[inline(always)]
    pub fn predecessors(
        &self,
        node: usize,
    ) -> impl ExactSizeIterator<Item = usize> + DoubleEndedIterator + '_ {
        self.pred[node].iter().rev().copied()
    }

    #[inline(always)]
    pub fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }

    #[inline(always)]
    pub fn indegree(&self, node: usize) -> usize {
        self.pred[node].len()
    }

    /// Returns true if `node` has no successors.
    #[inline(always)]
    pub fn is_dangling(&self, node: usize) -> bool {
        self.succ[node].is_empty()
    }

    /// Returns the number of nodes without successors.
    pub fn num_dangling(&self) -> usize {
        self.succ.iter().filter(|s| s.is_empty()).count()
    }

    /// Returns an iterator over all arcs, in node order and, for each node,
    /// in successor order.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.num_nodes()).flat_map(move |u| self.successors(u).map(move |v| (u, v)))
    }
}
