/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// The number of rank values fitting in a 64-byte cache line.
pub const CACHE_LINE_FLOATS: usize = 64 / std::mem::size_of::<f32>();

/// The default number of nodes in a task: ten cache lines of rank values.
pub const DEFAULT_BLOCK_SIZE: usize = 10 * CACHE_LINE_FLOATS;

/// Granularity of parallel tasks, specified transparently by nodes or arcs.
///
/// The [task-queue solver](crate::rank::task_queue::TaskQueuePageRank) splits
/// the nodes of the graph into contiguous blocks, and each block becomes a
/// task. This enum specifies the size of the blocks either directly, as a
/// number of nodes, or indirectly, as a tentative number of arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Node granularity.
    ///
    /// Each task will be formed by the specified number of nodes (the last
    /// task absorbs the remainder).
    Nodes(usize),
    /// Arc granularity.
    ///
    /// Each task will be formed by a number of nodes equal to the specified
    /// number of arcs divided by the average indegree, rounded up to a
    /// multiple of [`CACHE_LINE_FLOATS`] so that tasks do not share cache
    /// lines of the rank vector they write.
    Arcs(u64),
}

impl core::default::Default for Granularity {
    /// Returns a granularity of [`DEFAULT_BLOCK_SIZE`] nodes.
    fn default() -> Self {
        Self::Nodes(DEFAULT_BLOCK_SIZE)
    }
}

impl Granularity {
    /// Returns the number of nodes in a task for a graph with the given
    /// number of nodes and arcs.
    ///
    /// The result is always positive.
    pub fn node_granularity(&self, num_nodes: usize, num_arcs: u64) -> usize {
        match *self {
            Self::Nodes(n) => n.max(1),
            Self::Arcs(n) => {
                let average_degree = (num_arcs as f64 / num_nodes.max(1) as f64).max(1.0);
                let nodes = (n as f64 / average_degree).min(usize::MAX as f64).ceil() as usize;
                nodes.max(1).next_multiple_of(CACHE_LINE_FLOATS)
            }
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nodes(n) => write!(f, "{n} nodes"),
            Self::Arcs(n) => write!(f, "{n} arcs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_granularity() {
        assert_eq!(CACHE_LINE_FLOATS, 16);
        assert_eq!(Granularity::default().node_granularity(1000, 10_000), 160);
        assert_eq!(Granularity::Nodes(0).node_granularity(10, 0), 1);
        // average degree 10: 1000 arcs are 100 nodes, rounded up to 112
        assert_eq!(Granularity::Arcs(1000).node_granularity(1000, 10_000), 112);
        // no arcs at all
        assert_eq!(Granularity::Arcs(20).node_granularity(100, 0), 32);
    }
}
