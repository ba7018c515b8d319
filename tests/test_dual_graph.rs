/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::HashMap;

use anyhow::Result;
use pagerank_pools::prelude::*;

/// Checks that successor and predecessor lists mirror each other, and that
/// degrees add up to the number of arcs.
fn check_invariants(g: &DualGraph) {
    let n = g.num_nodes();
    let mut out_count = HashMap::new();
    let mut in_count = HashMap::new();
    let (mut total_out, mut total_in) = (0, 0);
    for u in 0..n {
        assert_eq!(g.successors(u).len(), g.outdegree(u));
        assert_eq!(g.predecessors(u).len(), g.indegree(u));
        assert_eq!(g.is_dangling(u), g.outdegree(u) == 0);
        total_out += g.outdegree(u) as u64;
        total_in += g.indegree(u) as u64;
        for v in g.successors(u) {
            *out_count.entry((u, v)).or_insert(0) += 1;
        }
        for v in g.predecessors(u) {
            *in_count.entry((v, u)).or_insert(0) += 1;
        }
    }
    assert_eq!(total_out, g.num_arcs());
    assert_eq!(total_in, g.num_arcs());
    assert_eq!(out_count, in_count);
    assert_eq!(g.arcs().count() as u64, g.num_arcs());
    assert_eq!(
        g.num_dangling(),
        (0..n).filter(|&u| g.is_dangling(u)).count()
    );
}

#[test]
fn test_invariants() -> Result<()> {
    check_invariants(&DualGraph::empty(0));
    check_invariants(&DualGraph::try_empty(10)?);
    check_invariants(&UniformArcs::new(100, 1000, 0).generate());
    check_invariants(&ErdosRenyi::new(100, 0.05, 0).generate());
    let mut g = DualGraph::empty(3);
    g.add_arcs([(0, 0), (0, 1), (0, 1), (2, 1)]);
    check_invariants(&g);
    Ok(())
}

#[test]
fn test_most_recent_first() {
    let mut g = DualGraph::empty(5);
    for v in 1..5 {
        g.add_arc(0, v);
        g.add_arc(v, 4);
    }
    assert_eq!(g.successors(0).collect::<Vec<_>>(), [4, 3, 2, 1]);
    // The arc 0 -> 4 is added just before the loop 4 -> 4
    assert_eq!(g.predecessors(4).collect::<Vec<_>>(), [4, 0, 3, 2, 1]);
    assert_eq!(g.outdegree(0), 4);
    assert_eq!(g.indegree(4), 5);
}

#[test]
fn test_from_arcs() {
    let arcs = [(0, 1), (1, 2), (2, 0)];
    let g = DualGraph::from_arcs(4, arcs);
    assert_eq!(g.num_nodes(), 4);
    assert_eq!(g.num_arcs(), 3);
    assert_eq!(g.num_dangling(), 1);
    assert!(g.is_dangling(3));
    let mut stored = g.arcs().collect::<Vec<_>>();
    stored.sort();
    assert_eq!(stored, arcs);
}

#[test]
#[should_panic(expected = "does not exist")]
fn test_missing_source() {
    let mut g = DualGraph::empty(2);
    g.add_arc(2, 0);
}

#[test]
fn test_erdos_renyi() {
    let g = ErdosRenyi::new(50, 0.2, 1).generate();
    assert_eq!(g, ErdosRenyi::new(50, 0.2, 1).generate());
    for u in 0..g.num_nodes() {
        let mut succ = g.successors(u).collect::<Vec<_>>();
        assert!(!succ.contains(&u));
        succ.sort();
        succ.dedup();
        assert_eq!(succ.len(), g.outdegree(u));
    }
    assert_eq!(ErdosRenyi::new(20, 1.0, 0).generate().num_arcs(), 20 * 19);
    assert_eq!(ErdosRenyi::new(20, 0.0, 0).generate().num_arcs(), 0);
}

#[test]
fn test_uniform_arcs() {
    let g = UniformArcs::new(30, 500, 2).generate();
    assert_eq!(g, UniformArcs::new(30, 500, 2).generate());
    assert!(g.num_arcs() <= 500);
    assert!(g.arcs().all(|(u, v)| u != v));
    assert_eq!(UniformArcs::new(0, 100, 0).generate().num_arcs(), 0);
}
