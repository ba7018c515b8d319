/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::prelude::*;
use pagerank_pools::prelude::*;

type Solve = Box<dyn Fn(&DualGraph, usize) -> pagerank_pools::Result<Box<[f32]>>>;

/// Returns all variants, with the given number of threads and granularity
/// for the parallel ones, as closures computing a rank vector.
fn solvers(num_threads: usize, granularity: Granularity) -> Vec<(&'static str, Solve)> {
    let serial = SerialPageRank::new();
    let single_pass = SinglePassPageRank::new();
    let mut task_queue = TaskQueuePageRank::new();
    task_queue.num_threads(num_threads).granularity(granularity);
    let mut barrier = BarrierPageRank::new();
    barrier.num_threads(num_threads);

    let mut result: Vec<(&'static str, Solve)> = Vec::new();
    result.push((
        "serial",
        Box::new(move |g: &DualGraph, i: usize| serial.solve(g, i)),
    ));
    result.push((
        "single-pass",
        Box::new(move |g: &DualGraph, i: usize| single_pass.solve(g, i)),
    ));
    result.push((
        "task-queue",
        Box::new(move |g: &DualGraph, i: usize| task_queue.solve(g, i)),
    ));
    result.push((
        "barrier",
        Box::new(move |g: &DualGraph, i: usize| barrier.solve(g, i)),
    ));
    result
}

fn cycle(n: usize) -> DualGraph {
    DualGraph::from_arcs(n, (0..n).map(|i| (i, (i + 1) % n)))
}

#[test]
fn test_four_nodes_one_iteration() -> Result<()> {
    let g = DualGraph::from_arcs(4, [(0, 1), (1, 2), (2, 0)]);
    let expected = [0.303125, 0.303125, 0.303125, 0.090625];
    for (name, solve) in solvers(2, Granularity::Nodes(1)) {
        let rank = solve(&g, 1)?;
        assert!(
            l_inf_distance(&rank, &expected) < 1E-6,
            "{name}: {rank:?} != {expected:?}"
        );
    }
    Ok(())
}

#[test]
fn test_zero_iterations() -> Result<()> {
    let g = ErdosRenyi::with_expected_arcs(100, 300, 0).generate();
    for (name, solve) in solvers(4, Granularity::default()) {
        let rank = solve(&g, 0)?;
        assert_eq!(rank.len(), 100);
        assert!(rank.iter().all(|&r| r == (1.0 / 100.0f64) as f32), "{name}");
    }
    Ok(())
}

#[test]
fn test_empty() -> Result<()> {
    let g = DualGraph::empty(0);
    for (name, solve) in solvers(3, Granularity::default()) {
        assert!(solve(&g, 10)?.is_empty(), "{name}");
    }
    Ok(())
}

#[test]
fn test_no_arcs() -> Result<()> {
    // Every node is dangling, so the rank stays uniform
    let g = DualGraph::empty(10);
    for (name, solve) in solvers(3, Granularity::Nodes(3)) {
        let rank = solve(&g, 20)?;
        assert!(l_inf_distance(&rank, &[0.1; 10]) < 1E-6, "{name}: {rank:?}");
    }
    Ok(())
}

#[test]
fn test_cycle_stays_uniform() -> Result<()> {
    let g = cycle(10);
    for (name, solve) in solvers(4, Granularity::Nodes(2)) {
        let rank = solve(&g, 50)?;
        assert!(l_inf_distance(&rank, &[0.1; 10]) < 1E-6, "{name}: {rank:?}");
    }
    Ok(())
}

#[test]
fn test_star() -> Result<()> {
    // All leaves point to the center, which points to nothing
    let n = 11;
    let g = DualGraph::from_arcs(n, (1..n).map(|i| (i, 0)));
    let rank = SinglePassPageRank::new().solve(&g, 100)?;
    let (center, leaf) = (rank[0] as f64, rank[1] as f64);
    assert!(rank[1..].iter().all(|&r| r == rank[1]));
    assert!(center > leaf);
    // A leaf only gets the random jump and its share of the center's rank
    let d = DEFAULT_DAMPING;
    assert!((leaf - (d / n as f64 + (1.0 - d) * center / n as f64)).abs() < 1E-6);
    assert!((center + (n - 1) as f64 * leaf - 1.0).abs() < 1E-5);
    Ok(())
}

#[test]
fn test_mass_conservation() -> Result<()> {
    let g = ErdosRenyi::with_expected_arcs(1000, 3000, 1).generate();
    assert!(g.num_dangling() > 0);
    for (name, solve) in solvers(4, Granularity::default()) {
        if name == "serial" {
            continue;
        }
        for iterations in [1, 10, 100] {
            let rank = solve(&g, iterations)?;
            let sum = rank.iter().map(|&r| r as f64).sum::<f64>();
            assert!((sum - 1.0).abs() < 1E-4, "{name}, {iterations}: {sum}");
            assert!(rank.iter().all(|&r| r > 0.0));
        }
    }
    Ok(())
}

#[test]
fn test_damping_one() -> Result<()> {
    let g = ErdosRenyi::with_expected_arcs(50, 200, 2).generate();
    let mut solver = TaskQueuePageRank::new();
    solver.damping(1.0).num_threads(3);
    let rank = solver.solve(&g, 5)?;
    assert!(rank.iter().all(|&r| r == (1.0 / 50.0f64) as f32));
    Ok(())
}

#[test]
fn test_serial_equivalence() -> Result<()> {
    let g = ErdosRenyi::with_expected_arcs(300, 1500, 3).generate();
    let serial = SerialPageRank::new().solve(&g, 20)?;
    for (name, solve) in solvers(4, Granularity::Nodes(16)) {
        let rank = solve(&g, 20)?;
        assert!(
            first_mismatch(&serial, &rank, 1E-4).is_none(),
            "{name}: ℓ∞ distance {}",
            l_inf_distance(&serial, &rank)
        );
    }
    Ok(())
}

#[test]
fn test_parallel_equivalence() -> Result<()> {
    for g in [
        ErdosRenyi::with_expected_arcs(1000, 5000, 4).generate(),
        // Duplicate arcs
        UniformArcs::new(1000, 20000, 5).generate(),
    ] {
        let reference = SinglePassPageRank::new().solve(&g, 15)?;
        for num_threads in [1, 2, 3, 8] {
            for granularity in [
                Granularity::Nodes(1),
                Granularity::Nodes(16),
                Granularity::Nodes(160),
                Granularity::Nodes(999),
                Granularity::Nodes(5000),
                Granularity::Arcs(100),
            ] {
                for (name, solve) in solvers(num_threads, granularity) {
                    if name == "serial" {
                        continue;
                    }
                    let rank = solve(&g, 15)?;
                    assert_eq!(
                        first_mismatch(&reference, &rank, 0.0),
                        None,
                        "{name} with {num_threads} threads and {granularity}"
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_loops() -> Result<()> {
    let mut g = cycle(20);
    g.add_arcs([(0, 0), (5, 5), (7, 3), (7, 3)]);
    let reference = SinglePassPageRank::new().solve(&g, 10)?;
    for (name, solve) in solvers(3, Granularity::Nodes(4)) {
        if name == "serial" {
            continue;
        }
        assert_eq!(solve(&g, 10)?, reference, "{name}");
    }
    Ok(())
}

#[test]
fn test_more_threads_than_nodes() -> Result<()> {
    let g = DualGraph::from_arcs(3, [(0, 1), (1, 2)]);
    let reference = SinglePassPageRank::new().solve(&g, 10)?;
    for (name, solve) in solvers(16, Granularity::Nodes(1)) {
        if name == "serial" {
            continue;
        }
        assert_eq!(solve(&g, 10)?, reference, "{name}");
    }
    Ok(())
}

#[test]
fn test_repeated_runs() -> Result<()> {
    let g = UniformArcs::new(2000, 10000, 6).generate();
    let reference = SinglePassPageRank::new().solve(&g, 5)?;
    let mut task_queue = TaskQueuePageRank::new();
    task_queue.num_threads(4).granularity(Granularity::Nodes(32));
    let mut barrier = BarrierPageRank::new();
    barrier.num_threads(4);
    for _ in 0..100 {
        assert_eq!(task_queue.solve(&g, 5)?, reference);
        assert_eq!(barrier.solve(&g, 5)?, reference);
    }
    Ok(())
}

#[test]
fn test_solve_with_logging() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let g = ErdosRenyi::with_expected_arcs(100, 500, 7).generate();
    let mut pl = ProgressLogger::default();
    let mut solver = BarrierPageRank::new();
    solver.num_threads(2);
    let rank = solver.solve_with_logging(&g, 3, &mut pl)?;
    assert_eq!(rank, SinglePassPageRank::new().solve(&g, 3)?);
    Ok(())
}

#[test]
fn test_names() {
    let names = solvers(1, Granularity::default())
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    let variants = Variant::ALL.map(|v| v.to_string());
    assert_eq!(names, variants);
    assert_eq!(SerialPageRank::new().name(), "serial");
    assert_eq!(SinglePassPageRank::new().name(), "single-pass");
    assert_eq!(TaskQueuePageRank::new().name(), "task-queue");
    assert_eq!(BarrierPageRank::new().name(), "barrier");
}

#[test]
#[should_panic(expected = "The damping factor must be in")]
fn test_invalid_damping() {
    SinglePassPageRank::new().damping(1.5);
}

#[test]
#[should_panic(expected = "The number of threads must be positive")]
fn test_zero_threads() {
    BarrierPageRank::new().num_threads(0);
}

#[cfg_attr(feature = "slow_tests", test)]
#[cfg_attr(not(feature = "slow_tests"), allow(dead_code))]
fn test_large() -> Result<()> {
    let g = UniformArcs::new(200_000, 2_000_000, 8).generate();
    let reference = SinglePassPageRank::new().solve(&g, 30)?;
    for num_threads in [2, 4, 8, 16] {
        let mut task_queue = TaskQueuePageRank::new();
        task_queue.num_threads(num_threads);
        assert_eq!(task_queue.solve(&g, 30)?, reference);
        let mut barrier = BarrierPageRank::new();
        barrier.num_threads(num_threads);
        assert_eq!(barrier.solve(&g, 30)?, reference);
    }
    let sum = reference.iter().map(|&r| r as f64).sum::<f64>();
    assert!((sum - 1.0).abs() < 1E-3);
    Ok(())
}

#[cfg_attr(feature = "slow_tests", test)]
#[cfg_attr(not(feature = "slow_tests"), allow(dead_code))]
fn test_large_serial() -> Result<()> {
    let g = ErdosRenyi::with_expected_arcs(3000, 30000, 9).generate();
    let serial = SerialPageRank::new().solve(&g, 10)?;
    let reference = SinglePassPageRank::new().solve(&g, 10)?;
    assert!(first_mismatch(&serial, &reference, 1E-4).is_none());
    Ok(())
}
