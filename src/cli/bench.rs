/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};

use super::{format_elapsed, solve, GlobalArgs, SolverArgs, VariantArg};
use crate::graphs::prelude::*;
use crate::rank::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Random graph models.
pub enum Model {
    /// A given number of uniformly drawn arcs, without loops (duplicates are
    /// possible).
    Uniform,
    /// Each arc is present with the same probability (no duplicates, no
    /// loops).
    ErdosRenyi,
}

#[derive(Parser, Debug)]
#[command(
    name = "bench",
    about = "Benchmarks the PageRank variants on a random graph, and checks that they agree.",
    long_about = None
)]
pub struct CliArgs {
    #[arg(short, long, default_value_t = 1000)]
    /// The number of nodes.
    pub nodes: usize,

    #[arg(short = 'm', long, default_value_t = 10000)]
    /// The (expected) number of arcs.
    pub arcs: u64,

    #[arg(long, value_enum, default_value_t = Model::ErdosRenyi)]
    /// The random graph model.
    pub model: Model,

    #[arg(short, long, default_value_t = 0)]
    /// The seed of the random graph.
    pub seed: u64,

    #[arg(short = 'V', long, value_enum, value_delimiter = ',')]
    /// The variants to run (default: all of them).
    pub variants: Vec<VariantArg>,

    #[arg(short = 'R', long, default_value_t = 1)]
    /// Number of repeats of each variant.
    pub repeats: usize,

    #[arg(short, long, default_value_t = 1E-4)]
    /// The maximum absolute difference between ranks considered equal
    /// besides exact equality.
    pub tolerance: f64,

    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(args.repeats > 0, "The number of repeats must be positive");

    let graph = match args.model {
        Model::Uniform => UniformArcs::new(args.nodes, args.arcs, args.seed).generate(),
        Model::ErdosRenyi => ErdosRenyi::with_expected_arcs(args.nodes, args.arcs, args.seed).generate(),
    };
    log::info!(
        "Generated a graph with {} nodes, {} arcs and {} dangling nodes",
        graph.num_nodes(),
        graph.num_arcs(),
        graph.num_dangling()
    );

    let variants: Vec<Variant> = if args.variants.is_empty() {
        Variant::ALL.to_vec()
    } else {
        args.variants.iter().map(|&v| v.into()).collect()
    };

    let mut results = Vec::with_capacity(variants.len());
    for &variant in &variants {
        let mut rank = None;
        for _ in 0..args.repeats {
            let start = std::time::Instant::now();
            rank = Some(solve(&global_args, &args.solver, variant, &graph)?);
            log::info!(
                "Time for {variant}: {}",
                format_elapsed(start.elapsed())
            );
        }
        if let Some(rank) = rank {
            results.push((variant, rank));
        }
    }

    // Compare everything with the single-pass variant, or the first one
    let reference = results
        .iter()
        .position(|(v, _)| *v == Variant::SinglePass)
        .unwrap_or(0);
    if let Some((reference_variant, reference_rank)) = results.get(reference) {
        for (variant, rank) in &results {
            if variant == reference_variant {
                continue;
            }
            let exact = first_mismatch(reference_rank, rank, 0.0).is_none();
            let close = first_mismatch(reference_rank, rank, args.tolerance).is_none();
            log::info!(
                "{reference_variant} and {variant} are {} (ℓ∞ distance {:e})",
                if exact {
                    "equal".to_string()
                } else if close {
                    format!("equal within {}", args.tolerance)
                } else {
                    "different".to_string()
                },
                l_inf_distance(reference_rank, rank)
            );
        }
    }

    Ok(())
}
