/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser};
use dsi_progress_logger::prelude::*;

use super::{solve, FloatVectorFormat, GlobalArgs, SolverArgs, VariantArg};
use crate::graphs::dual_graph::DualGraph;

#[derive(Args, Debug)]
/// Shared CLI arguments for reading files containing arcs.
pub struct ArcsArgs {
    #[arg(long, default_value_t = '#')]
    /// Ignore lines that start with this symbol.
    pub line_comment_symbol: char,

    #[arg(long, default_value_t = '\t')]
    /// The column separator.
    pub separator: char,

    #[arg(long, default_value_t = 0)]
    /// The index of the column containing the source node of an arc.
    pub source_column: usize,

    #[arg(long, default_value_t = 1)]
    /// The index of the column containing the target node of an arc.
    pub target_column: usize,
}

#[derive(Parser, Debug)]
#[command(
    name = "run",
    about = "Reads a list of arcs, computes PageRank with one of the variants, and stores the rank vector. Each arc is specified by a pair of node identifiers (starting from zero) separated by a TAB (but the format is customizable).",
    long_about = None
)]
pub struct CliArgs {
    /// The file containing the arcs.
    pub arcs: PathBuf,

    #[arg(short, long)]
    /// Where to store the rank vector.
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = VariantArg::SinglePass)]
    /// The variant to run.
    pub variant: VariantArg,

    #[arg(long)]
    /// The number of nodes in the graph; if specified this will be used
    /// instead of the number inferred. This is useful if you want to add
    /// isolated nodes at the end of the graph.
    pub num_nodes: Option<usize>,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for the output.
    pub precision: Option<usize>,

    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    log::info!("Reading arcs from {}", args.arcs.display());
    let file = std::fs::File::open(&args.arcs)
        .with_context(|| format!("Could not open {}", args.arcs.display()))?;
    let (inferred_nodes, arcs) = read_arcs(
        &global_args,
        &args.arcs_args,
        std::io::BufReader::new(file),
    )?;

    let num_nodes = match args.num_nodes {
        Some(num_nodes) => {
            ensure!(
                num_nodes >= inferred_nodes,
                "The arcs mention node {}, but the graph has {} nodes",
                inferred_nodes - 1,
                num_nodes
            );
            num_nodes
        }
        None => inferred_nodes,
    };

    let mut graph = DualGraph::try_empty(num_nodes)?;
    graph.add_arcs(arcs);
    log::info!(
        "The graph has {} nodes, {} arcs and {} dangling nodes",
        graph.num_nodes(),
        graph.num_arcs(),
        graph.num_dangling()
    );

    let rank = solve(&global_args, &args.solver, args.variant.into(), &graph)?;
    args.fmt.store(&args.output, &rank, args.precision)?;

    Ok(())
}

/// Reads arcs from `input`, returning them together with one plus the
/// largest node they mention.
pub fn read_arcs(
    global_args: &GlobalArgs,
    arcs_args: &ArcsArgs,
    input: impl BufRead,
) -> Result<(usize, Vec<(usize, usize)>)> {
    let mut pl = ProgressLogger::default();
    pl.item_name("arc");
    if let Some(duration) = global_args.log_interval {
        pl.log_interval(duration);
    }
    pl.start("Reading arcs...");

    let biggest_idx = arcs_args.source_column.max(arcs_args.target_column);
    let mut num_nodes = 0;
    let mut arcs = Vec::new();
    for (line_num, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Could not read line {}", line_num + 1))?;
        if line.trim().is_empty() || line.trim().starts_with(arcs_args.line_comment_symbol) {
            continue;
        }

        let vals = line.split(arcs_args.separator).collect::<Vec<_>>();
        if vals.len() <= biggest_idx {
            bail!(
                "Line {}: {:?} does not have enough columns: got {} columns but expected at least {} columns separated by {:?} (you can change the separator using the --separator option)",
                line_num + 1,
                line,
                vals.len(),
                biggest_idx + 1,
                arcs_args.separator,
            );
        }

        let parse = |column: usize| {
            let val = vals[column].trim();
            val.parse::<usize>().with_context(|| {
                format!(
                    "Line {}: could not parse {:?} in column {} as a node",
                    line_num + 1,
                    val,
                    column
                )
            })
        };
        let src = parse(arcs_args.source_column)?;
        let dst = parse(arcs_args.target_column)?;
        let Some(bound) = src.max(dst).checked_add(1) else {
            bail!(
                "Line {}: node {} is too large",
                line_num + 1,
                src.max(dst)
            );
        };
        num_nodes = num_nodes.max(bound);
        arcs.push((src, dst));
        pl.light_update();
    }
    pl.done();

    Ok((num_nodes, arcs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_arcs_args() -> ArcsArgs {
        ArcsArgs {
            line_comment_symbol: '#',
            separator: '\t',
            source_column: 0,
            target_column: 1,
        }
    }

    #[test]
    fn test_read_arcs() -> Result<()> {
        let global_args = GlobalArgs { log_interval: None };
        let input = "# a comment\n0\t1\n1\t2\n\n2\t0\n5\t1\n";
        let (num_nodes, arcs) = read_arcs(&global_args, &default_arcs_args(), input.as_bytes())?;
        assert_eq!(num_nodes, 6);
        assert_eq!(arcs, [(0, 1), (1, 2), (2, 0), (5, 1)]);
        Ok(())
    }

    #[test]
    fn test_read_arcs_columns() -> Result<()> {
        let global_args = GlobalArgs { log_interval: None };
        let arcs_args = ArcsArgs {
            separator: ',',
            source_column: 2,
            target_column: 0,
            ..default_arcs_args()
        };
        let (num_nodes, arcs) = read_arcs(&global_args, &arcs_args, "3,x,1\n".as_bytes())?;
        assert_eq!(num_nodes, 4);
        assert_eq!(arcs, [(1, 3)]);
        Ok(())
    }

    #[test]
    fn test_read_arcs_errors() {
        let global_args = GlobalArgs { log_interval: None };
        assert!(read_arcs(&global_args, &default_arcs_args(), "0 1\n".as_bytes()).is_err());
        assert!(read_arcs(&global_args, &default_arcs_args(), "0\tone\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_arcs_largest_node() {
        let global_args = GlobalArgs { log_interval: None };
        let max = usize::MAX.to_string();
        for input in [format!("{max}\t0\n"), format!("0\t1\n1\t{max}\n")] {
            let err = read_arcs(&global_args, &default_arcs_args(), input.as_bytes())
                .unwrap_err()
                .to_string();
            assert!(err.contains("too large"), "{err}");
        }
    }
}
