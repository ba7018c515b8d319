/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The command-line interface.
//!
//! This module contains the argument groups shared by subcommands, the
//! formats used to store rank vectors, the logger setup, and one submodule
//! per subcommand.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsi_progress_logger::{progress_logger, ProgressLog};

use crate::graphs::dual_graph::DualGraph;
use crate::rank::prelude::*;
use crate::utils::Granularity;
use crate::FailurePolicy;

pub mod bench;
pub mod compare;
pub mod run;

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "The number of threads must be positive");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = num_cpus::get().max(1), value_parser = num_threads_parser)]
    /// The number of worker threads of the parallel variants.
    pub num_threads: usize,
}

/// Shared CLI arguments for commands that specify a granularity.
#[derive(Args, Debug)]
pub struct GranularityArgs {
    #[arg(long, conflicts_with("node_granularity"))]
    /// The tentative number of arcs used to define the size of a task of the
    /// task-queue variant (advanced option).
    pub arc_granularity: Option<u64>,

    #[arg(long, conflicts_with("arc_granularity"))]
    /// The number of nodes in a task of the task-queue variant (default: 160,
    /// that is, ten cache lines of ranks).
    pub node_granularity: Option<usize>,
}

impl GranularityArgs {
    pub fn into_granularity(&self) -> Granularity {
        match (self.arc_granularity, self.node_granularity) {
            (Some(_), Some(_)) => unreachable!(),
            (Some(arc_granularity), None) => Granularity::Arcs(arc_granularity),
            (None, Some(node_granularity)) => Granularity::Nodes(node_granularity),
            (None, None) => Granularity::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// The PageRank variants.
pub enum VariantArg {
    /// Quadratic baseline.
    Serial,
    /// Sequential, one pass over the arcs per iteration.
    SinglePass,
    /// Parallel, blocks of nodes handed out through a task queue.
    TaskQueue,
    /// Parallel, fixed ranges of nodes synchronized by a barrier.
    Barrier,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Serial => Variant::Serial,
            VariantArg::SinglePass => Variant::SinglePass,
            VariantArg::TaskQueue => Variant::TaskQueue,
            VariantArg::Barrier => Variant::Barrier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
/// What to do when a solver fails.
pub enum FailurePolicyArg {
    /// Log the error and exit with status 1.
    #[default]
    Abort,
    /// Report the error through the normal error path.
    Propagate,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(value: FailurePolicyArg) -> Self {
        match value {
            FailurePolicyArg::Abort => FailurePolicy::Abort,
            FailurePolicyArg::Propagate => FailurePolicy::Propagate,
        }
    }
}

/// Shared CLI arguments for commands running solvers.
#[derive(Args, Debug)]
pub struct SolverArgs {
    #[arg(short, long, default_value_t = DEFAULT_DAMPING)]
    /// The damping factor, that is, the probability of a random jump (must be
    /// in the interval [0 . . 1]).
    pub damping: f64,

    #[arg(short, long, default_value_t = 100)]
    /// The number of iterations.
    pub iterations: usize,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,

    #[arg(long, value_enum, default_value_t = FailurePolicyArg::Abort)]
    /// What to do if a solver fails (e.g., a worker thread cannot be spawned).
    pub on_failure: FailurePolicyArg,
}

/// Runs the given variant on `graph` as specified by `args`, logging progress.
pub fn solve(
    global_args: &GlobalArgs,
    args: &SolverArgs,
    variant: Variant,
    graph: &DualGraph,
) -> Result<Box<[f32]>> {
    ensure!(
        (0.0..=1.0).contains(&args.damping),
        "The damping factor must be in [0 . . 1], got {}",
        args.damping
    );

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let result = match variant {
        Variant::Serial => {
            let mut solver = SerialPageRank::new();
            solver.damping(args.damping);
            solver.solve_with_logging(graph, args.iterations, &mut pl)
        }
        Variant::SinglePass => {
            let mut solver = SinglePassPageRank::new();
            solver.damping(args.damping);
            solver.solve_with_logging(graph, args.iterations, &mut pl)
        }
        Variant::TaskQueue => {
            let mut solver = TaskQueuePageRank::new();
            solver
                .damping(args.damping)
                .num_threads(args.num_threads.num_threads)
                .granularity(args.granularity.into_granularity());
            solver.solve_with_logging(graph, args.iterations, &mut pl)
        }
        Variant::Barrier => {
            let mut solver = BarrierPageRank::new();
            solver
                .damping(args.damping)
                .num_threads(args.num_threads.num_threads);
            solver.solve_with_logging(graph, args.iterations, &mut pl)
        }
    };

    FailurePolicy::from(args.on_failure)
        .check(result)
        .with_context(|| format!("The {variant} solver failed"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Formats for storing and loading rank vectors.
pub enum FloatVectorFormat {
    /// ASCII format, one float per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Stores float values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// `precision` will be used to truncate the float values to the specified
    /// number of decimal digits. If `None`, the shortest representation that
    /// parses back to the same value is used.
    pub fn store(&self, path: impl AsRef<Path>, values: &[f32], precision: Option<usize>) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for word in values.iter() {
                    match precision {
                        None => writeln!(file, "{word}"),
                        Some(precision) => writeln!(file, "{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                write!(file, "[")?;
                for (i, word) in values.iter().enumerate() {
                    let sep = if i == 0 { "" } else { ", " };
                    match precision {
                        None => write!(file, "{sep}{word}"),
                        Some(precision) => write!(file, "{sep}{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                write!(file, "]")?;
            }
        }

        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))
    }

    /// Loads float values from the specified `path` using the format defined
    /// by `self`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<f32>> {
        let path = path.as_ref();
        let path_display = path.display();
        let file =
            std::fs::File::open(path).with_context(|| format!("Could not open {}", path_display))?;
        let reader = BufReader::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Loading ASCII format from {}", path_display);
                reader
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                    .map(|(i, line)| {
                        let line = line.with_context(|| {
                            format!("Error reading line {} of {}", i + 1, path_display)
                        })?;
                        line.trim().parse::<f32>().map_err(|e| {
                            anyhow!("Error parsing line {} of {}: {}", i + 1, path_display, e)
                        })
                    })
                    .collect()
            }
            FloatVectorFormat::Json => {
                log::info!("Loading JSON format from {}", path_display);
                serde_json::from_reader(reader)
                    .with_context(|| format!("Could not parse JSON array in {}", path_display))
            }
        }
    }
}

/// Creates the directory that will contain `path`, if needed.
pub fn create_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Parses a duration such as `1m30s` or `1d2h3m4s567`.
///
/// Each number is followed by a unit among `d`, `h`, `m` and `s`; a
/// trailing number without a unit is in milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    ensure!(!value.trim().is_empty(), "Empty duration");
    let mut duration = Duration::ZERO;
    let mut digits = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit_secs = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => bail!("Invalid duration unit {c:?} in {value:?}"),
        };
        let count = digits
            .parse::<u64>()
            .with_context(|| format!("Missing count before {c:?} in {value:?}"))?;
        duration += Duration::from_secs(count * unit_secs);
        digits.clear();
    }
    if !digits.is_empty() {
        duration += Duration::from_millis(digits.parse()?);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress (e.g., `30s` or `2m`; default 10s).
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Bench(bench::CliArgs),
    Run(run::CliArgs),
    Compare(compare::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "pagerank-pools", version)]
/// Serial and multithreaded PageRank over in-memory directed graphs.
///
/// Noteworthy environment variables:
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Bench(args) => {
            bench::main(cli.args, args)?;
        }
        SubCommands::Run(args) => {
            run::main(cli.args, args)?;
        }
        SubCommands::Compare(args) => {
            compare::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        format_elapsed(start.elapsed())
    );

    Ok(())
}

/// Formats an elapsed time as hours, minutes and seconds, omitting leading
/// zero units.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, minutes) = (secs / 3600, secs / 60 % 60);
    let seconds = elapsed.as_secs_f64() % 60.0;
    match (hours, minutes) {
        (0, 0) => format!("{seconds:.3}s"),
        (0, _) => format!("{minutes}m {seconds:.3}s"),
        _ => format!("{hours}h {minutes}m {seconds:.3}s"),
    }
}
