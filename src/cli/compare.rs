/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::{bail, ensure, Result};
use clap::Parser;

use super::{FloatVectorFormat, GlobalArgs};
use crate::rank::{first_mismatch, l_inf_distance};

#[derive(Parser, Debug)]
#[command(
    name = "compare",
    about = "Checks whether two rank vectors are equal, exactly or within a tolerance. Exits with a non-zero status if they differ.",
    long_about = None
)]
pub struct CliArgs {
    /// The first rank vector.
    pub first: PathBuf,

    /// The second rank vector.
    pub second: PathBuf,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The format of the rank vectors.
    pub fmt: FloatVectorFormat,

    #[arg(short, long, default_value_t = 0.0)]
    /// The maximum absolute difference between ranks considered equal.
    pub tolerance: f64,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        args.tolerance >= 0.0,
        "The tolerance must be nonnegative, got {}",
        args.tolerance
    );
    let first = args.fmt.load(&args.first)?;
    let second = args.fmt.load(&args.second)?;
    compare(&first, &second, args.tolerance)?;
    log::info!(
        "{} and {} are equal",
        args.first.display(),
        args.second.display()
    );
    Ok(())
}

/// Fails if the vectors differ by more than `tolerance` somewhere.
pub fn compare(first: &[f32], second: &[f32], tolerance: f64) -> Result<()> {
    ensure!(
        first.len() == second.len(),
        "The vectors have different lengths ({} and {})",
        first.len(),
        second.len()
    );
    if let Some(index) = first_mismatch(first, second, tolerance) {
        bail!(
            "The vectors differ at index {}: {} != {} (ℓ∞ distance {:e})",
            index,
            first[index],
            second[index],
            l_inf_distance(first, second)
        );
    }
    Ok(())
}
