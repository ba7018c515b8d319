/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Errors and the policy deciding what to do with them.
//!
//! No error in this crate is recoverable in the sense that a computation can
//! be resumed: allocation failures, threads that cannot be spawned and
//! workers that panic all leave a solver without a meaningful result. They
//! are nonetheless reported as values at the construction boundaries
//! ([graph creation](crate::graphs::dual_graph::DualGraph::try_empty), pool
//! creation, solver runs), and the top-level driver chooses a
//! [`FailurePolicy`].

use std::collections::TryReserveError;

use crate::utils::sync::BrokenBarrier;

/// The error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A buffer could not be allocated.
    #[error("Could not allocate {what} ({len} items)")]
    Alloc {
        what: &'static str,
        len: usize,
        #[source]
        source: TryReserveError,
    },

    /// A worker thread could not be spawned.
    #[error("Could not spawn worker thread {index}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked while processing its share of the vertices.
    #[error("A worker thread panicked")]
    WorkerPanicked,

    /// A barrier was broken before all parties arrived.
    #[error(transparent)]
    BrokenBarrier(#[from] BrokenBarrier),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What the top-level driver does with an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Logs the error and terminates the process with exit status 1. This
    /// is the default.
    #[default]
    Abort,
    /// Hands the error back to the caller.
    Propagate,
}

impl FailurePolicy {
    /// Applies the policy to a result.
    ///
    /// With [`Abort`](FailurePolicy::Abort) this function does not return
    /// if `result` is an error.
    pub fn check<T>(self, result: Result<T>) -> Result<T> {
        match (self, result) {
            (FailurePolicy::Abort, Err(err)) => {
                log::error!("Fatal error: {err}");
                let mut source = std::error::Error::source(&err);
                while let Some(cause) = source {
                    log::error!("Caused by: {cause}");
                    source = cause.source();
                }
                std::process::exit(1);
            }
            (_, result) => result,
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Propagate => f.write_str("propagate"),
        }
    }
}

/// Allocates a boxed slice of `len` copies of `value`, reporting allocation
/// failures as [`Error::Alloc`].
pub(crate) fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Box<[T]>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| Error::Alloc { what, len, source })?;
    v.resize(len, value);
    Ok(v.into_boxed_slice())
}
