/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Seeded random graph generators.
//!
//! Both generators are deterministic given their seed, and neither produces
//! loops.

mod er;
pub use er::ErdosRenyi;

mod uniform_arcs;
pub use uniform_arcs::UniformArcs;
