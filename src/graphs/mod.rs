/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

pub mod dual_graph;
pub mod random;

pub mod prelude {
    pub use super::dual_graph::DualGraph;
    pub use super::random::{ErdosRenyi, UniformArcs};
}
