//! Synthetic contact graph generation.
//!
//! Generators build weighted graphs in memory for experiments without an
//! external data source. Edge weights are drawn uniformly from `[0, 1)`.

mod erdos_renyi;
mod lobster;

pub use erdos_renyi::ErdosRenyiGenerator;
pub use lobster::LobsterGenerator;

use contagion_types::ContactGraph;

/// Trait for generating contact graphs.
pub trait GraphGenerator {
    /// Generate a graph. Nodes are numbered from zero.
    fn generate(&self, rng: &mut impl rand::Rng) -> ContactGraph<u32>;
}
