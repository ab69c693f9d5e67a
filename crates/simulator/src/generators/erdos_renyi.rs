//! Erdős–Rényi `G(n, p)` graph generator.

use crate::config::ErdosRenyiConfig;
use crate::generators::GraphGenerator;
use crate::SimulatorError;
use contagion_types::ContactGraph;
use tracing::debug;

/// Generates graphs where each pair of nodes is connected independently.
pub struct ErdosRenyiGenerator {
    config: ErdosRenyiConfig,
}

impl ErdosRenyiGenerator {
    /// Create a new generator.
    pub fn new(config: ErdosRenyiConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl GraphGenerator for ErdosRenyiGenerator {
    fn generate(&self, rng: &mut impl rand::Rng) -> ContactGraph<u32> {
        let n = self.config.nodes;
        let mut graph = ContactGraph::new();
        for node in 0..n {
            graph.add_node(node);
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.gen::<f64>() < self.config.p_edge {
                    graph.add_edge(a, b, rng.gen::<f64>());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Generated Erdős–Rényi graph"
        );
        graph
    }
}
