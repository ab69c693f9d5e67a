//! Random lobster graph generator.

use crate::config::LobsterConfig;
use crate::generators::GraphGenerator;
use crate::SimulatorError;
use contagion_types::ContactGraph;
use tracing::debug;

/// Generates random lobster graphs.
///
/// The backbone is a path `0 - 1 - ... - (len - 1)`. Each backbone node
/// keeps gaining leaves while a coin with probability `p_backbone` comes up,
/// and each such leaf keeps gaining leaves of its own with probability
/// `p_leaf`. New nodes are numbered consecutively after the backbone.
pub struct LobsterGenerator {
    config: LobsterConfig,
}

impl LobsterGenerator {
    /// Create a new lobster generator.
    pub fn new(config: LobsterConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generator configuration.
    pub fn config(&self) -> &LobsterConfig {
        &self.config
    }
}

impl GraphGenerator for LobsterGenerator {
    fn generate(&self, rng: &mut impl rand::Rng) -> ContactGraph<u32> {
        let backbone_len =
            (2.0 * rng.gen::<f64>() * self.config.backbone_length as f64 + 0.5) as u32;

        let mut graph = ContactGraph::new();
        for node in 0..backbone_len {
            graph.add_node(node);
        }
        for node in 1..backbone_len {
            graph.add_edge(node - 1, node, rng.gen::<f64>());
        }

        let mut current = backbone_len.saturating_sub(1);
        for spine in 0..backbone_len {
            while rng.gen::<f64>() < self.config.p_backbone {
                current += 1;
                graph.add_edge(spine, current, rng.gen::<f64>());

                let leaf = current;
                while rng.gen::<f64>() < self.config.p_leaf {
                    current += 1;
                    graph.add_edge(leaf, current, rng.gen::<f64>());
                }
            }
        }

        debug!(
            backbone = backbone_len,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Generated lobster graph"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_types::ContactTopology;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_lobster_is_a_valid_tree() {
        let generator = LobsterGenerator::new(LobsterConfig::default()).unwrap();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let graph = generator.generate(&mut rng);
            let topology = ContactTopology::from_graph(&graph).unwrap();

            // Connected acyclic graph: one edge fewer than nodes.
            if topology.node_count() > 0 {
                assert_eq!(topology.edge_count(), topology.node_count() - 1);
            }
            for edge in graph.edges() {
                let w = edge.weight.unwrap();
                assert!((0.0..1.0).contains(&w));
            }
        }
    }

    #[test]
    fn test_nodes_numbered_consecutively() {
        let generator = LobsterGenerator::new(LobsterConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let graph = generator.generate(&mut rng);

        let nodes: Vec<u32> = graph.nodes().copied().collect();
        let mut sorted = nodes.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..nodes.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_leaves_gives_bare_backbone() {
        let generator =
            LobsterGenerator::new(LobsterConfig::default().with_probabilities(0.0, 0.0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let graph = generator.generate(&mut rng);

        assert!(graph.node_count() <= 2 * generator.config().backbone_length + 1);
        for edge in graph.edges() {
            assert_eq!(edge.b, edge.a + 1);
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let generator = LobsterGenerator::new(LobsterConfig::default()).unwrap();
        let a = generator.generate(&mut ChaCha8Rng::seed_from_u64(5));
        let b = generator.generate(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a.edges(), b.edges());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        assert!(matches!(
            LobsterGenerator::new(LobsterConfig::default().with_probabilities(1.0, 0.0)),
            Err(SimulatorError::InvalidConfig(_))
        ));
    }
}
