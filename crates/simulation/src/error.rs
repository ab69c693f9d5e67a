//! Error types for simulation setup.

use contagion_types::GraphError;
use thiserror::Error;

/// Errors building or seeding a simulator. Stepping never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The contact graph failed validation.
    #[error("invalid contact graph: {0}")]
    Graph(#[from] GraphError),

    /// A seed node is not in the graph.
    #[error("unknown node {0}")]
    UnknownNode(String),
}
