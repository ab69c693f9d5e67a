//! Error types for the simulator.

use contagion_core::DistributionError;
use contagion_simulation::SimulationError;
use thiserror::Error;

/// Errors setting up or running a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Distribution parameters are invalid.
    #[error("Invalid distribution: {0}")]
    Distribution(#[from] DistributionError),

    /// The graph or seed set was rejected.
    #[error("Simulation setup failed: {0}")]
    Simulation(#[from] SimulationError),
}
