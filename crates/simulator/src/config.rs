//! Configuration types for the simulator.

use crate::SimulatorError;
use contagion_core::DistributionConfig;
use contagion_simulation::DwellPolicy;

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Number of steps to run after seeding.
    pub steps: u64,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Recovery, exposure threshold and incubation distributions.
    pub distributions: DistributionConfig,

    /// When dwell durations are drawn.
    pub dwell_policy: DwellPolicy,
}

impl SimulatorConfig {
    /// Create a new simulator configuration.
    pub fn new(steps: u64) -> Self {
        Self {
            steps,
            seed: 12345,
            distributions: DistributionConfig::default(),
            dwell_policy: DwellPolicy::default(),
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the transition distributions.
    pub fn with_distributions(mut self, distributions: DistributionConfig) -> Self {
        self.distributions = distributions;
        self
    }

    /// Set the dwell policy.
    pub fn with_dwell_policy(mut self, dwell_policy: DwellPolicy) -> Self {
        self.dwell_policy = dwell_policy;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        self.distributions.validate()?;
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Shape of a random lobster graph.
///
/// A lobster is a path (the backbone) with leaves attached to it, and
/// further leaves attached to those.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LobsterConfig {
    /// Expected backbone length. The actual length is drawn uniformly from
    /// `0..=2 * backbone_length`.
    pub backbone_length: usize,

    /// Probability of attaching one more leaf to a backbone node.
    pub p_backbone: f64,

    /// Probability of attaching one more leaf to a first-level leaf.
    pub p_leaf: f64,
}

impl Default for LobsterConfig {
    fn default() -> Self {
        Self {
            backbone_length: 10,
            p_backbone: 0.9,
            p_leaf: 0.9,
        }
    }
}

impl LobsterConfig {
    /// Set the expected backbone length.
    pub fn with_backbone_length(mut self, backbone_length: usize) -> Self {
        self.backbone_length = backbone_length;
        self
    }

    /// Set both attachment probabilities.
    pub fn with_probabilities(mut self, p_backbone: f64, p_leaf: f64) -> Self {
        self.p_backbone = p_backbone;
        self.p_leaf = p_leaf;
        self
    }

    /// Attachment probabilities must be in `[0, 1)` for generation to end.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        for (name, p) in [("p_backbone", self.p_backbone), ("p_leaf", self.p_leaf)] {
            if !(0.0..1.0).contains(&p) {
                return Err(SimulatorError::InvalidConfig(format!(
                    "{} must be in [0, 1), got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

/// Shape of an Erdős–Rényi random graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErdosRenyiConfig {
    /// Number of nodes.
    pub nodes: u32,

    /// Probability that any given pair of nodes is connected.
    pub p_edge: f64,
}

impl Default for ErdosRenyiConfig {
    fn default() -> Self {
        Self {
            nodes: 100,
            p_edge: 0.05,
        }
    }
}

impl ErdosRenyiConfig {
    /// Create a new configuration.
    pub fn new(nodes: u32, p_edge: f64) -> Self {
        Self { nodes, p_edge }
    }

    /// Edge probability must be in `[0, 1]`.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(0.0..=1.0).contains(&self.p_edge) {
            return Err(SimulatorError::InvalidConfig(format!(
                "p_edge must be in [0, 1], got {}",
                self.p_edge
            )));
        }
        Ok(())
    }
}
