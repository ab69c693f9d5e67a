//! The SEIR transition engine over a contact network.

use crate::{SimulationError, Transitions};
use contagion_core::{exposure_probability, union_probability, Distributions};
use contagion_types::{ContactGraph, ContactTopology, NodeKey, NodeRecord, SeirState, Tau};
use indexmap::{IndexMap, IndexSet};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// When recovery and incubation durations are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DwellPolicy {
    /// Draw a fresh duration every step and compare it with the time spent
    /// in the state so far. The effective dwell time is then the first step
    /// at which a draw falls below the elapsed time, not a sample of the
    /// configured distribution.
    #[default]
    ResampleEachStep,

    /// Draw one duration when a node enters `Exposed` or `Infected` and
    /// keep it as a fixed deadline.
    SampleOnEntry,
}

/// Simulates SEIR spread over a weighted contact graph, one step at a time.
///
/// Owns a validated copy of the graph, one [`NodeRecord`] per node, the
/// clock, and the random generator every sampler draws from.
///
/// Each step decides every node's transition against the state at the
/// start of the step and only then applies them, so no decision in a step
/// can see another decision from the same step.
pub struct ContactNetworkSimulator<N, R = ChaCha8Rng> {
    /// Immutable topology and edge weights.
    topology: ContactTopology<N>,

    /// Per-node state, in topology node order.
    records: IndexMap<N, NodeRecord>,

    /// Current step.
    tau: Tau,

    /// Recovery, exposure threshold and incubation samplers.
    distributions: Distributions,

    /// When dwell durations are drawn.
    dwell_policy: DwellPolicy,

    /// The single generator behind every random draw.
    rng: R,
}

impl<N: NodeKey> ContactNetworkSimulator<N, ChaCha8Rng> {
    /// Create a simulator driven by a ChaCha8 generator seeded with `seed`.
    pub fn from_seed(
        graph: &ContactGraph<N>,
        distributions: Distributions,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        Self::new(graph, distributions, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<N: NodeKey, R: RngCore> ContactNetworkSimulator<N, R> {
    /// Create a simulator from a contact graph.
    ///
    /// The graph is validated and copied; every node starts `Susceptible`
    /// at `tau = 0`.
    pub fn new(
        graph: &ContactGraph<N>,
        distributions: Distributions,
        rng: R,
    ) -> Result<Self, SimulationError> {
        let topology = ContactTopology::from_graph(graph)?;
        let records = topology
            .nodes()
            .map(|node| (node.clone(), NodeRecord::susceptible()))
            .collect();

        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "Contact network simulator created"
        );

        Ok(Self {
            topology,
            records,
            tau: Tau::ZERO,
            distributions,
            dwell_policy: DwellPolicy::default(),
            rng,
        })
    }

    /// Set the dwell policy.
    pub fn with_dwell_policy(mut self, dwell_policy: DwellPolicy) -> Self {
        self.dwell_policy = dwell_policy;
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Seeding
    // ═══════════════════════════════════════════════════════════════════════════

    /// Force `nodes` into `Infected` at the current step, bypassing the
    /// transition rule.
    ///
    /// Every node is checked before any is changed: on
    /// [`SimulationError::UnknownNode`] no node has been seeded. Duplicates
    /// are seeded once. Returns the number of distinct nodes seeded.
    pub fn seed_infected<'a>(
        &mut self,
        nodes: impl IntoIterator<Item = &'a N>,
    ) -> Result<usize, SimulationError>
    where
        N: 'a,
    {
        let nodes: IndexSet<&N> = nodes.into_iter().collect();
        if let Some(unknown) = nodes.iter().find(|n| !self.records.contains_key(**n)) {
            return Err(SimulationError::UnknownNode(format!("{:?}", unknown)));
        }

        for node in &nodes {
            let deadline = match self.dwell_policy {
                DwellPolicy::ResampleEachStep => None,
                DwellPolicy::SampleOnEntry => {
                    Some(self.distributions.sample_recovery(&mut self.rng))
                }
            };
            if let Some(record) = self.records.get_mut(*node) {
                match deadline {
                    Some(deadline) => {
                        record.enter_with_deadline(SeirState::Infected, self.tau, deadline)
                    }
                    None => record.enter(SeirState::Infected, self.tau),
                }
            }
        }

        debug!(tau = self.tau.0, seeded = nodes.len(), "Seeded infected nodes");
        Ok(nodes.len())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Stepping
    // ═══════════════════════════════════════════════════════════════════════════

    /// Advance the simulation by one step.
    ///
    /// Returns the nodes that changed state, stamped with the pre-step
    /// clock value. The clock is then incremented.
    pub fn step(&mut self) -> Transitions<N> {
        let tau = self.tau;
        let mut transitions = Transitions::new(tau);

        for (node, record) in &self.records {
            let next = match record.state() {
                SeirState::Infected => {
                    let duration = match (self.dwell_policy, record.deadline()) {
                        (DwellPolicy::SampleOnEntry, Some(deadline)) => deadline,
                        _ => self.distributions.sample_recovery(&mut self.rng),
                    };
                    (record.elapsed(tau) as f64 >= duration).then_some(SeirState::Recovered)
                }
                SeirState::Exposed => {
                    let duration = match (self.dwell_policy, record.deadline()) {
                        (DwellPolicy::SampleOnEntry, Some(deadline)) => deadline,
                        _ => self.distributions.sample_incubation(&mut self.rng),
                    };
                    (record.elapsed(tau) as f64 >= duration).then_some(SeirState::Infected)
                }
                SeirState::Susceptible => {
                    let exposures: Vec<f64> = self
                        .topology
                        .neighbors(node)
                        .filter_map(|(neighbor, weight)| {
                            let neighbor = self.records.get(neighbor)?;
                            neighbor
                                .state()
                                .is_contagious()
                                .then(|| exposure_probability(weight, neighbor.elapsed(tau)))
                        })
                        .collect();

                    // No contagious neighbor: nothing to compare, no draw.
                    if exposures.is_empty() {
                        None
                    } else {
                        let z = union_probability(exposures);
                        let threshold = self.distributions.sample_exposure_threshold(&mut self.rng);
                        (z >= threshold).then_some(SeirState::Exposed)
                    }
                }
                SeirState::Recovered => None,
            };

            if let Some(next) = next {
                transitions.insert(node.clone(), next);
            }
        }

        self.apply(&transitions);
        self.tau = tau.next();

        debug!(
            tau = tau.0,
            transitions = transitions.len(),
            exposed = transitions.entered(SeirState::Exposed),
            infected = transitions.entered(SeirState::Infected),
            recovered = transitions.entered(SeirState::Recovered),
            "Step complete"
        );

        transitions
    }

    /// Write pending transitions back, each stamped with the step's clock.
    fn apply(&mut self, transitions: &Transitions<N>) {
        let tau = transitions.tau();
        for (node, next) in transitions.iter() {
            let deadline = match (self.dwell_policy, next) {
                (DwellPolicy::SampleOnEntry, SeirState::Exposed) => {
                    Some(self.distributions.sample_incubation(&mut self.rng))
                }
                (DwellPolicy::SampleOnEntry, SeirState::Infected) => {
                    Some(self.distributions.sample_recovery(&mut self.rng))
                }
                _ => None,
            };

            if let Some(record) = self.records.get_mut(node) {
                trace!(node = ?node, from = %record.state(), to = %next, "Transition");
                match deadline {
                    Some(deadline) => record.enter_with_deadline(next, tau, deadline),
                    None => record.enter(next, tau),
                }
            }
        }
    }

    /// Lazy, unbounded sequence of steps.
    ///
    /// Each item is the result of one [`step`](Self::step). There is no end
    /// condition; bound it with `take` or stop pulling.
    pub fn steps(&mut self) -> Steps<'_, N, R> {
        Steps { simulator: self }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current step.
    pub fn tau(&self) -> Tau {
        self.tau
    }

    /// Dwell policy in use.
    pub fn dwell_policy(&self) -> DwellPolicy {
        self.dwell_policy
    }

    /// The validated graph this simulator runs on.
    pub fn topology(&self) -> &ContactTopology<N> {
        &self.topology
    }

    /// Neighbors of `node` with their edge weights.
    ///
    /// Empty for an unknown node.
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, f64)> + 'a {
        self.topology.neighbors(node)
    }

    /// Record of `node`, if it exists.
    pub fn record(&self, node: &N) -> Option<&NodeRecord> {
        self.records.get(node)
    }

    /// State of `node`, if it exists.
    pub fn state(&self, node: &N) -> Option<SeirState> {
        self.records.get(node).map(NodeRecord::state)
    }

    /// Every node with its record, in node order.
    pub fn records(&self) -> impl Iterator<Item = (&N, &NodeRecord)> {
        self.records.iter()
    }

    /// Number of nodes currently in `state`.
    pub fn count(&self, state: SeirState) -> usize {
        self.records
            .values()
            .filter(|record| record.state() == state)
            .count()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.records.len()
    }
}

/// Iterator returned by [`ContactNetworkSimulator::steps`].
pub struct Steps<'a, N, R> {
    simulator: &'a mut ContactNetworkSimulator<N, R>,
}

impl<N: NodeKey, R: RngCore> Iterator for Steps<'_, N, R> {
    type Item = Transitions<N>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.simulator.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::ConstantSampler;
    use tracing_test::traced_test;

    fn pair() -> ContactGraph<&'static str> {
        ContactGraph::from_edges([("a", "b", 1.0)])
    }

    fn stubbed(threshold: f64, recovery: f64, incubation: f64) -> Distributions {
        Distributions::default()
            .with_exposure_threshold(ConstantSampler(threshold))
            .with_recovery(ConstantSampler(recovery))
            .with_incubation(ConstantSampler(incubation))
    }

    #[traced_test]
    #[test]
    fn test_new_simulator_is_all_susceptible() {
        let sim = ContactNetworkSimulator::from_seed(&pair(), Distributions::default(), 1).unwrap();

        assert_eq!(sim.tau(), Tau::ZERO);
        assert_eq!(sim.node_count(), 2);
        assert_eq!(sim.count(SeirState::Susceptible), 2);
        assert_eq!(sim.neighbors(&"a").collect::<Vec<_>>(), vec![(&"b", 1.0)]);
        assert_eq!(sim.neighbors(&"zzz").count(), 0);
        assert!(sim
            .records()
            .all(|(_, r)| r.time_changed_state() == Tau::ZERO));
    }

    #[traced_test]
    #[test]
    fn test_seed_infected() {
        let mut sim =
            ContactNetworkSimulator::from_seed(&pair(), Distributions::default(), 1).unwrap();

        let seeded = sim.seed_infected([&"a", &"a"]).unwrap();

        assert_eq!(seeded, 1);
        assert_eq!(sim.state(&"a"), Some(SeirState::Infected));
        assert_eq!(sim.state(&"b"), Some(SeirState::Susceptible));
        assert_eq!(sim.record(&"a").unwrap().time_changed_state(), Tau::ZERO);
        assert!(logs_contain("Seeded infected nodes"));
    }

    #[traced_test]
    #[test]
    fn test_seed_unknown_node_seeds_nothing() {
        let mut sim =
            ContactNetworkSimulator::from_seed(&pair(), Distributions::default(), 1).unwrap();

        let err = sim.seed_infected([&"a", &"zzz"]).unwrap_err();

        assert_eq!(err, SimulationError::UnknownNode("\"zzz\"".into()));
        assert_eq!(sim.count(SeirState::Infected), 0);
    }

    #[traced_test]
    #[test]
    fn test_step_logs_summary() {
        let mut sim =
            ContactNetworkSimulator::from_seed(&pair(), stubbed(0.0, 100.0, 100.0), 1).unwrap();
        sim.seed_infected([&"a"]).unwrap();

        let transitions = sim.step();

        assert_eq!(transitions.get(&"b"), Some(SeirState::Exposed));
        assert!(logs_contain("Step complete"));
    }

    #[test]
    fn test_exposed_becomes_infected_after_incubation() {
        let mut sim =
            ContactNetworkSimulator::from_seed(&pair(), stubbed(0.0, 100.0, 2.0), 1).unwrap();
        sim.seed_infected([&"a"]).unwrap();

        // tau 0: b exposed
        assert_eq!(sim.step().get(&"b"), Some(SeirState::Exposed));
        // tau 1: one step elapsed, below 2
        assert!(sim.step().is_empty());
        // tau 2: two steps elapsed
        let transitions = sim.step();
        assert_eq!(transitions.get(&"b"), Some(SeirState::Infected));
        assert_eq!(transitions.tau(), Tau(2));
        assert_eq!(sim.record(&"b").unwrap().time_changed_state(), Tau(2));
    }

    #[test]
    fn test_steps_iterator() {
        let mut sim =
            ContactNetworkSimulator::from_seed(&pair(), stubbed(0.0, 100.0, 100.0), 1).unwrap();
        sim.seed_infected([&"a"]).unwrap();

        let taus: Vec<Tau> = sim.steps().take(5).map(|t| t.tau()).collect();

        assert_eq!(taus, vec![Tau(0), Tau(1), Tau(2), Tau(3), Tau(4)]);
        assert_eq!(sim.tau(), Tau(5));
    }

    #[test]
    fn test_sample_on_entry_fixes_deadline() {
        let mut sim = ContactNetworkSimulator::from_seed(&pair(), stubbed(0.0, 3.0, 1.0), 1)
            .unwrap()
            .with_dwell_policy(DwellPolicy::SampleOnEntry);
        sim.seed_infected([&"a"]).unwrap();

        assert_eq!(sim.record(&"a").unwrap().deadline(), Some(3.0));

        let first = sim.step();
        assert_eq!(first.get(&"b"), Some(SeirState::Exposed));
        assert_eq!(sim.record(&"b").unwrap().deadline(), Some(1.0));

        // a recovers once three steps have elapsed, at tau 3.
        let recovered_at = sim
            .steps()
            .take(10)
            .find(|t| t.get(&"a") == Some(SeirState::Recovered))
            .map(|t| t.tau());
        assert_eq!(recovered_at, Some(Tau(3)));
        assert_eq!(sim.record(&"a").unwrap().deadline(), None);
    }

    #[test]
    fn test_missing_weight_fails_construction() {
        let mut graph = pair();
        graph.add_unweighted_edge("b", "c");

        let result = ContactNetworkSimulator::from_seed(&graph, Distributions::default(), 1);

        assert!(matches!(
            result,
            Err(SimulationError::Graph(
                contagion_types::GraphError::MissingWeight { .. }
            ))
        ));
    }
}
