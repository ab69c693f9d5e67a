//! Aggregate compartment counts over a run.

use contagion_simulation::{ContactNetworkSimulator, SimulationError, Transitions};
use contagion_types::{ContactTopology, NodeKey, SeirState};
use rand::RngCore;
use serde::Serialize;

/// Exposed, infected and recovered counts for steps `0..=N`.
///
/// Row `t` is the population after `t` steps. Susceptible counts are
/// derived from the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpidemicStats {
    /// Number of nodes in the graph.
    pub total_nodes: usize,
    /// Nodes in `Exposed`, per step.
    pub exposed: Vec<usize>,
    /// Nodes in `Infected`, per step.
    pub infected: Vec<usize>,
    /// Nodes in `Recovered`, per step.
    pub recovered: Vec<usize>,
}

impl EpidemicStats {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.infected.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// Susceptible count at row `t`.
    pub fn susceptible(&self, t: usize) -> Option<usize> {
        let occupied = self.exposed.get(t)? + self.infected.get(t)? + self.recovered.get(t)?;
        Some(self.total_nodes.saturating_sub(occupied))
    }

    /// Largest infected count and the row it first occurs at.
    pub fn peak_infected(&self) -> Option<(usize, usize)> {
        self.infected
            .iter()
            .copied()
            .enumerate()
            .fold(None, |peak, (t, count)| match peak {
                Some((_, best)) if best >= count => peak,
                _ => Some((t, count)),
            })
    }

    /// Rows as `(t, susceptible, exposed, infected, recovered)`.
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize, usize, usize, usize)> + '_ {
        (0..self.len()).map(move |t| {
            (
                t,
                self.susceptible(t).unwrap_or_default(),
                self.exposed[t],
                self.infected[t],
                self.recovered[t],
            )
        })
    }
}

/// Builds [`EpidemicStats`] one step at a time from transition maps.
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    stats: EpidemicStats,
}

impl StatisticsCollector {
    /// Start a collector with row 0 holding `initial_infected` infected nodes.
    pub fn new(total_nodes: usize, initial_infected: usize) -> Self {
        Self::from_counts(total_nodes, 0, initial_infected, 0)
    }

    /// Start a collector from a population already part-way through an
    /// outbreak.
    pub fn from_counts(
        total_nodes: usize,
        exposed: usize,
        infected: usize,
        recovered: usize,
    ) -> Self {
        Self {
            stats: EpidemicStats {
                total_nodes,
                exposed: vec![exposed],
                infected: vec![infected],
                recovered: vec![recovered],
            },
        }
    }

    /// Append the row that follows `transitions`.
    pub fn record<N: NodeKey>(&mut self, transitions: &Transitions<N>) {
        let entered_e = transitions.entered(SeirState::Exposed);
        let entered_i = transitions.entered(SeirState::Infected);
        let entered_r = transitions.entered(SeirState::Recovered);

        let stats = &mut self.stats;
        let (e, i, r) = match (
            stats.exposed.last(),
            stats.infected.last(),
            stats.recovered.last(),
        ) {
            (Some(e), Some(i), Some(r)) => (*e, *i, *r),
            _ => (0, 0, 0),
        };

        stats.exposed.push((e + entered_e).saturating_sub(entered_i));
        stats.infected.push((i + entered_i).saturating_sub(entered_r));
        stats.recovered.push(r + entered_r);
    }

    /// Rows collected so far.
    pub fn stats(&self) -> &EpidemicStats {
        &self.stats
    }

    /// Finish and return the collected rows.
    pub fn finish(self) -> EpidemicStats {
        self.stats
    }
}

/// Seed `initial_infected`, step `steps` times and return `steps + 1` rows.
///
/// Row 0 counts the distinct seeded nodes. Fails without stepping if any
/// seed is not in the graph.
pub fn collect_statistics<N: NodeKey, R: RngCore>(
    simulator: &mut ContactNetworkSimulator<N, R>,
    initial_infected: &[N],
    steps: u64,
) -> Result<EpidemicStats, SimulationError> {
    let seeded = simulator.seed_infected(initial_infected)?;
    let mut collector = StatisticsCollector::new(simulator.node_count(), seeded);

    for transitions in simulator.steps().take(steps as usize) {
        collector.record(&transitions);
    }

    Ok(collector.finish())
}

/// Histogram of node degrees: entry `k` is the number of nodes with degree `k`.
pub fn degree_distribution<N: NodeKey>(topology: &ContactTopology<N>) -> Vec<usize> {
    let mut histogram = Vec::new();
    for node in topology.nodes() {
        let degree = topology.degree(node);
        if histogram.len() <= degree {
            histogram.resize(degree + 1, 0);
        }
        histogram[degree] += 1;
    }
    histogram
}
