//! Consumer-side cache of node states for visualization.

use contagion_simulation::{ContactNetworkSimulator, Transitions};
use contagion_types::{NodeKey, SeirState, Tau};
use indexmap::IndexMap;
use rand::RngCore;

/// Node states as seen by a renderer, rebuilt from transition maps.
///
/// Holds no reference to the simulator: after the initial snapshot it only
/// ever sees what each step reports.
#[derive(Debug, Clone)]
pub struct DisplayState<N> {
    states: IndexMap<N, SeirState>,
    counts: [usize; 4],
    tau: Tau,
}

impl<N: NodeKey> DisplayState<N> {
    /// Snapshot the simulator's current node states.
    pub fn from_simulator<R: RngCore>(simulator: &ContactNetworkSimulator<N, R>) -> Self {
        let mut counts = [0; 4];
        let states: IndexMap<N, SeirState> = simulator
            .records()
            .map(|(node, record)| {
                counts[slot(record.state())] += 1;
                (node.clone(), record.state())
            })
            .collect();

        Self {
            states,
            counts,
            tau: simulator.tau(),
        }
    }

    /// Apply one step's transitions.
    ///
    /// Nodes this cache has never seen are ignored.
    pub fn apply(&mut self, transitions: &Transitions<N>) {
        for (node, next) in transitions.iter() {
            if let Some(state) = self.states.get_mut(node) {
                self.counts[slot(*state)] -= 1;
                self.counts[slot(next)] += 1;
                *state = next;
            }
        }
        self.tau = transitions.tau().next();
    }

    /// Cached state of `node`.
    pub fn state(&self, node: &N) -> Option<SeirState> {
        self.states.get(node).copied()
    }

    /// Number of nodes in `state`.
    pub fn count(&self, state: SeirState) -> usize {
        self.counts[slot(state)]
    }

    /// Clock value after the last applied step.
    pub fn tau(&self) -> Tau {
        self.tau
    }

    /// Every node with its cached state.
    pub fn iter(&self) -> impl Iterator<Item = (&N, SeirState)> {
        self.states.iter().map(|(n, s)| (n, *s))
    }
}

fn slot(state: SeirState) -> usize {
    match state {
        SeirState::Susceptible => 0,
        SeirState::Exposed => 1,
        SeirState::Infected => 2,
        SeirState::Recovered => 3,
    }
}
