//! Per-node epidemic state.

use crate::Tau;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compartment of a node in the SEIR model.
///
/// Progression is `Susceptible -> Exposed -> Infected -> Recovered`.
/// Seeding may force any node straight to `Infected`; nothing leaves
/// `Recovered`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeirState {
    #[default]
    Susceptible,
    Exposed,
    Infected,
    Recovered,
}

impl SeirState {
    /// All states, in progression order.
    pub const ALL: [SeirState; 4] = [
        SeirState::Susceptible,
        SeirState::Exposed,
        SeirState::Infected,
        SeirState::Recovered,
    ];

    /// Whether a node in this state can expose its susceptible neighbors.
    pub fn is_contagious(self) -> bool {
        matches!(self, SeirState::Exposed | SeirState::Infected)
    }

    /// Whether this state has no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SeirState::Recovered)
    }

    /// The state a node moves to through the regular transition rule.
    pub fn successor(self) -> Option<SeirState> {
        match self {
            SeirState::Susceptible => Some(SeirState::Exposed),
            SeirState::Exposed => Some(SeirState::Infected),
            SeirState::Infected => Some(SeirState::Recovered),
            SeirState::Recovered => None,
        }
    }

    /// Whether `next` is reachable from `self` in one regular step.
    pub fn can_transition_to(self, next: SeirState) -> bool {
        self.successor() == Some(next)
    }
}

impl fmt::Display for SeirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeirState::Susceptible => "susceptible",
            SeirState::Exposed => "exposed",
            SeirState::Infected => "infected",
            SeirState::Recovered => "recovered",
        };
        f.write_str(name)
    }
}

/// State of a single node together with the step it entered that state.
///
/// The two fields only change together through [`NodeRecord::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    state: SeirState,
    time_changed_state: Tau,
    /// Dwell time drawn when the state was entered, if the simulator samples
    /// durations once per state rather than every step.
    deadline: Option<f64>,
}

impl NodeRecord {
    /// A susceptible node at the start of a simulation.
    pub fn susceptible() -> Self {
        Self {
            state: SeirState::Susceptible,
            time_changed_state: Tau::ZERO,
            deadline: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SeirState {
        self.state
    }

    /// Step at which the current state was entered.
    pub fn time_changed_state(&self) -> Tau {
        self.time_changed_state
    }

    /// Dwell deadline sampled on entry, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Move to `state` at time `tau`, clearing any previous deadline.
    pub fn enter(&mut self, state: SeirState, tau: Tau) {
        self.state = state;
        self.time_changed_state = tau;
        self.deadline = None;
    }

    /// Move to `state` at time `tau` with a fixed dwell deadline.
    pub fn enter_with_deadline(&mut self, state: SeirState, tau: Tau, deadline: f64) {
        self.enter(state, tau);
        self.deadline = Some(deadline);
    }

    /// Steps spent in the current state as of `now`.
    pub fn elapsed(&self, now: Tau) -> u64 {
        now.elapsed_since(self.time_changed_state)
    }
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self::susceptible()
    }
}
