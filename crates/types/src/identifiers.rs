//! Node keys and the simulation clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Opaque node identifier.
///
/// Any clonable, hashable, totally ordered value can key a node in a
/// contact graph: airport codes, integer indices, and so on. `Debug` is
/// required so that errors can name the offending node.
pub trait NodeKey: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug {}

/// Discrete simulation time step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tau(pub u64);

impl Tau {
    /// The start of every simulation.
    pub const ZERO: Self = Tau(0);

    /// Get the next time step.
    pub fn next(self) -> Self {
        Tau(self.0 + 1)
    }

    /// Number of steps elapsed since `earlier`.
    ///
    /// Saturates at zero if `earlier` is in the future, which cannot happen
    /// for a `time_changed_state` read from a live simulator.
    pub fn elapsed_since(self, earlier: Tau) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Tau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tau({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tau_next_and_elapsed() {
        let tau = Tau(10);
        assert_eq!(tau.next(), Tau(11));
        assert_eq!(tau.elapsed_since(Tau(4)), 6);
        assert_eq!(tau.elapsed_since(Tau(10)), 0);
    }

    #[test]
    fn test_tau_elapsed_saturates() {
        assert_eq!(Tau(3).elapsed_since(Tau(5)), 0);
    }

    #[test]
    fn test_tau_display() {
        assert_eq!(Tau::ZERO.to_string(), "Tau(0)");
    }
}
