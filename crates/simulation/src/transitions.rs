//! Per-step record of which nodes changed state.

use contagion_types::{NodeKey, SeirState, Tau};
use indexmap::IndexMap;

/// Nodes that changed state during one step, with their new state.
///
/// Entries are in node scan order. `tau` is the clock value the step ran
/// at, which is also the `time_changed_state` stamped on every entry.
#[derive(Debug, Clone)]
pub struct Transitions<N> {
    tau: Tau,
    changes: IndexMap<N, SeirState>,
}

impl<N: NodeKey> Transitions<N> {
    pub(crate) fn new(tau: Tau) -> Self {
        Self {
            tau,
            changes: IndexMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, node: N, state: SeirState) {
        self.changes.insert(node, state);
    }

    /// Clock value at which these transitions happened.
    pub fn tau(&self) -> Tau {
        self.tau
    }

    /// New state of `node`, if it changed.
    pub fn get(&self, node: &N) -> Option<SeirState> {
        self.changes.get(node).copied()
    }

    /// Iterate over `(node, new_state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&N, SeirState)> {
        self.changes.iter().map(|(n, s)| (n, *s))
    }

    /// Number of nodes that entered `state`.
    pub fn entered(&self, state: SeirState) -> usize {
        self.changes.values().filter(|s| **s == state).count()
    }

    /// Number of nodes that changed state.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether no node changed state.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// Entries compare in order: two steps are equal only if they scanned the
// same nodes in the same order.
impl<N: NodeKey> PartialEq for Transitions<N> {
    fn eq(&self, other: &Self) -> bool {
        self.tau == other.tau && self.changes.iter().eq(other.changes.iter())
    }
}

impl<N> IntoIterator for Transitions<N> {
    type Item = (N, SeirState);
    type IntoIter = indexmap::map::IntoIter<N, SeirState>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
