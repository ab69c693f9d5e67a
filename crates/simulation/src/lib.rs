//! Step-synchronous SEIR simulation over a weighted contact graph.
//!
//! Given a graph whose edge weights are per-step transmission
//! probabilities, the simulator advances every node through
//! `Susceptible -> Exposed -> Infected -> Recovered` one discrete step at a
//! time. Given the same graph, samplers and seed, it produces identical
//! results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                ContactNetworkSimulator                  │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  records: IndexMap<N, NodeRecord>  (pre-step view) │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ scan every node             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  transition rule                                   │ │
//! │  │  I: elapsed >= recovery sample      -> R           │ │
//! │  │  E: elapsed >= incubation sample    -> I           │ │
//! │  │  S: union(1-(1-r)^dt) >= threshold  -> E           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ pending Transitions         │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  apply all, stamp with tau, then tau += 1          │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod error;
mod network;
mod transitions;

pub use error::SimulationError;
pub use network::{ContactNetworkSimulator, DwellPolicy, Steps};
pub use transitions::Transitions;
