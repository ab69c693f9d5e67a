//! Core types for contact-network epidemic simulation.
//!
//! - [`NodeKey`] and [`Tau`]: node identity and the simulation clock
//! - [`SeirState`] and [`NodeRecord`]: per-node epidemic state
//! - [`ContactGraph`] and [`ContactTopology`]: the weighted contact graph,
//!   before and after validation

mod identifiers;
mod state;
mod topology;

pub use identifiers::{NodeKey, Tau};
pub use state::{NodeRecord, SeirState};
pub use topology::{ContactGraph, ContactTopology, Edge, GraphError};
