//! Contagion Simulator
//!
//! Driver for epidemic runs built on top of the simulation engine.
//! Generates contact graphs, seeds an outbreak, steps it, and reports
//! compartment counts over time.
//!
//! # Architecture
//!
//! The simulator builds on `contagion-simulation` to provide:
//!
//! - **Graph Generation**: Random lobster and Erdős–Rényi graphs with uniform edge weights
//! - **Statistics**: Exposed/infected/recovered counts per step, degree distributions
//! - **Display State**: Node-state cache fed only by per-step transitions
//! - **Runner**: Seeded, cancellable runs producing a table or JSON report
//!
//! # Example
//!
//! ```ignore
//! use contagion_simulator::{LobsterConfig, LobsterGenerator, GraphGenerator, Simulator, SimulatorConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let graph = LobsterGenerator::new(LobsterConfig::default())?
//!     .generate(&mut ChaCha8Rng::seed_from_u64(1));
//!
//! let simulator = Simulator::new(SimulatorConfig::new(100).with_seed(12345))?;
//! let report = simulator.run(&graph, &[0])?;
//!
//! report.print();
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod generators;
pub mod runner;
pub mod statistics;

pub use config::{ErdosRenyiConfig, LobsterConfig, SimulatorConfig};
pub use display::DisplayState;
pub use error::SimulatorError;
pub use generators::{ErdosRenyiGenerator, GraphGenerator, LobsterGenerator};
pub use runner::{CancelToken, SimulationReport, Simulator};
pub use statistics::{collect_statistics, degree_distribution, EpidemicStats, StatisticsCollector};
