//! Simulation runner.

use crate::statistics::{EpidemicStats, StatisticsCollector};
use crate::{SimulatorConfig, SimulatorError};
use contagion_simulation::{ContactNetworkSimulator, Transitions};
use contagion_types::{ContactGraph, NodeKey, SeirState};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Cloneable flag for stopping a run between steps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives one simulation per call from a [`SimulatorConfig`].
///
/// Each run builds a fresh [`ContactNetworkSimulator`] seeded from the
/// config, so repeated runs with the same inputs are identical.
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a runner, validating the configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Seed `initial_infected` and run for the configured number of steps.
    pub fn run<N: NodeKey>(
        &self,
        graph: &ContactGraph<N>,
        initial_infected: &[N],
    ) -> Result<SimulationReport, SimulatorError> {
        self.run_observed(graph, initial_infected, &CancelToken::new(), &mut |_| {})
    }

    /// Like [`run`](Self::run), stopping early once `cancel` is set.
    pub fn run_with_cancel<N: NodeKey>(
        &self,
        graph: &ContactGraph<N>,
        initial_infected: &[N],
        cancel: &CancelToken,
    ) -> Result<SimulationReport, SimulatorError> {
        self.run_observed(graph, initial_infected, cancel, &mut |_| {})
    }

    /// Run and hand every step's transitions to `observer`.
    ///
    /// `cancel` is checked before each step. A cancelled run returns the
    /// rows collected so far.
    pub fn run_observed<N: NodeKey>(
        &self,
        graph: &ContactGraph<N>,
        initial_infected: &[N],
        cancel: &CancelToken,
        observer: &mut dyn FnMut(&Transitions<N>),
    ) -> Result<SimulationReport, SimulatorError> {
        let mut simulator = self.prepare(graph, initial_infected)?;
        Ok(self.run_prepared(&mut simulator, cancel, observer))
    }

    /// Build a simulator for `graph` from the config and seed
    /// `initial_infected`, without stepping.
    pub fn prepare<N: NodeKey>(
        &self,
        graph: &ContactGraph<N>,
        initial_infected: &[N],
    ) -> Result<ContactNetworkSimulator<N>, SimulatorError> {
        let distributions = self.config.distributions.build()?;
        let mut simulator =
            ContactNetworkSimulator::from_seed(graph, distributions, self.config.seed)?
                .with_dwell_policy(self.config.dwell_policy);
        simulator.seed_infected(initial_infected)?;
        Ok(simulator)
    }

    /// Step a simulator for the configured number of steps.
    ///
    /// Usually given the result of [`prepare`](Self::prepare), but any
    /// simulator works: row 0 of the statistics holds its current exposed,
    /// infected and recovered counts.
    pub fn run_prepared<N: NodeKey>(
        &self,
        simulator: &mut ContactNetworkSimulator<N>,
        cancel: &CancelToken,
        observer: &mut dyn FnMut(&Transitions<N>),
    ) -> SimulationReport {
        let exposed = simulator.count(SeirState::Exposed);
        let infected = simulator.count(SeirState::Infected);
        let recovered = simulator.count(SeirState::Recovered);

        info!(
            nodes = simulator.node_count(),
            edges = simulator.topology().edge_count(),
            tau = simulator.tau().get(),
            exposed,
            infected,
            recovered,
            steps = self.config.steps,
            seed = self.config.seed,
            "Starting simulation"
        );

        let mut collector =
            StatisticsCollector::from_counts(simulator.node_count(), exposed, infected, recovered);
        let mut steps_run = 0;
        let mut cancelled = false;

        while steps_run < self.config.steps {
            if cancel.is_cancelled() {
                warn!(steps_run, "Simulation cancelled");
                cancelled = true;
                break;
            }

            let transitions = simulator.step();
            collector.record(&transitions);
            observer(&transitions);
            steps_run += 1;
        }

        let stats = collector.finish();
        let peak = stats.peak_infected().unwrap_or_default();
        info!(
            steps_run,
            peak_infected = peak.1,
            peak_step = peak.0,
            "Simulation complete"
        );

        SimulationReport {
            seed: self.config.seed,
            steps_run,
            cancelled,
            stats,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Seed the run used.
    pub seed: u64,
    /// Steps actually taken.
    pub steps_run: u64,
    /// Whether the run stopped before the configured step count.
    pub cancelled: bool,
    /// Compartment counts per step.
    pub stats: EpidemicStats,
}

impl SimulationReport {
    /// Print the report as a table to stdout.
    pub fn print(&self) {
        println!("\n=== Simulation Report ===");
        println!("Seed: {}", self.seed);
        println!("Nodes: {}", self.stats.total_nodes);
        println!(
            "Steps: {}{}",
            self.steps_run,
            if self.cancelled { " (cancelled)" } else { "" }
        );
        if let Some((step, count)) = self.stats.peak_infected() {
            println!("Peak infected: {} at step {}", count, step);
        }

        println!();
        println!("{:>6} {:>8} {:>8} {:>8} {:>8}", "step", "S", "E", "I", "R");
        for (t, s, e, i, r) in self.stats.rows() {
            println!("{:>6} {:>8} {:>8} {:>8} {:>8}", t, s, e, i, r);
        }
    }

    /// Report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::DistributionConfig;
    use contagion_simulation::DwellPolicy;
    use tracing_test::traced_test;

    fn ring(n: u32) -> ContactGraph<u32> {
        ContactGraph::from_edges((0..n).map(|i| (i, (i + 1) % n, 0.8)))
    }

    fn fast() -> SimulatorConfig {
        SimulatorConfig::new(40).with_seed(7).with_distributions(
            DistributionConfig::default()
                .with_exposure_threshold(0.3, 0.1)
                .with_recovery(4.0, 1.0)
                .with_incubation(2.0, 0.5),
        )
    }

    #[traced_test]
    #[test]
    fn test_run_produces_all_rows() {
        let simulator = Simulator::new(fast()).unwrap();

        let report = simulator.run(&ring(20), &[0]).unwrap();

        assert_eq!(report.steps_run, 40);
        assert!(!report.cancelled);
        assert_eq!(report.stats.len(), 41);
        assert_eq!(report.stats.infected[0], 1);
        assert!(logs_contain("Starting simulation"));
        assert!(logs_contain("Simulation complete"));
    }

    #[test]
    fn test_runs_are_repeatable() {
        let simulator = Simulator::new(fast()).unwrap();

        let a = simulator.run(&ring(30), &[0, 15]).unwrap();
        let b = simulator.run(&ring(30), &[0, 15]).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_steps_gives_single_row() {
        let mut config = fast();
        config.steps = 0;
        let simulator = Simulator::new(config).unwrap();

        let report = simulator.run(&ring(5), &[]).unwrap();

        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.stats.susceptible(0), Some(5));
    }

    #[traced_test]
    #[test]
    fn test_cancel_stops_between_steps() {
        let simulator = Simulator::new(fast()).unwrap();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let mut seen = 0;

        let report = simulator
            .run_observed(&ring(20), &[0], &cancel, &mut |_| {
                seen += 1;
                if seen == 5 {
                    trigger.cancel();
                }
            })
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.steps_run, 5);
        assert_eq!(report.stats.len(), 6);
        assert!(logs_contain("Simulation cancelled"));
    }

    #[test]
    fn test_observer_sees_every_step() {
        let simulator =
            Simulator::new(fast().with_dwell_policy(DwellPolicy::SampleOnEntry)).unwrap();
        let mut taus = Vec::new();

        simulator
            .run_observed(&ring(10), &[3], &CancelToken::new(), &mut |t| {
                taus.push(t.tau().get())
            })
            .unwrap();

        assert_eq!(taus, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_prepared_run_matches_plain_run() {
        let simulator = Simulator::new(fast()).unwrap();
        let graph = ring(12);

        let mut prepared = simulator.prepare(&graph, &[2, 2, 8]).unwrap();
        assert_eq!(prepared.tau().get(), 0);
        assert_eq!(prepared.count(SeirState::Infected), 2);

        let report = simulator.run_prepared(&mut prepared, &CancelToken::new(), &mut |_| {});

        assert_eq!(report, simulator.run(&graph, &[2, 8]).unwrap());
        assert_eq!(prepared.tau().get(), 40);
    }

    #[test]
    fn test_run_prepared_starts_from_current_counts() {
        let simulator = Simulator::new(fast()).unwrap();
        let mut sim = simulator.prepare(&ring(20), &[0]).unwrap();
        for _ in 0..6 {
            sim.step();
        }
        let exposed = sim.count(SeirState::Exposed);
        let recovered = sim.count(SeirState::Recovered);
        assert!(exposed + recovered > 0);

        let report = simulator.run_prepared(&mut sim, &CancelToken::new(), &mut |_| {});

        let stats = &report.stats;
        assert_eq!(stats.exposed[0], exposed);
        assert_eq!(stats.recovered[0], recovered);
        let last = stats.len() - 1;
        assert_eq!(stats.exposed[last], sim.count(SeirState::Exposed));
        assert_eq!(stats.infected[last], sim.count(SeirState::Infected));
        assert_eq!(stats.recovered[last], sim.count(SeirState::Recovered));
        assert!(stats.rows().all(|(_, s, e, i, r)| s + e + i + r == stats.total_nodes));
    }

    #[test]
    fn test_unknown_seed_is_an_error() {
        let simulator = Simulator::new(fast()).unwrap();

        let result = simulator.run(&ring(4), &[9]);

        assert!(matches!(result, Err(SimulatorError::Simulation(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulatorConfig::new(10)
            .with_distributions(DistributionConfig::default().with_incubation(f64::NAN, 1.0));

        assert!(matches!(
            Simulator::new(config),
            Err(SimulatorError::Distribution(_))
        ));
    }

    #[test]
    fn test_report_json() {
        let simulator = Simulator::new(SimulatorConfig::new(2).with_seed(3)).unwrap();
        let report = simulator.run(&ring(3), &[0]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["seed"], 3);
        assert_eq!(value["steps_run"], 2);
        assert_eq!(value["cancelled"], false);
        assert_eq!(value["stats"]["infected"].as_array().unwrap().len(), 3);
    }
}
