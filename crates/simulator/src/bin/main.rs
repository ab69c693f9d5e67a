//! Contagion Simulator CLI
//!
//! Runs SEIR epidemics over synthetic contact graphs and prints the
//! compartment counts per step.

use clap::{Args, Parser, Subcommand};
use contagion_core::DistributionConfig;
use contagion_simulation::DwellPolicy;
use contagion_simulator::{
    degree_distribution, CancelToken, DisplayState, ErdosRenyiConfig, ErdosRenyiGenerator,
    GraphGenerator, LobsterConfig, LobsterGenerator, Simulator, SimulatorConfig,
};
use contagion_types::{ContactGraph, ContactTopology, SeirState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contagion-sim")]
#[command(about = "SEIR epidemic simulator over weighted contact networks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an epidemic and print per-step counts
    Run {
        #[command(flatten)]
        graph: GraphArgs,

        /// Number of steps to run after seeding
        #[arg(long, default_value = "100")]
        steps: u64,

        /// Initially infected nodes (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "0")]
        infected: Vec<u32>,

        /// Sample dwell durations once on state entry instead of every step
        #[arg(long)]
        sample_on_entry: bool,

        /// Recovery duration mean
        #[arg(long, default_value = "14.0")]
        recovery_mean: f64,

        /// Recovery duration standard deviation
        #[arg(long, default_value = "1.0")]
        recovery_sd: f64,

        /// Exposure threshold mean
        #[arg(long, default_value = "0.97")]
        threshold_mean: f64,

        /// Exposure threshold standard deviation
        #[arg(long, default_value = "0.1")]
        threshold_sd: f64,

        /// Incubation duration mean
        #[arg(long, default_value = "9.0")]
        incubation_mean: f64,

        /// Incubation duration standard deviation
        #[arg(long, default_value = "2.0")]
        incubation_sd: f64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Print every node's final state
        #[arg(long)]
        show_states: bool,
    },

    /// Print the degree distribution of a generated graph
    Degrees {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Graph kind (lobster, erdos-renyi)
    #[arg(long, default_value = "lobster")]
    graph: String,

    /// Seed for graph generation and simulation
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Lobster backbone length
    #[arg(long, default_value = "10")]
    backbone: usize,

    /// Lobster attachment probability (backbone and leaves)
    #[arg(long, default_value = "0.9")]
    p_attach: f64,

    /// Erdős–Rényi node count
    #[arg(long, default_value = "100")]
    nodes: u32,

    /// Erdős–Rényi edge probability
    #[arg(long, default_value = "0.05")]
    p_edge: f64,
}

impl GraphArgs {
    fn generate(&self) -> Result<ContactGraph<u32>, Box<dyn std::error::Error>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        match self.graph.to_lowercase().as_str() {
            "lobster" => {
                let config = LobsterConfig::default()
                    .with_backbone_length(self.backbone)
                    .with_probabilities(self.p_attach, self.p_attach);
                Ok(LobsterGenerator::new(config)?.generate(&mut rng))
            }
            "erdos-renyi" | "er" | "gnp" => {
                let config = ErdosRenyiConfig::new(self.nodes, self.p_edge);
                Ok(ErdosRenyiGenerator::new(config)?.generate(&mut rng))
            }
            other => Err(format!("Unknown graph kind: {}", other).into()),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Degrees { graph } => {
            let graph = graph.generate()?;
            let topology = ContactTopology::from_graph(&graph)?;
            for (degree, count) in degree_distribution(&topology).iter().enumerate() {
                println!("{}\t{}", degree, count);
            }
        }

        Commands::Run {
            graph,
            steps,
            infected,
            sample_on_entry,
            recovery_mean,
            recovery_sd,
            threshold_mean,
            threshold_sd,
            incubation_mean,
            incubation_sd,
            json,
            show_states,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();

            let seed = graph.seed;
            let graph = graph.generate()?;

            let dwell_policy = if sample_on_entry {
                DwellPolicy::SampleOnEntry
            } else {
                DwellPolicy::ResampleEachStep
            };
            let config = SimulatorConfig::new(steps)
                .with_seed(seed)
                .with_dwell_policy(dwell_policy)
                .with_distributions(
                    DistributionConfig::default()
                        .with_recovery(recovery_mean, recovery_sd)
                        .with_exposure_threshold(threshold_mean, threshold_sd)
                        .with_incubation(incubation_mean, incubation_sd),
                );

            let simulator = Simulator::new(config)?;

            let (report, display) = if show_states {
                let mut prepared = simulator.prepare(&graph, &infected)?;
                let mut display = DisplayState::from_simulator(&prepared);
                let report = simulator.run_prepared(
                    &mut prepared,
                    &CancelToken::new(),
                    &mut |transitions| display.apply(transitions),
                );
                (report, Some(display))
            } else {
                (simulator.run(&graph, &infected)?, None)
            };

            if json {
                println!("{}", report.to_json()?);
            } else {
                report.print();
            }

            if let Some(display) = display {
                println!();
                for (node, state) in display.iter() {
                    println!("{}\t{}", node, state);
                }
                for state in SeirState::ALL {
                    println!("# {}: {}", state, display.count(state));
                }
            }
        }
    }

    Ok(())
}
