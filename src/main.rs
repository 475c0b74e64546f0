use clap::{Parser, ValueEnum};
use ndarray::Array1;
use pomdp_solver::config::{Algorithm, SolverConfig};
use pomdp_solver::envs::tiger::{tiger, Tiger};
use pomdp_solver::mdps::Mdp;
use pomdp_solver::pomdps::{io::write_value_function, Policy, ValueFunction};
use pomdp_solver::{IncrementalPruning, Pbvi};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pomdp-solver", version, about = "Solve benchmark POMDPs")]
struct Cli {
    /// TOML solver configuration; defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Problem::Tiger)]
    problem: Problem,

    /// Overrides the configured horizon
    #[arg(long)]
    horizon: Option<usize>,

    /// Writes the computed value function as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Problem {
    Tiger,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> pomdp_solver::Result<()> {
    let mut config = match &cli.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(horizon) = cli.horizon {
        config.horizon = horizon;
    }

    let model = match cli.problem {
        Problem::Tiger => tiger(config.seed)?,
    };
    let (converged, vf) = solve(&config, &model)?;

    let policy = Policy::new(vf);
    let n_s = model.n_s();
    let uniform = Array1::from_elem(n_s, 1. / n_s as f64);
    if let Some((action, _, value)) = policy.best_action(&uniform) {
        println!(
            "horizons: {}, converged: {}, vectors: {}",
            policy.horizon(),
            converged,
            policy.value_function()[policy.horizon()].len()
        );
        println!("uniform belief: action {action}, value {value:.6}");
    }

    if let Some(path) = &cli.output {
        write_value_function(BufWriter::new(File::create(path)?), policy.value_function())?;
    }

    Ok(())
}

fn solve(
    config: &SolverConfig,
    model: &Tiger,
) -> pomdp_solver::Result<(bool, ValueFunction)> {
    Ok(match config.algorithm {
        Algorithm::IncrementalPruning => IncrementalPruning::from_config(config)?.solve(model),
        Algorithm::Pbvi => Pbvi::from_config(config)?.solve(model),
    })
}
