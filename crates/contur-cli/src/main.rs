//! Contur full-likelihood CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use contur_core::Expectation;
use contur_likelihood::{ConturLikelihood, DEFAULT_POI_UPPER_BOUND, METADATA, ModelInput};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contur")]
#[command(about = "Contur full likelihood - evaluate, sample and inspect binned models")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the minimizer configuration (POI bounds, initial values)
    Config {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Clamp the POI lower bound at zero instead of the derived minimum.
        #[arg(long)]
        non_negative_signal: bool,

        /// Upper bound on the POI.
        #[arg(long, default_value_t = DEFAULT_POI_UPPER_BOUND)]
        poi_upper_bound: f64,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate log L at a parameter point
    Logpdf {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated parameter vector (3N+1 values). Defaults to the initial values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pars: Vec<f64>,

        /// Dataset selection: observed, aposteriori or apriori.
        #[arg(long, default_value = "observed")]
        expected: Expectation,

        /// Comma-separated dataset overriding the stored observation.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        data: Vec<f64>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate -log L and its gradient at a parameter point
    Objective {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated parameter vector (3N+1 values). Defaults to the initial values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pars: Vec<f64>,

        /// Dataset selection: observed, aposteriori or apriori.
        #[arg(long, default_value = "observed")]
        expected: Expectation,

        /// Comma-separated dataset overriding the stored observation.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        data: Vec<f64>,

        /// Skip the gradient.
        #[arg(long)]
        no_grad: bool,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expected (Asimov) data at a parameter point
    Expected {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated parameter vector (3N+1 values). Defaults to the initial values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pars: Vec<f64>,

        /// Main bins only, without the auxiliary prior means.
        #[arg(long)]
        no_auxiliary: bool,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draw pseudo-experiments at a parameter point
    Sample {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated parameter vector (3N+1 values). Defaults to the initial values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pars: Vec<f64>,

        /// Number of rows to draw.
        #[arg(long, default_value = "1")]
        size: usize,

        /// RNG seed.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Main bins only, without auxiliary draws.
        #[arg(long)]
        no_auxiliary: bool,

        /// Draw rows in parallel (row i seeded with seed + i).
        #[arg(long)]
        parallel: bool,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate the non-negative background constraint and its Jacobian
    Constraint {
        /// Input model (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated parameter vector (3N+1 values). Defaults to the initial values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pars: Vec<f64>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config { input, non_negative_signal, poi_upper_bound, output } => {
            cmd_config(&input, !non_negative_signal, poi_upper_bound, output.as_ref())
        }
        Commands::Logpdf { input, pars, expected, data, output } => {
            cmd_logpdf(&input, pars, expected, data, output.as_ref())
        }
        Commands::Objective { input, pars, expected, data, no_grad, output } => {
            cmd_objective(&input, pars, expected, data, !no_grad, output.as_ref())
        }
        Commands::Expected { input, pars, no_auxiliary, output } => {
            cmd_expected(&input, pars, !no_auxiliary, output.as_ref())
        }
        Commands::Sample { input, pars, size, seed, no_auxiliary, parallel, output } => {
            cmd_sample(&input, pars, size, seed, !no_auxiliary, parallel, output.as_ref())
        }
        Commands::Constraint { input, pars, output } => {
            cmd_constraint(&input, pars, output.as_ref())
        }
        Commands::Version => {
            println!("contur {} ({} {})", contur_core::VERSION, METADATA.name, METADATA.version);
            Ok(())
        }
    }
}

fn cmd_config(
    input: &PathBuf,
    allow_negative_signal: bool,
    poi_upper_bound: f64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let model = load_model(input)?;
    let config = model.config(allow_negative_signal, poi_upper_bound)?;

    let output_json = serde_json::json!({
        "metadata": METADATA,
        "nbins": model.nbins(),
        "is_alive": model.is_alive(),
        "parameter_names": model.parameter_names(),
        "config": config,
    });

    write_json(output, output_json)
}

fn cmd_logpdf(
    input: &PathBuf,
    pars: Vec<f64>,
    expected: Expectation,
    data: Vec<f64>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let model = load_model(input)?;
    let pars = resolve_pars(&model, pars);
    let data = (!data.is_empty()).then_some(data.as_slice());

    let logpdf = model.get_logpdf_func(expected, data)?;
    let value = logpdf.eval(&pars)?;
    tracing::info!(logpdf = value, "log-likelihood evaluated");

    let output_json = serde_json::json!({
        "expected": expected,
        "parameters": pars,
        "data": logpdf.data(),
        "logpdf": value,
    });

    write_json(output, output_json)
}

fn cmd_objective(
    input: &PathBuf,
    pars: Vec<f64>,
    expected: Expectation,
    data: Vec<f64>,
    do_grad: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let model = load_model(input)?;
    let pars = resolve_pars(&model, pars);
    let data = (!data.is_empty()).then_some(data.as_slice());

    let objective = model.get_objective_function(expected, data, do_grad)?;
    let result = objective.eval(&pars)?;
    tracing::info!(nll = result.value, "objective evaluated");

    let output_json = serde_json::json!({
        "expected": expected,
        "parameter_names": model.parameter_names(),
        "parameters": pars,
        "nll": result.value,
        "twice_nll": 2.0 * result.value,
        "gradient": result.gradient,
    });

    write_json(output, output_json)
}

fn cmd_expected(
    input: &PathBuf,
    pars: Vec<f64>,
    include_auxiliary: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let model = load_model(input)?;
    let pars = resolve_pars(&model, pars);
    let expected = model.expected_data(&pars, include_auxiliary)?;

    let output_json = serde_json::json!({
        "parameters": pars,
        "include_auxiliary": include_auxiliary,
        "expected_data": expected,
    });

    write_json(output, output_json)
}

fn cmd_sample(
    input: &PathBuf,
    pars: Vec<f64>,
    size: usize,
    seed: u64,
    include_auxiliary: bool,
    parallel: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let model = load_model(input)?;
    let pars = resolve_pars(&model, pars);
    let sampler = model.get_sampler(&pars)?;

    let samples = if parallel {
        sampler.sample_parallel(size, include_auxiliary, seed)?
    } else {
        sampler.sample_seeded(size, include_auxiliary, seed)?
    };
    tracing::info!(rows = samples.len(), seed, parallel, "sampling complete");

    let output_json = serde_json::json!({
        "parameters": pars,
        "seed": seed,
        "include_auxiliary": include_auxiliary,
        "samples": samples,
    });

    write_json(output, output_json)
}

fn cmd_constraint(input: &PathBuf, pars: Vec<f64>, output: Option<&PathBuf>) -> Result<()> {
    let model = load_model(input)?;
    let pars = resolve_pars(&model, pars);

    let constraints: Vec<serde_json::Value> = model
        .constraints()
        .iter()
        .map(|c| -> Result<serde_json::Value> {
            Ok(serde_json::json!({
                "type": "ineq",
                "lower_bound": c.lower_bound,
                "upper_bound": c.upper_bound,
                "fun": c.fun(&pars)?,
                "jac": c.jac(&pars)?,
                "satisfied": c.is_satisfied(&pars)?,
            }))
        })
        .collect::<Result<_>>()?;

    let output_json = serde_json::json!({
        "parameters": pars,
        "constraints": constraints,
    });

    write_json(output, output_json)
}

fn load_model(input: &PathBuf) -> Result<ConturLikelihood> {
    tracing::info!(path = %input.display(), "loading model");
    let model = ModelInput::from_path(input)?.into_model()?;
    tracing::info!(nbins = model.nbins(), parameters = model.n_params(), "model loaded");
    Ok(model)
}

/// An empty `--pars` selects the initial point (1.0 everywhere).
fn resolve_pars(model: &ConturLikelihood, pars: Vec<f64>) -> Vec<f64> {
    if pars.is_empty() { vec![1.0; model.n_params()] } else { pars }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
