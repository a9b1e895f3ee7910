use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use u_evrp::evaluation::{FinalChargePolicy, RouteValidator, ValidationConfig, ValidationReport};
use u_evrp::parsers::{parse_instance, parse_solution};

/// Check an EVRP-TW-SPD route against its instance.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Instance file
    instance: PathBuf,

    /// Solution file
    solution: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log every simulated segment
    #[arg(short, long)]
    debug: bool,

    /// Comparison tolerance (overrides the config file)
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Treat a final depot charge mismatch as a violation
    #[arg(long)]
    strict_final_charge: bool,

    /// Validation settings as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode, anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    let instance_text = read(&cli.instance)?;
    let instance = parse_instance(&instance_text)
        .with_context(|| format!("invalid instance {}", cli.instance.display()))?;
    let solution_text = read(&cli.solution)?;
    let solution = parse_solution(&solution_text)
        .with_context(|| format!("invalid solution {}", cli.solution.display()))?;

    info!(
        instance = instance.name().unwrap_or("unnamed"),
        visits = solution.route().len(),
        epsilon = config.epsilon,
        "validating"
    );

    let report = RouteValidator::with_config(&instance, config).validate(&solution);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.is_feasible() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read(path: &Path) -> Result<String, anyhow::Error> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(cli: &Cli) -> Result<ValidationConfig, anyhow::Error> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => ValidationConfig::default(),
    };
    if let Some(epsilon) = cli.epsilon {
        config = config.with_epsilon(epsilon);
    }
    if cli.strict_final_charge {
        config = config.with_final_charge(FinalChargePolicy::Enforced);
    }
    Ok(config)
}

fn print_report(report: &ValidationReport) {
    for note in report.notes() {
        println!("Note: {note}");
    }
    if let (Some(travel), Some(total)) = (report.travel_cost(), report.total_cost()) {
        println!("Travel cost: {travel:.2}, total cost: {total:.2}");
    }
    if report.is_feasible() {
        println!("Solution appears FEASIBLE.");
        return;
    }
    println!("Solution is INFEASIBLE:");
    for violation in report.violations() {
        println!("  {violation}");
    }
}
