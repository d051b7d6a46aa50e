//! The command line runner: parses arguments, loads parameters, runs the simulation, and writes
//! the round-by-round census and the epidemic summary as CSV reports.

use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};
use serde::{Deserialize, Serialize};

use crate::define_report;
use crate::error::EpinetError;
use crate::log::{set_log_level, LevelFilter};
use crate::network::StatusCensus;
use crate::parameters::ParametersValues;
use crate::report::ReportSink;
use crate::simulation::Simulation;

/// Default cli arguments for the epinet runner
#[derive(Args, Debug)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Path to the simulation parameters JSON file
    #[arg(short, long)]
    pub config: String,

    /// Optional directory for report output
    #[arg(short, long, default_value = "")]
    pub output_dir: String,

    /// Enable logging at the given level
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

/// Per-round counts of people in each health status.
#[derive(Serialize, Deserialize, Debug)]
pub struct RoundCensusReport {
    pub round: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub vaccinated: usize,
    pub recovered: usize,
    pub dead: usize,
}

define_report!(RoundCensusReport);

/// Final epidemic statistics: the pathogen profile, the vaccination rate used, the terminal
/// census, and the residual-network structure. Frailty and interference are empty when
/// undefined (no edges, or no susceptible people remain).
#[derive(Serialize, Deserialize, Debug)]
pub struct EpidemicSummaryReport {
    pub pathogen: String,
    pub ro: f64,
    pub lethality: f64,
    pub vaccination_rate: f64,
    pub population: usize,
    pub susceptible: usize,
    pub vaccinated: usize,
    pub recovered: usize,
    pub dead: usize,
    pub frailty: Option<f64>,
    pub interference: Option<f64>,
}

define_report!(EpidemicSummaryReport);

fn create_cli() -> Command {
    let cli = Command::new("epinet");
    BaseArgs::augment_args(cli)
}

/// Parses command line arguments, runs a complete simulation, and writes reports if an output
/// directory was given. Returns the finished simulation for further inspection.
///
/// # Errors
///
/// Returns an error if argument parsing, parameter loading, the run itself, or report writing
/// fails.
pub fn run_with_args() -> Result<Simulation, Box<dyn std::error::Error>> {
    let cli = create_cli();
    let matches = cli.get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    let simulation = run_with_args_internal(args)?;
    Ok(simulation)
}

fn run_with_args_internal(args: BaseArgs) -> Result<Simulation, EpinetError> {
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    let parameters = ParametersValues::from_json_file(&args.config)?;
    let mut simulation = Simulation::new(&parameters, args.random_seed)?;
    simulation.run()?;

    if !args.output_dir.is_empty() {
        write_reports(&simulation, &args.output_dir)?;
    }

    Ok(simulation)
}

/// Writes `round_census.csv` (one row per round, including the initial round 0 state) and
/// `epidemic_summary.csv` (a single summary row) into `output_dir`.
///
/// # Errors
///
/// Returns an `EpinetError` if a report file cannot be created.
pub fn write_reports(simulation: &Simulation, output_dir: &str) -> Result<(), EpinetError> {
    let dir = PathBuf::from(output_dir);
    let mut sink = ReportSink::new();
    sink.add_report::<RoundCensusReport>(&dir.join("round_census.csv").to_string_lossy())?;
    sink.add_report::<EpidemicSummaryReport>(&dir.join("epidemic_summary.csv").to_string_lossy())?;

    for snapshot in simulation.snapshots() {
        let census = StatusCensus::from_statuses(&snapshot.statuses);
        sink.send_report(RoundCensusReport {
            round: snapshot.round,
            susceptible: census.susceptible,
            infected: census.infected,
            vaccinated: census.vaccinated,
            recovered: census.recovered,
            dead: census.dead,
        });
    }

    let census = simulation.census();
    let network = simulation.network();
    let pathogen = simulation.pathogen();
    sink.send_report(EpidemicSummaryReport {
        pathogen: pathogen.name.clone(),
        ro: pathogen.ro,
        lethality: pathogen.lethality,
        vaccination_rate: simulation.vaccination_rate(),
        population: network.population(),
        susceptible: census.susceptible,
        vaccinated: census.vaccinated,
        recovered: census.recovered,
        dead: census.dead,
        frailty: network.frailty(),
        interference: network.interference(),
    });

    Ok(())
}
