use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trip_feasibility::config::ConfigOverrides;
use trip_feasibility::output::csv::{breakdown_to_csv, plans_to_csv};
use trip_feasibility::output::json::render_json;
use trip_feasibility::output::table::{
    render_breakdown_table, render_changes_table, render_issues_table, render_plans_table,
    render_profiles_table, render_result_table,
};
use trip_feasibility::trip::loader::{load_trip, TripOverrides};
use trip_feasibility::{
    Config, FeasibilityScorer, OptimizationGenerator, OptimizedTrip, ProfileRegistry, StrategyId,
    TravelMode, TripData, TripPossibilityResult,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "trip-feasibility",
    about = "Score trip plans for realism and suggest better variants"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Extra profile table merged over the built-in baselines.
    #[arg(short = 'p', long)]
    profiles: Option<String>,
    #[command(flatten)]
    trip: TripArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct TripArgs {
    /// JSON trip file; the flags below override its fields.
    #[arg(short, long, global = true)]
    trip: Option<PathBuf>,
    #[arg(long, global = true)]
    destination: Option<String>,
    #[arg(long, global = true)]
    category: Option<String>,
    #[arg(long, global = true)]
    start: Option<NaiveDate>,
    #[arg(long, global = true)]
    end: Option<NaiveDate>,
    #[arg(long, global = true)]
    budget: Option<f64>,
    #[arg(long, global = true)]
    currency: Option<String>,
    #[arg(long, global = true)]
    activities: Option<u32>,
    /// Comma-separated activities per day, e.g. 3,4,2.
    #[arg(long = "daily-loads", global = true, value_delimiter = ',')]
    daily_loads: Option<Vec<u32>>,
    #[arg(long, global = true)]
    areas: Option<u32>,
    #[arg(long = "travel-mode", global = true)]
    travel_mode: Option<TravelMode>,
}

impl From<TripArgs> for TripOverrides {
    fn from(value: TripArgs) -> Self {
        Self {
            destination: value.destination,
            category: value.category,
            start_date: value.start,
            end_date: value.end,
            budget: value.budget,
            currency: value.currency,
            planned_activities: value.activities,
            daily_loads: value.daily_loads,
            area_count: value.areas,
            travel_mode: value.travel_mode,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Score,
    Optimize,
    Apply {
        #[arg(long)]
        plan: StrategyId,
    },
    Profiles,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        profiles_path: cli.profiles.clone(),
        strategies: None,
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }

    let mut registry = ProfileRegistry::with_defaults()?;
    if let Some(path) = config.resolved_profiles_path() {
        registry.load_extra(&path)?;
        info!(path = %path.display(), "merged extra destination profiles");
    }

    if matches!(cli.command, Commands::Profiles) {
        return print_profiles(&registry, cli.output);
    }

    let overrides: TripOverrides = cli.trip.clone().into();
    let trip = load_trip(cli.trip.trip.as_deref(), &overrides)?;
    let scorer = FeasibilityScorer::new(&registry, &config.scoring);
    let result = scorer.score(&trip)?;
    info!(
        destination = %trip.destination,
        percentage = result.percentage,
        status = %result.status_label,
        "scored trip"
    );

    match &cli.command {
        Commands::Score => print_result(&result, cli.output)?,
        Commands::Optimize => {
            let generator = OptimizationGenerator::from_config(scorer, &config.optimizer)?;
            let plans = generator.generate(&trip, &result)?;
            print_plans(&result, &plans, cli.output)?;
        }
        Commands::Apply { plan } => {
            let generator = OptimizationGenerator::from_config(scorer, &config.optimizer)?;
            let plans = generator.generate(&trip, &result)?;
            let chosen = plans
                .iter()
                .find(|p| p.id == *plan)
                .ok_or_else(|| anyhow!("strategy {plan} produced no improving plan for this trip"))?;
            print_applied(chosen, cli.output)?;
        }
        Commands::Profiles | Commands::Config { .. } => {}
    }
    Ok(())
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &std::path::Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_result(result: &TripPossibilityResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_result_table(result));
            println!("{}", render_breakdown_table(result));
            if !result.issues.is_empty() {
                println!("{}", render_issues_table(result));
            }
        }
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", breakdown_to_csv(result)?),
    }
    Ok(())
}

fn print_plans(
    result: &TripPossibilityResult,
    plans: &[OptimizedTrip],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_result_table(result));
            if plans.is_empty() {
                println!("No plan improves on this trip.");
            } else {
                println!("{}", render_plans_table(plans));
            }
        }
        OutputFormat::Json => println!("{}", render_json(plans)?),
        OutputFormat::Csv => println!("{}", plans_to_csv(plans)?),
    }
    Ok(())
}

fn print_applied(plan: &OptimizedTrip, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{} {}: {}", plan.icon, plan.name, plan.description);
            println!("{}", render_changes_table(plan));
            println!("{}", render_result_table(&plan.possibility));
            println!("{}", render_trip_json(&plan.trip)?);
        }
        OutputFormat::Json => println!("{}", render_trip_json(&plan.trip)?),
        OutputFormat::Csv => {
            warn!("CSV output for apply not implemented, using JSON");
            println!("{}", render_trip_json(&plan.trip)?);
        }
    }
    Ok(())
}

fn render_trip_json(trip: &TripData) -> Result<String> {
    render_json(trip).context("failed rendering updated trip")
}

fn print_profiles(registry: &ProfileRegistry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_profiles_table(registry)),
        OutputFormat::Json => {
            let all: Vec<_> = registry
                .destinations()
                .iter()
                .chain(registry.categories())
                .chain(std::iter::once(registry.fallback()))
                .collect();
            println!("{}", render_json(&all)?);
        }
        OutputFormat::Csv => {
            warn!("CSV output for profiles not implemented, using JSON");
            println!("{}", render_json(registry.destinations())?);
        }
    }
    Ok(())
}
