use clap::Parser;
use eruption_sim_core::physics::total_tracer_mass;
use eruption_sim_core::{
    ColumnField, ColumnGrid, ColumnSimulation, Degrees, EruptionError, EruptionProcess,
    GridProvider, ModelClock, ParameterList, Seconds,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Volcanic ash injection demo on a synthetic lat/lon patch
#[derive(Parser, Debug)]
#[command(name = "eruption-demo")]
#[command(about = "Volcanic ash injection demo", long_about = None)]
struct Args {
    /// JSON parameter file; overrides the command-line source settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Eruption onset (YYYY-MM-DD-SSSSS)
    #[arg(long, default_value = "0079-10-24-46800")]
    eruption_date: String,

    /// Plume radius in km
    #[arg(short, long, default_value_t = 5.0)]
    radius: f64,

    /// Level receiving the ash
    #[arg(short, long, default_value_t = 27)]
    level: i64,

    /// Number of vertical levels
    #[arg(long, default_value_t = 72)]
    nlevs: usize,

    /// Patch size in columns along each axis
    #[arg(short = 'n', long, default_value_t = 21)]
    patch: usize,

    /// Patch spacing in degrees
    #[arg(long, default_value_t = 0.01)]
    spacing: f64,

    /// Constant air density in kg/m3
    #[arg(long, default_value_t = 0.45)]
    density: f64,

    /// Time step in seconds; must divide a day evenly
    #[arg(long, default_value_t = 1800.0)]
    dt: f64,

    /// Simulated days
    #[arg(short, long, default_value_t = 10)]
    days: usize,
}

fn parameters(args: &Args) -> eruption_sim_core::Result<ParameterList> {
    match &args.config {
        Some(path) => {
            info!("Loading parameters from {}", path.display());
            ParameterList::from_json_file(path)
        }
        None => Ok(ParameterList::new()
            .with("eruption_date", args.eruption_date.as_str())
            .with("plume_radius", args.radius)
            .with("emission_level", args.level)),
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whole number of steps making up one day of output
fn steps_per_day(dt: f64) -> eruption_sim_core::Result<usize> {
    let steps = (SECONDS_PER_DAY / dt).round();
    if !steps.is_finite() || steps < 1.0 || (steps * dt - SECONDS_PER_DAY).abs() > 1e-6 {
        return Err(EruptionError::invalid_parameter(
            "dt",
            format!("{dt} s does not divide a day into whole steps"),
        ));
    }
    Ok(steps as usize)
}

fn run(args: &Args) -> eruption_sim_core::Result<()> {
    println!("=== Volcanic Eruption Demo ===\n");

    let day_steps = steps_per_day(args.dt)?;
    let params = parameters(args)?;
    let lat = params.get_or_f64("volcano_lat", eruption_sim_core::physics::VESUVIUS_LAT)?;
    let lon = params.get_or_f64("volcano_lon", eruption_sim_core::physics::VESUVIUS_LON)?;
    let grid = ColumnGrid::regular_patch(
        "Physics",
        args.nlevs,
        (Degrees::new(lat), Degrees::new(lon)),
        args.patch,
        args.patch,
        Degrees::new(args.spacing),
    )?;
    println!(
        "Grid: {} columns x {} levels around ({}, {})",
        grid.num_columns(),
        grid.num_levels(),
        Degrees::new(lat),
        Degrees::new(lon)
    );

    let process = EruptionProcess::setup(&grid, &params)?;
    let config = process.config().clone();
    println!(
        "Source: radius {}, level {}, onset {}, {} emitting cells\n",
        config.source.radius(),
        config.source.target_level(),
        config.source.eruption_start(),
        process.mask().count()
    );

    let dt = Seconds::new(args.dt);
    let clock = ModelClock::new(config.source.eruption_start(), dt)?;
    let layout = grid.layout();
    let mut sim = ColumnSimulation::new(Box::new(grid), clock);
    sim.add_process(Box::new(process))?;
    sim.fields_mut().insert(
        &config.density_name,
        "kg/m3",
        ColumnField::with_value(layout, args.density),
    )?;

    println!("Day | End of day       | Injected mass | Total mass");
    println!("----|------------------|---------------|-----------");

    let mut previous = 0.0;
    for day in 1..=args.days {
        sim.run_steps(day_steps)?;
        let fields = sim.fields();
        let total = total_tracer_mass(
            fields.get(&config.tracer_name)?,
            fields.get(&config.density_name)?,
        )?;
        println!(
            "{:3} | {:16} | {:13.4e} | {:10.4e}",
            day,
            sim.clock().current(),
            total - previous,
            total
        );
        previous = total;
    }

    println!("\n=== Simulation Complete ===");
    println!("Steps run: {}", sim.clock().steps());
    println!("Total injected mass: {previous:.6e}");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_must_divide_a_day() {
        assert_eq!(steps_per_day(1800.0).unwrap(), 48);
        assert_eq!(steps_per_day(86_400.0).unwrap(), 1);
        assert_eq!(steps_per_day(0.5).unwrap(), 172_800);

        for dt in [7000.0, 100_000.0, 0.0, -1800.0, f64::NAN] {
            assert!(
                matches!(steps_per_day(dt), Err(EruptionError::InvalidParameter { ref name, .. }) if name == "dt"),
                "dt = {dt} accepted"
            );
        }
    }
}
