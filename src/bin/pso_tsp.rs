//! Command-line driver: generate locations, run the swarm, write CSV files.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use u_pso_tsp::geometry::{generate_locations, DistanceTable, LocationBounds};
use u_pso_tsp::pso::{PsoConfig, PsoRunner, VelocityLimit};
use u_pso_tsp::trace::export::{write_locations_csv, write_route_csv, write_route_xyz};
use u_pso_tsp::trace::CsvTraceWriter;
use u_pso_tsp::PsoError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of random locations to generate
    #[arg(long, default_value_t = 40)]
    cities: usize,

    /// Number of particles in the swarm
    #[arg(long, default_value_t = 4)]
    particles: usize,

    /// Fixed iteration budget
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// Inertia weight
    #[arg(long, default_value_t = 0.729)]
    inertia: f64,

    /// Cognitive weight
    #[arg(long, default_value_t = 1.49)]
    cognitive: f64,

    /// Social weight
    #[arg(long, default_value_t = 1.49)]
    social: f64,

    /// Velocity clamp magnitude; defaults to the number of cities
    #[arg(long, conflicts_with = "unbounded")]
    max_velocity: Option<f64>,

    /// Disable velocity clamping
    #[arg(long)]
    unbounded: bool,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Random seed for locations and the swarm
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the CSV outputs
    #[arg(long, default_value = "csv")]
    out_dir: PathBuf,
}

impl Args {
    fn config(&self) -> PsoConfig {
        let limit = match (self.unbounded, self.max_velocity) {
            (true, _) => VelocityLimit::Unbounded,
            (false, Some(vmax)) => VelocityLimit::Fixed(vmax),
            (false, None) => VelocityLimit::LocationCount,
        };

        let mut config = PsoConfig::default()
            .with_particle_count(self.particles)
            .with_iterations(self.iterations)
            .with_weights(self.inertia, self.cognitive, self.social)
            .with_velocity_limit(limit);
        config.workers = self.workers;
        config.seed = self.seed;
        config
    }
}

fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let args = Args::parse();

    let config = args.config();
    config.validate()?;
    if args.cities == 0 {
        return Err(PsoError::InvalidConfig("cities must be positive".into()).into());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };
    let locations = generate_locations(args.cities, &LocationBounds::default(), &mut rng);
    let table = DistanceTable::from_locations(&locations)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let create = |name: &str| -> anyhow::Result<BufWriter<File>> {
        let path = args.out_dir.join(name);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        Ok(BufWriter::new(file))
    };

    write_locations_csv(create("city_coordinates.csv")?, &locations)?;

    let trace = CsvTraceWriter::new(create("particle_data.csv")?, table.len())?;
    let result = PsoRunner::run(&table, &config, &trace)?;
    trace.flush()?;

    println!("{result}");

    write_route_csv(create("best_route_coordinates.csv")?, &result.best_order, &locations)?;
    write_route_xyz(create("best_route_xyz.csv")?, &result.best_order, &locations)?;
    tracing::info!(dir = %args.out_dir.display(), "wrote route files");

    Ok(())
}
