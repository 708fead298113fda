//! city_grid: runs the fleet dispatcher on a grid city.
//!
//! By default a random `width x height` grid is generated and requests arrive
//! at random.  Pass `--intersections`/`--roads` to load a network from CSV and
//! `--requests` to replay a fixed timetable instead.
//!
//! ```text
//! RUST_LOG=debug city_grid --cars 6 --rate 0.8 --ticks 40
//! city_grid --step                     # press Enter to advance, q to quit
//! city_grid --out ./run                # vehicle_snapshots.csv + tick_summaries.csv
//! ```

mod network;

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet_core::{SimConfig, SimRng, Tick};
use fleet_dispatch::{ArrivalAccounting, DispatchConfig, Request, ScoringPolicy, Vehicle};
use fleet_sim::{
    CsvTrajectoryWriter, LogObserver, RequestGenerator, RequestSchedule, RequestSource, Sim,
    SimBuilder, SimObserver, load_network, load_requests_csv,
};

use network::build_grid;

/// Seed offsets of the independent random streams.
const ROAD_STREAM:    u64 = 0;
const REQUEST_STREAM: u64 = 2;

#[derive(Parser)]
#[command(name = "city_grid")]
#[command(about = "Simulate a taxi fleet dispatched tick by tick over a road network")]
struct Cli {
    /// Grid width (generated network only)
    #[arg(long, default_value_t = 5)]
    width: u32,

    /// Grid height (generated network only)
    #[arg(long, default_value_t = 5)]
    height: u32,

    /// Largest random road weight (generated network only)
    #[arg(long, default_value_t = 9)]
    max_weight: u32,

    /// Intersections CSV; requires --roads
    #[arg(long, requires = "roads")]
    intersections: Option<PathBuf>,

    /// Roads CSV; requires --intersections
    #[arg(long, requires = "intersections")]
    roads: Option<PathBuf>,

    /// Request timetable CSV; replaces random requests
    #[arg(long)]
    requests: Option<PathBuf>,

    /// Number of vehicles
    #[arg(long, default_value_t = 4)]
    cars: usize,

    /// Mean new requests per tick
    #[arg(long, default_value_t = 0.5)]
    rate: f64,

    /// Ticks to simulate
    #[arg(long, default_value_t = 50)]
    ticks: u64,

    /// Master RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Rank candidates by distance alone and skip congestion bookkeeping
    #[arg(long)]
    distance_only: bool,

    /// Release exactly the road each vehicle used on arrival
    #[arg(long, conflicts_with = "distance_only")]
    per_vehicle: bool,

    /// Pause after every tick and print the fleet
    #[arg(long)]
    step: bool,

    /// Directory for trajectory CSVs
    #[arg(long)]
    out: Option<PathBuf>,
}

// ── Demand ────────────────────────────────────────────────────────────────────

enum Demand {
    Random(RequestGenerator),
    Scripted(RequestSchedule),
}

impl RequestSource for Demand {
    fn requests_for(&mut self, tick: Tick, node_count: usize) -> Vec<Request> {
        match self {
            Demand::Random(g)   => g.requests_for(tick, node_count),
            Demand::Scripted(s) => s.requests_for(tick, node_count),
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    tracing::info!(seed = cli.seed, cars = cli.cars, ticks = cli.ticks, "city_grid starting");

    let config = SimConfig {
        total_ticks: cli.ticks,
        seed:        cli.seed,
        ..SimConfig::default()
    };
    let mut master = SimRng::new(config.seed);

    // 1. Road network.
    let network = match (&cli.intersections, &cli.roads) {
        (Some(i), Some(r)) => load_network(i, r)
            .with_context(|| format!("loading {} and {}", i.display(), r.display()))?,
        _ => build_grid(cli.width, cli.height, cli.max_weight, &mut master.child(ROAD_STREAM))?,
    };
    println!(
        "Road network: {} intersections, {} roads",
        network.node_count(),
        network.edge_count()
    );

    // 2. Demand.
    let demand = match &cli.requests {
        Some(path) => {
            let schedule = load_requests_csv(path)
                .with_context(|| format!("loading {}", path.display()))?;
            println!("Replaying {} scripted requests", schedule.len());
            Demand::Scripted(schedule)
        }
        None => Demand::Random(RequestGenerator::new(master.child(REQUEST_STREAM), cli.rate)?),
    };

    // 3. Dispatch policy.
    let dispatch = if cli.distance_only {
        DispatchConfig::distance_only()
    } else {
        DispatchConfig {
            scoring: ScoringPolicy::CongestionWeighted,
            arrival: if cli.per_vehicle { ArrivalAccounting::PerVehicle } else { ArrivalAccounting::ByTarget },
        }
    };

    let mut sim = SimBuilder::new(config, network, demand)
        .dispatch(dispatch)
        .random_fleet(cli.cars)
        .build()?;

    // 4. Observers.
    let writer = match &cli.out {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Some(CsvTrajectoryWriter::new(dir, &sim.config)?)
        }
        None => None,
    };
    let mut observer = (LogObserver::new(10), writer);

    // 5. Run.
    let started = Instant::now();
    if cli.step {
        step_through(&mut sim, &mut observer)?;
    } else {
        sim.run(&mut observer)?;
    }
    if let Some(e) = observer.1.as_mut().and_then(CsvTrajectoryWriter::take_error) {
        return Err(e).context("writing trajectories");
    }

    // 6. Report.
    let stats = sim.stats;
    println!();
    println!("Ticks simulated:    {}", stats.ticks);
    println!("Requests issued:    {}", stats.requests_issued);
    println!("Pickups:            {}", stats.direct_pickups);
    println!("Completed in place: {}", stats.instant_trips);
    println!("Drop-offs:          {}", stats.dropped_off);
    println!("Still waiting:      {}", sim.controller.pending_requests().len());
    println!("Wall time:          {:.2?}", started.elapsed());
    Ok(())
}

/// Run one tick per line read from stdin; `q` or end of input stops early.
fn step_through<O: SimObserver>(sim: &mut Sim<Demand>, observer: &mut O) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while sim.current_tick() < sim.config.end_tick() {
        let tick = sim.current_tick();
        let summary = sim.step(observer)?;
        println!("── {} ── {summary:?}", sim.clock);
        print_fleet(tick, &sim.vehicles);

        print!("[Enter] next tick, [q] quit > ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let Some(line) = lines.next() else { break };
        if line?.trim() == "q" {
            break;
        }
    }
    observer.on_sim_end(sim.current_tick());
    Ok(())
}

fn print_fleet(tick: Tick, vehicles: &[Vehicle]) {
    for v in vehicles {
        match v.passenger_id {
            Some(p) => println!("  {tick}  {}  -> {}  carrying {p}", v.car_id, v.intersection_id),
            None    => println!("  {tick}  {}  -> {}  idle", v.car_id, v.intersection_id),
        }
    }
}
