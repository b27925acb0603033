use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use velo::CostModel;

mod commands;

use commands::{LatLon, PlannerOptions};

/// Cycling route planner CLI tool
#[derive(Parser)]
#[command(name = "velo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the graph tables
    #[arg(short, long, env = "VELO_GRAPH_DIR", global = true)]
    graph_dir: Option<PathBuf>,

    /// Maximum route legs in cache
    #[arg(long, env = "VELO_CACHE_SIZE", default_value = "64", global = true)]
    cache_size: u64,

    /// Maximum distance between elevation profile samples, in meters
    #[arg(long, env = "VELO_PROFILE_STEP", default_value = "5", global = true)]
    profile_step: f64,

    /// How far from a coordinate its closest node may be, in meters
    #[arg(
        long,
        env = "VELO_SEARCH_DISTANCE",
        default_value = "500",
        global = true
    )]
    search_distance: f64,

    /// Cost model: "shortest" or "city-bike"
    #[arg(
        short,
        long,
        env = "VELO_COST_MODEL",
        default_value = "city-bike",
        global = true
    )]
    cost_model: CostModel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display statistics about the graph
    Info {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find the graph node closest to a coordinate
    Nearest {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Plan a route between coordinates given as "lat,lon"
    Route {
        /// Start of the route
        #[arg(long)]
        from: LatLon,

        /// End of the route
        #[arg(long)]
        to: LatLon,

        /// Intermediate waypoints, in order
        #[arg(long)]
        via: Vec<LatLon>,

        /// Output the route as a GeoJSON feature
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velo=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = PlannerOptions {
        graph_dir: cli.graph_dir,
        cache_size: cli.cache_size,
        profile_step: cli.profile_step,
        search_distance: cli.search_distance,
        cost_model: cli.cost_model,
    };

    match cli.command {
        Commands::Info { json } => commands::info::run(options, json),
        Commands::Nearest { lat, lon, json } => {
            commands::nearest::run(options, LatLon { lat, lon }, json)
        }
        Commands::Route {
            from,
            to,
            via,
            json,
        } => {
            let mut waypoints = Vec::with_capacity(via.len() + 2);
            waypoints.push(from);
            waypoints.extend(via);
            waypoints.push(to);
            commands::route::run(options, &waypoints, json)
        }
    }
}
