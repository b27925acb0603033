//! Basic example demonstrating velo library usage.
//!
//! Run with: cargo run --example basic -- /path/to/graph

use std::env;
use velo::{Point, RoutePlanner, VeloError};

fn main() -> Result<(), VeloError> {
    // Get graph directory from command line
    let graph_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/graph");
        std::process::exit(1);
    });

    let planner = RoutePlanner::builder(&graph_dir).cache_size(10).build()?;

    // A few rides between Swiss cities, as (lon, lat)
    let rides = [
        ("Bern → Thun", (7.4391, 46.9490), (7.6280, 46.7548)),
        ("Lausanne → Vevey", (6.6291, 46.5167), (6.8432, 46.4628)),
        ("Thun → Bern", (7.6280, 46.7548), (7.4391, 46.9490)),
    ];

    println!("Planned routes:");
    println!("{:-<50}", "");

    for (name, from, to) in &rides {
        let from = Point::from_wgs84(from.0, from.1)?;
        let to = Point::from_wgs84(to.0, to.1)?;
        let (Some(from), Some(to)) = (planner.node_closest_to(&from), planner.node_closest_to(&to))
        else {
            println!("{}: no graph node nearby", name);
            continue;
        };

        match planner.plan(&[from, to]) {
            Some(planned) => {
                let profile = planned.profile();
                println!(
                    "{}: {:.1} km, +{:.0} m / -{:.0} m",
                    name,
                    planned.route().length() / 1000.0,
                    profile.total_ascent(),
                    profile.total_descent()
                );
            }
            None => println!("{}: no route", name),
        }
    }

    // Show cache statistics
    let stats = planner.cache_stats();
    println!("\nCache statistics:");
    println!("  Cached legs: {}", stats.entry_count);
    println!("  Hits: {}", stats.hit_count);
    println!("  Misses: {}", stats.miss_count);
    println!("  Hit rate: {:.1}%", stats.hit_rate() * 100.0);

    Ok(())
}
