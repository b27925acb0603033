use anyhow::Result;
use serde::Serialize;

use super::{LatLon, PlannerOptions};

#[derive(Serialize)]
struct NearestResponse {
    node_id: u32,
    lat: f64,
    lon: f64,
    e: f64,
    n: f64,
    distance: f64,
}

pub fn run(options: PlannerOptions, coord: LatLon, json: bool) -> Result<()> {
    let planner = options.build()?;
    let point = coord.to_point()?;
    let node_id = coord.snap(&planner)?;
    let node = planner.graph().node_point(node_id);

    let response = NearestResponse {
        node_id,
        lat: node.lat().to_degrees(),
        lon: node.lon().to_degrees(),
        e: node.e(),
        n: node.n(),
        distance: node.distance_to(&point),
    };

    if json {
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!(
            "Node {} at {:.6}, {:.6} ({:.1} m away)",
            response.node_id, response.lat, response.lon, response.distance
        );
    }

    Ok(())
}
