use anyhow::Result;
use serde::Serialize;
use velo::graph::EdgeProfile;
use velo::NodeId;

use super::PlannerOptions;

#[derive(Serialize)]
struct GraphInfo {
    nodes: usize,
    edges: usize,
    total_length_km: f64,
    total_elevation_gain: f64,
    profiled_edges: usize,
    dead_ends: usize,
    max_out_degree: u32,
}

pub fn run(options: PlannerOptions, json: bool) -> Result<()> {
    let planner = options.build()?;
    let graph = planner.graph();

    let mut info = GraphInfo {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        total_length_km: 0.0,
        total_elevation_gain: 0.0,
        profiled_edges: 0,
        dead_ends: 0,
        max_out_degree: 0,
    };

    for node_id in 0..graph.node_count() as NodeId {
        let degree = graph.node_out_degree(node_id);
        if degree == 0 {
            info.dead_ends += 1;
        }
        info.max_out_degree = info.max_out_degree.max(degree);
    }

    for edge_id in 0..graph.edge_count() as u32 {
        info.total_length_km += graph.edge_length(edge_id) / 1000.0;
        info.total_elevation_gain += graph.edge_elevation_gain(edge_id);
        if matches!(graph.edge_profile(edge_id), EdgeProfile::Sampled(_)) {
            info.profiled_edges += 1;
        }
    }

    if json {
        println!("{}", serde_json::to_string(&info)?);
        return Ok(());
    }

    println!("Nodes:            {}", info.nodes);
    println!("Edges:            {}", info.edges);
    println!("Total length:     {:.1} km", info.total_length_km);
    println!("Elevation gain:   {:.0} m", info.total_elevation_gain);
    println!(
        "Profiled edges:   {} ({:.1}%)",
        info.profiled_edges,
        percentage(info.profiled_edges, info.edges)
    );
    println!("Dead ends:        {}", info.dead_ends);
    println!("Max out-degree:   {}", info.max_out_degree);

    Ok(())
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
