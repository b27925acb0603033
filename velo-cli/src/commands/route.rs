use anyhow::{bail, Result};
use velo::geojson::planned_route_to_feature;

use super::{LatLon, PlannerOptions};

pub fn run(options: PlannerOptions, waypoints: &[LatLon], json: bool) -> Result<()> {
    let planner = options.build()?;
    let nodes = waypoints
        .iter()
        .map(|coord| coord.snap(&planner))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(?nodes, "Snapped waypoints");

    let Some(planned) = planner.plan(&nodes) else {
        bail!("No route found through {} waypoints", waypoints.len());
    };

    if json {
        println!("{}", serde_json::to_string(&planned_route_to_feature(&planned))?);
        return Ok(());
    }

    let profile = planned.profile();
    println!("Length:     {:.2} km", planned.route().length() / 1000.0);
    println!("Ascent:     {:.0} m", profile.total_ascent());
    println!("Descent:    {:.0} m", profile.total_descent());
    println!(
        "Elevation:  {:.0} m to {:.0} m",
        profile.min_elevation(),
        profile.max_elevation()
    );
    println!("Edges:      {}", planned.route().edges().len());

    Ok(())
}
