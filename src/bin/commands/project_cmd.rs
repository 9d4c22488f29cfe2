use anyhow::Result;
use geoipmap::project;

use crate::cli_utils::GeometryArgs;

pub fn cmd_project(lat: f64, lon: f64, geometry: GeometryArgs) -> Result<()> {
    let geometry = geometry.to_geometry()?;
    let point = project(lat, lon, &geometry);
    println!("{}", serde_json::to_string(&point)?);
    Ok(())
}
