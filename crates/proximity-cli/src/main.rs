//! Command-line driver for closest-point queries.
//!
//! Loads a triangle mesh from an OBJ file, builds the closest-point index
//! once, then answers a batch of queries read from a text file (one
//! `x, y, z` point per line, comma or whitespace separated):
//!
//! ```text
//! proximity model.obj points.txt 2.5
//! ```
//!
//! Each line of output reports either the closest point on the surface
//! within the search distance, or that none exists.

mod obj;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mesh_proximity::{ClosestPointQuery, Point3};
use tracing::info;

/// Closest point on a mesh surface, within a maximum search distance.
#[derive(Parser)]
#[command(name = "proximity")]
#[command(about = "Closest-point queries against an OBJ mesh", long_about = None)]
#[command(version)]
struct Cli {
    /// Mesh to query, as a Wavefront OBJ file
    mesh: PathBuf,

    /// Text file of query points, one `x, y, z` triple per line
    points: PathBuf,

    /// Maximum search distance
    max_dist: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.max_dist <= 0.0 {
        bail!("max search distance must be positive, got {}", cli.max_dist);
    }

    let triangles = obj::load_obj(&cli.mesh)?;
    info!(
        triangles = triangles.len(),
        mesh = %cli.mesh.display(),
        "mesh loaded"
    );

    let index = ClosestPointQuery::new(triangles)
        .with_context(|| format!("building index over {}", cli.mesh.display()))?;

    let points = File::open(&cli.points)
        .with_context(|| format!("opening {}", cli.points.display()))?;

    for (line_no, line) in BufReader::new(points).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", cli.points.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let query = parse_point(&line)
            .with_context(|| format!("{}:{}: bad point", cli.points.display(), line_no + 1))?;

        match index.closest_point(query, cli.max_dist) {
            Some(closest) => println!(
                "Closest point to {} {} {} within distance {} is: {} {} {}",
                query.x, query.y, query.z, cli.max_dist, closest.x, closest.y, closest.z
            ),
            None => println!(
                "Could not find closest point to {} {} {} within distance {}",
                query.x, query.y, query.z, cli.max_dist
            ),
        }
    }

    Ok(())
}

/// Parse one `x, y, z` line; commas and whitespace both separate.
fn parse_point(line: &str) -> Result<Point3<f64>> {
    let mut fields = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());

    let mut coord = || -> Result<f64> {
        let field = fields.next().context("missing coordinate")?;
        field
            .parse()
            .with_context(|| format!("not a number: {field:?}"))
    };

    let point = Point3::new(coord()?, coord()?, coord()?);
    if fields.next().is_some() {
        bail!("trailing fields after z coordinate");
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated() {
        let p = parse_point("1.0, 2.5, -3.0").unwrap();
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.5).abs() < 1e-12);
        assert!((p.z - (-3.0)).abs() < 1e-12);
    }

    #[test]
    fn parses_whitespace_separated() {
        let p = parse_point("  4 5 6 ").unwrap();
        assert!((p.z - 6.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_short_and_long_lines() {
        assert!(parse_point("1 2").is_err());
        assert!(parse_point("1 2 3 4").is_err());
        assert!(parse_point("1 two 3").is_err());
    }
}
