//! Minimal Wavefront OBJ loading.
//!
//! Reads the subset of OBJ needed to feed the closest-point index:
//! `v x y z` vertex records and `f` face records. Face indices may be plain
//! (`f 1 2 3`), carry texture/normal slots (`f 1/4 2/5 3/6`, `f 1//7 ...`),
//! or be negative (relative to the vertices seen so far). Faces with more
//! than three vertices are fan-triangulated. Every other record type is
//! skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use mesh_proximity::{Point3, Triangle};

/// Load the triangles of an OBJ file.
pub fn load_obj(path: &Path) -> Result<Vec<Triangle>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        let mut fields = line.split_whitespace();

        match fields.next() {
            Some("v") => {
                let vertex = parse_vertex(fields)
                    .with_context(|| format!("{}:{}: bad vertex", path.display(), line_no + 1))?;
                vertices.push(vertex);
            }
            Some("f") => {
                parse_face(fields, &vertices, &mut triangles)
                    .with_context(|| format!("{}:{}: bad face", path.display(), line_no + 1))?;
            }
            // Comments, normals, texture coordinates, groups, materials...
            _ => {}
        }
    }

    Ok(triangles)
}

fn parse_vertex<'a>(mut fields: impl Iterator<Item = &'a str>) -> Result<Point3<f64>> {
    let mut coord = || -> Result<f64> {
        let field = fields.next().context("missing coordinate")?;
        field
            .parse()
            .with_context(|| format!("not a number: {field:?}"))
    };
    Ok(Point3::new(coord()?, coord()?, coord()?))
}

fn parse_face<'a>(
    fields: impl Iterator<Item = &'a str>,
    vertices: &[Point3<f64>],
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    let corners: Vec<Point3<f64>> = fields
        .map(|field| resolve_index(field, vertices))
        .collect::<Result<_>>()?;

    if corners.len() < 3 {
        bail!("face has {} vertices, need at least 3", corners.len());
    }

    // Fan triangulation for quads and larger polygons
    for i in 1..corners.len() - 1 {
        triangles.push(Triangle::new(corners[0], corners[i], corners[i + 1]));
    }
    Ok(())
}

/// Resolve one face corner (`i`, `i/t`, `i//n`, `i/t/n`) to a vertex.
///
/// OBJ indices are 1-based; negative values count back from the end of the
/// vertex list parsed so far.
fn resolve_index(field: &str, vertices: &[Point3<f64>]) -> Result<Point3<f64>> {
    let index_part = field.split('/').next().unwrap_or(field);
    let index: i64 = index_part
        .parse()
        .with_context(|| format!("not an index: {field:?}"))?;

    let resolved = if index > 0 {
        usize::try_from(index - 1).ok()
    } else if index < 0 {
        vertices.len().checked_sub(index.unsigned_abs() as usize)
    } else {
        None
    };

    resolved
        .and_then(|i| vertices.get(i).copied())
        .with_context(|| format!("vertex index {index} out of range (have {})", vertices.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "proximity-obj-test-{}-{}.obj",
            std::process::id(),
            content.len()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_triangles() {
        let path = write_temp_obj(
            "# comment\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vn 0 0 1\n\
             f 1 2 3\n",
        );
        let triangles = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(triangles.len(), 1);
        assert!((triangles[0].v1.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fan_triangulates_quads() {
        let path = write_temp_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             f 1/1 2/2 3/3 4/4\n",
        );
        let triangles = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn negative_indices_resolve() {
        let path = write_temp_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f -3 -2 -1\n",
        );
        let triangles = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(triangles.len(), 1);
        assert!((triangles[0].v2.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let path = write_temp_obj("v 0 0 0\nf 1 2 3\n");
        let result = load_obj(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
