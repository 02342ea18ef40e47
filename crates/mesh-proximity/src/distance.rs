//! Point-to-triangle closest point computation.

use nalgebra::Point3;

use crate::triangle::Triangle;

/// Compute the closest point on a triangle to a query point.
///
/// This implements the Voronoi-region algorithm from "Real-Time Collision
/// Detection" by Christer Ericson: the query point is classified against the
/// seven regions of the triangle (three vertices, three edges, interior) and
/// projected onto the closest feature. The result always lies on the filled
/// triangle.
///
/// Total over all inputs: degenerate triangles (collinear or coincident
/// vertices) resolve to a vertex or edge region before the face region's
/// division is reached, so the result stays finite.
///
/// # Example
///
/// ```
/// use mesh_proximity::{closest_point_on_triangle, Triangle, Point3};
///
/// let tri = Triangle::from_arrays(
///     [0.0, 0.0, 0.0],
///     [10.0, 0.0, 0.0],
///     [5.0, 10.0, 0.0],
/// );
///
/// // Directly above the interior: projects onto the plane
/// let p = closest_point_on_triangle(Point3::new(5.0, 3.0, 4.0), &tri);
/// assert!((p - Point3::new(5.0, 3.0, 0.0)).norm() < 1e-10);
/// ```
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn closest_point_on_triangle(point: Point3<f64>, triangle: &Triangle) -> Point3<f64> {
    let a = triangle.v0;
    let b = triangle.v1;
    let c = triangle.v2;

    let ab = b - a;
    let ac = c - a;
    let ap = point - a;

    // Vertex region A
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    // Vertex region B
    let bp = point - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    // Edge region AB
    let vc = d1.mul_add(d4, -(d3 * d2));
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    // Vertex region C
    let cp = point - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    // Edge region AC
    let vb = d5.mul_add(d2, -(d1 * d6));
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    // Edge region BC
    let va = d3.mul_add(d6, -(d5 * d4));
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
