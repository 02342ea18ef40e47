//! Closest-point query façade.

use nalgebra::Point3;
use tracing::debug;

use crate::aabb::Aabb;
use crate::bvh::Bvh;
use crate::distance::closest_point_on_triangle;
use crate::error::{ProximityError, ProximityResult};
use crate::triangle::Triangle;

/// Slack added to the squared search radius when seeding the walk, so that a
/// surface point lying exactly at the radius is still recorded as a
/// candidate. Hits are re-checked against the caller's unmodified radius
/// before being returned, so the slack never widens the reported results.
const RADIUS_SLACK: f64 = 2.0;

/// A closest-point index over a set of triangles.
///
/// Construction copies the triangles, reorders them, and builds the AABB
/// tree once; afterwards the index is immutable and any number of queries
/// (from any number of threads) can run against it.
///
/// # Example
///
/// ```
/// use mesh_proximity::{ClosestPointQuery, Triangle, Point3};
///
/// let triangles = vec![
///     Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
///     Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
/// ];
/// let index = ClosestPointQuery::new(triangles).unwrap();
///
/// let closest = index.closest_point(Point3::new(0.5, 0.5, 1.0), 2.0).unwrap();
/// assert!((closest - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-10);
/// ```
#[derive(Debug)]
pub struct ClosestPointQuery {
    /// Triangle storage, in the order the build left it.
    triangles: Vec<Triangle>,
    /// The tree; absent when a single triangle needs no hierarchy.
    tree: Option<Bvh>,
}

impl ClosestPointQuery {
    /// Build a closest-point index over the given triangles.
    ///
    /// The triangle sequence is taken by value and reordered during the
    /// build. Expected cost is O(N log N): a median split with a
    /// linear-time partition per level.
    ///
    /// # Errors
    ///
    /// Returns [`ProximityError::EmptyMesh`] when `triangles` is empty.
    pub fn new(mut triangles: Vec<Triangle>) -> ProximityResult<Self> {
        if triangles.is_empty() {
            return Err(ProximityError::EmptyMesh);
        }

        let tree = if triangles.len() >= 2 {
            Some(Bvh::build(&mut triangles))
        } else {
            None
        };

        debug!(triangles = triangles.len(), "closest-point index ready");
        Ok(Self { triangles, tree })
    }

    /// Find the closest point on the surface within `max_dist` of `query`.
    ///
    /// Returns `None` when no part of the surface lies within the radius —
    /// a normal outcome, not an error. A point exactly at `max_dist` is
    /// reported found. A negative `max_dist` finds nothing; a zero radius
    /// reaches only a query point lying exactly on the surface.
    ///
    /// Pruning is bounded by `max_dist` for the whole search, not by the
    /// improving best-so-far distance; see the crate docs for the contract.
    #[must_use]
    pub fn closest_point(&self, query: Point3<f64>, max_dist: f64) -> Option<Point3<f64>> {
        // Every comparison below squares the radius, which would treat -r
        // like r.
        if max_dist < 0.0 {
            return None;
        }

        let mut best_sq = max_dist.mul_add(max_dist, RADIUS_SLACK);
        let mut best = query;

        match &self.tree {
            Some(tree) => tree.walk(&self.triangles, 0, query, max_dist, &mut best_sq, &mut best),
            None => {
                // Single triangle: no tree, test it directly.
                let candidate = closest_point_on_triangle(query, &self.triangles[0]);
                let dist_sq = (candidate - query).norm_squared();
                if dist_sq <= best_sq {
                    best_sq = dist_sq;
                    best = candidate;
                }
            }
        }

        // Success is judged against the caller's radius, not the slack-
        // inflated seed.
        if best_sq <= max_dist * max_dist {
            Some(best)
        } else {
            None
        }
    }

    /// Number of triangles in the index.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of the whole surface.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match &self.tree {
            Some(tree) => tree.root_bbox(),
            None => Aabb::from_points(self.triangles[0].vertices().iter()),
        }
    }
}
