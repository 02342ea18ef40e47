//! Axis-aligned bounding box with the sphere overlap test used for pruning.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Non-empty boxes satisfy `min[i] <= max[i]` for every axis. Boxes are
/// derived from the union of the vertices they cover and are never mutated
/// after the tree is built.
///
/// # Example
///
/// ```
/// use mesh_proximity::{Aabb, Point3};
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(4.0, 1.0, 2.0),
/// ];
/// let aabb = Aabb::from_points(points.iter());
/// assert_eq!(aabb.longest_axis(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an empty (inverted) AABB, useful as a fold seed.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Expand the AABB to include a point. Modifies the AABB in place.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Check if the AABB is empty (min > max on some axis).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (dimensions) of the AABB.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the index of the longest axis (0 = X, 1 = Y, 2 = Z).
    ///
    /// Ties resolve to the first axis in X < Y < Z order, so degenerate
    /// boxes with equal extents split along X.
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Check whether a sphere overlaps this box.
    ///
    /// True iff the squared distance from `center` to the nearest point
    /// inside the box is at most `radius` squared. The comparison is
    /// non-strict so that a box whose nearest face lies exactly at the
    /// search radius is still descended; a surface point exactly at the
    /// radius must be reported found.
    ///
    /// This is a pruning test only: it decides whether to descend into a
    /// subtree, never whether to accept a result.
    #[must_use]
    pub fn intersects_sphere(&self, center: &Point3<f64>, radius: f64) -> bool {
        let nearest = Point3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        (center - nearest).norm_squared() <= radius * radius
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
