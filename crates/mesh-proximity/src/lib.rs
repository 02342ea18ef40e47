//! Closest-point queries on triangle meshes.
//!
//! This crate answers "what is the closest point on this triangulated surface
//! to a query point, within a maximum search radius?" in sub-linear time.
//! An axis-aligned bounding box tree is built once over the triangle set;
//! each query then runs a branch-and-bound search that skips every subtree
//! whose bounding box lies entirely beyond the search radius.
//!
//! # Example
//!
//! ```
//! use mesh_proximity::{ClosestPointQuery, Triangle, Point3};
//!
//! // A unit square in the XY plane, split into two triangles
//! let triangles = vec![
//!     Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
//!     Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
//! ];
//!
//! let index = ClosestPointQuery::new(triangles).unwrap();
//!
//! // One unit above the center of the square
//! let hit = index.closest_point(Point3::new(0.5, 0.5, 1.0), 2.0);
//! assert!(hit.is_some());
//!
//! // Far away, small radius: nothing in range
//! let miss = index.closest_point(Point3::new(100.0, 100.0, 100.0), 1.0);
//! assert!(miss.is_none());
//! ```
//!
//! # Search Radius Contract
//!
//! Subtree pruning is bounded by the caller-supplied radius, not by the best
//! distance found so far. Results are exact either way; a shrinking bound
//! would only visit fewer boxes. A surface point lying exactly at the radius
//! is reported found (`<=` semantics).
//!
//! # Concurrency
//!
//! [`ClosestPointQuery`] is immutable after construction. Queries take
//! `&self` and touch no shared mutable state, so a built index can be shared
//! freely across threads.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aabb;
mod bvh;
mod distance;
mod error;
mod query;
mod triangle;

pub use aabb::Aabb;
pub use distance::closest_point_on_triangle;
pub use error::{ProximityError, ProximityResult};
pub use query::ClosestPointQuery;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
