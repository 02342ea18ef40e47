//! Implicit AABB tree: arena build and branch-and-bound walk.
//!
//! The tree is stored as a flat arena of `N - 1` nodes over `N` triangles.
//! Building partitions the triangle slice in place around the median of the
//! longest axis; ranges of two or three triangles pack triangles directly
//! into the node's child slots instead of spawning further subtrees. Child
//! references are tagged indices — either another arena slot or a triangle
//! in the reordered slice — so traversal needs no out-of-band bookkeeping.

use std::cmp::Ordering;

use nalgebra::Point3;
use tracing::debug;

use crate::aabb::Aabb;
use crate::distance::closest_point_on_triangle;
use crate::triangle::Triangle;

/// Reference from a node to one of its two children.
#[derive(Debug, Clone, Copy)]
enum Child {
    /// Index of a child node in the arena.
    Node(u32),
    /// Index of a triangle stored directly in this slot.
    Leaf(u32),
}

/// One tree node: a bounding box over its whole subtree and two children.
#[derive(Debug, Clone)]
struct Node {
    bbox: Aabb,
    left: Child,
    right: Child,
}

/// Balanced AABB tree over a reordered triangle slice.
///
/// The arena holds exactly `N - 1` nodes in preorder with the root at slot 0.
/// Triangle indices in the leaves refer to the order the build left the
/// slice in; the caller keeps that slice alongside the tree.
#[derive(Debug)]
pub(crate) struct Bvh {
    nodes: Vec<Node>,
}

impl Bvh {
    /// Build the tree over `triangles`, reordering the slice in place.
    ///
    /// Callers handle the zero- and one-triangle cases; the tree only
    /// exists for two or more.
    pub(crate) fn build(triangles: &mut [Triangle]) -> Self {
        debug_assert!(triangles.len() >= 2);

        let placeholder = Node {
            bbox: Aabb::empty(),
            left: Child::Leaf(0),
            right: Child::Leaf(0),
        };
        let mut nodes = vec![placeholder; triangles.len() - 1];
        build_range(&mut nodes, 0, triangles, 0);

        debug!(
            triangles = triangles.len(),
            nodes = nodes.len(),
            "built AABB tree"
        );
        Self { nodes }
    }

    /// Bounding box of the whole triangle set.
    pub(crate) fn root_bbox(&self) -> Aabb {
        self.nodes[0].bbox
    }

    /// Recursive nearest-point search from `node` downward.
    ///
    /// `best_sq` and `best` carry the running best squared distance and
    /// point; both are updated in place. Subtrees are pruned against the
    /// fixed query sphere of radius `max_dist` — the bound never shrinks to
    /// the improving best distance. Leaf triangles are evaluated directly,
    /// without a box test, and both children are always considered, so the
    /// final result is the true minimum over every triangle within range.
    pub(crate) fn walk(
        &self,
        triangles: &[Triangle],
        node: usize,
        query: Point3<f64>,
        max_dist: f64,
        best_sq: &mut f64,
        best: &mut Point3<f64>,
    ) {
        let current = &self.nodes[node];
        for child in [current.left, current.right] {
            match child {
                Child::Leaf(t) => {
                    let candidate = closest_point_on_triangle(query, &triangles[t as usize]);
                    let dist_sq = (candidate - query).norm_squared();
                    if dist_sq <= *best_sq {
                        *best_sq = dist_sq;
                        *best = candidate;
                    }
                }
                Child::Node(c) => {
                    let c = c as usize;
                    if self.nodes[c].bbox.intersects_sphere(&query, max_dist) {
                        self.walk(triangles, c, query, max_dist, best_sq, best);
                    }
                }
            }
        }
    }
}

/// Fill arena slot `slot` with the node covering `range`, a subslice whose
/// first triangle sits at `base` in the full reordered sequence.
///
/// Slot arithmetic keeps the arena contiguous and in preorder: the left
/// subtree of a range of `len` triangles occupies the `len / 2 - 1` slots
/// right after `slot`, and the right subtree starts at `slot + len / 2`.
fn build_range(nodes: &mut [Node], slot: usize, range: &mut [Triangle], base: usize) {
    let len = range.len();
    debug_assert!(len >= 2);

    let bbox = Aabb::from_points(range.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2]));

    // Partition (not sort) around the median, keyed on each triangle's
    // first vertex along the box's longest axis.
    let axis = bbox.longest_axis();
    let mid = len / 2;
    range.select_nth_unstable_by(mid, |a, b| {
        a.v0[axis]
            .partial_cmp(&b.v0[axis])
            .unwrap_or(Ordering::Equal)
    });

    #[allow(clippy::cast_possible_truncation)]
    let node = if len == 2 {
        // Leaf pair: both triangles stored directly.
        Node {
            bbox,
            left: Child::Leaf(base as u32),
            right: Child::Leaf(base as u32 + 1),
        }
    } else if len == 3 {
        // Left is a direct leaf; the remaining pair becomes the next node.
        let right_slot = slot + 1;
        build_range(nodes, right_slot, &mut range[1..], base + 1);
        Node {
            bbox,
            left: Child::Leaf(base as u32),
            right: Child::Node(right_slot as u32),
        }
    } else {
        let left_slot = slot + 1;
        let right_slot = slot + mid;
        let (lower, upper) = range.split_at_mut(mid);
        build_range(nodes, left_slot, lower, base);
        build_range(nodes, right_slot, upper, base + mid);
        Node {
            bbox,
            left: Child::Node(left_slot as u32),
            right: Child::Node(right_slot as u32),
        }
    };

    nodes[slot] = node;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Small triangle in the XY plane whose first vertex is `(x, y, 0)`.
    fn tri_at(x: f64, y: f64) -> Triangle {
        Triangle::from_arrays([x, y, 0.0], [x + 0.5, y, 0.0], [x, y + 0.5, 0.0])
    }

    fn brute_force(triangles: &[Triangle], query: Point3<f64>) -> f64 {
        triangles
            .iter()
            .map(|t| (closest_point_on_triangle(query, t) - query).norm_squared())
            .fold(f64::INFINITY, f64::min)
    }

    fn walk_all(bvh: &Bvh, triangles: &[Triangle], query: Point3<f64>, max_dist: f64) -> f64 {
        let mut best_sq = max_dist * max_dist + 1.0;
        let mut best = query;
        bvh.walk(triangles, 0, query, max_dist, &mut best_sq, &mut best);
        best_sq
    }

    #[test]
    fn arena_has_n_minus_one_nodes() {
        for n in 2..20 {
            let mut triangles: Vec<Triangle> =
                (0..n).map(|i| tri_at(f64::from(i), 0.0)).collect();
            let bvh = Bvh::build(&mut triangles);
            assert_eq!(bvh.nodes.len(), (n as usize) - 1, "n = {n}");
        }
    }

    #[test]
    fn build_reorders_but_keeps_every_triangle() {
        let original: Vec<Triangle> = (0..13).map(|i| tri_at(f64::from(12 - i), 0.0)).collect();
        let mut triangles = original.clone();
        Bvh::build(&mut triangles);

        assert_eq!(triangles.len(), original.len());
        for t in &original {
            assert!(
                triangles.iter().any(|u| u == t),
                "triangle lost by the build"
            );
        }
    }

    #[test]
    fn root_bbox_covers_all_vertices() {
        let mut triangles: Vec<Triangle> = (0..9).map(|i| tri_at(f64::from(i), 2.0)).collect();
        let bvh = Bvh::build(&mut triangles);

        let bbox = bvh.root_bbox();
        for t in &triangles {
            for v in t.vertices() {
                assert!(bbox.min.x <= v.x && v.x <= bbox.max.x);
                assert!(bbox.min.y <= v.y && v.y <= bbox.max.y);
                assert!(bbox.min.z <= v.z && v.z <= bbox.max.z);
            }
        }
    }

    #[test]
    fn leaf_pair_walk_matches_brute_force() {
        let mut triangles = vec![tri_at(0.0, 0.0), tri_at(5.0, 0.0)];
        let bvh = Bvh::build(&mut triangles);

        // Closer to the right-hand triangle: both leaves must be evaluated
        let query = Point3::new(5.1, 0.1, 1.0);
        let best_sq = walk_all(&bvh, &triangles, query, 10.0);
        assert_relative_eq!(best_sq, brute_force(&triangles, query), epsilon = 1e-12);
    }

    #[test]
    fn three_triangle_walk_matches_brute_force() {
        let mut triangles = vec![tri_at(0.0, 0.0), tri_at(3.0, 0.0), tri_at(6.0, 0.0)];
        let bvh = Bvh::build(&mut triangles);
        assert_eq!(bvh.nodes.len(), 2);

        for query in [
            Point3::new(0.2, 0.1, 0.5),
            Point3::new(3.2, 0.1, 0.5),
            Point3::new(6.2, 0.1, 0.5),
            Point3::new(4.5, 0.0, 2.0),
        ] {
            let best_sq = walk_all(&bvh, &triangles, query, 20.0);
            assert_relative_eq!(best_sq, brute_force(&triangles, query), epsilon = 1e-12);
        }
    }

    #[test]
    fn four_triangle_split_hits_base_cases() {
        // len 4 splits into two leaf pairs immediately
        let mut triangles = vec![
            tri_at(0.0, 0.0),
            tri_at(2.0, 0.0),
            tri_at(4.0, 0.0),
            tri_at(6.0, 0.0),
        ];
        let bvh = Bvh::build(&mut triangles);
        assert_eq!(bvh.nodes.len(), 3);

        let query = Point3::new(4.1, 0.2, 0.3);
        let best_sq = walk_all(&bvh, &triangles, query, 20.0);
        assert_relative_eq!(best_sq, brute_force(&triangles, query), epsilon = 1e-12);
    }

    #[test]
    fn walk_prunes_far_subtrees_but_stays_exact() {
        let mut triangles: Vec<Triangle> = (0..32)
            .map(|i| tri_at(f64::from(i % 8) * 3.0, f64::from(i / 8) * 3.0))
            .collect();
        let bvh = Bvh::build(&mut triangles);

        for query in [
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(11.0, 10.0, -0.5),
            Point3::new(23.0, 21.0, 2.0),
        ] {
            let best_sq = walk_all(&bvh, &triangles, query, 4.0);
            let oracle = brute_force(&triangles, query);
            if oracle <= 16.0 {
                assert_relative_eq!(best_sq, oracle, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn coincident_triangles_still_build() {
        // Identical geometry everywhere: axis ties fall back to X and the
        // median partition still halves the range.
        let mut triangles = vec![tri_at(1.0, 1.0); 8];
        let bvh = Bvh::build(&mut triangles);
        assert_eq!(bvh.nodes.len(), 7);

        let query = Point3::new(1.0, 1.0, 2.0);
        let best_sq = walk_all(&bvh, &triangles, query, 5.0);
        assert_relative_eq!(best_sq, 4.0, epsilon = 1e-12);
    }
}
