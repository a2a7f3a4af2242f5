use super::config::NeighborSearch;
use kiddo::{ImmutableKdTree, SquaredEuclidean};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Slack on the kd-tree search radius; exact `<=` filtering happens afterwards.
const RADIUS_SLACK: f64 = 1e-9;

/// A point found within the query radius of another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the queried point list.
    pub index: usize,
    /// Euclidean distance to the query point.
    pub distance: f64,
}

/// For every point, finds all points (itself included) at Euclidean distance `<= radius`.
///
/// The order of neighbors within each result list is unspecified.
///
/// # Arguments
///
/// * `points` - Query and target coordinates.
/// * `radius` - Search radius in the units of the coordinates.
/// * `search` - Spatial index or exhaustive scan.
///
/// # Return
///
/// One neighbor list per input point, in input order.
pub fn query_radius(points: &[[f64; 3]], radius: f64, search: NeighborSearch) -> Vec<Vec<Neighbor>> {
    if points.is_empty() || !(radius >= 0.0) {
        return vec![Vec::new(); points.len()];
    }
    match search {
        NeighborSearch::KdTree => query_kdtree(points, radius),
        NeighborSearch::BruteForce => query_brute_force(points, radius),
    }
}

fn query_kdtree(points: &[[f64; 3]], radius: f64) -> Vec<Vec<Neighbor>> {
    // Items are slice indices. The immutable layout tolerates any number of
    // points sharing a coordinate on one axis, as in flat layers or lattices.
    let tree: ImmutableKdTree<f64, 3> = ImmutableKdTree::new_from_slice(points);

    let radius_sq = radius * radius;
    let search_sq = radius_sq + radius_sq * RADIUS_SLACK + RADIUS_SLACK;

    let query = |point: &[f64; 3]| -> Vec<Neighbor> {
        tree.within_unsorted::<SquaredEuclidean>(point, search_sq)
            .into_iter()
            .filter(|n| n.distance <= radius_sq)
            .map(|n| Neighbor {
                index: n.item as usize,
                distance: n.distance.sqrt(),
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results = points.iter().map(query).collect();

    #[cfg(feature = "parallel")]
    let results = points.par_iter().map(query).collect();

    results
}

fn query_brute_force(points: &[[f64; 3]], radius: f64) -> Vec<Vec<Neighbor>> {
    let radius_sq = radius * radius;

    let query = |point: &[f64; 3]| -> Vec<Neighbor> {
        points
            .iter()
            .enumerate()
            .filter_map(|(index, other)| {
                let d_sq = squared_distance(point, other);
                (d_sq <= radius_sq).then(|| Neighbor {
                    index,
                    distance: d_sq.sqrt(),
                })
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results = points.iter().map(query).collect();

    #[cfg(feature = "parallel")]
    let results = points.par_iter().map(query).collect();

    results
}

#[inline]
fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}
