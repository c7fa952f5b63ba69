//! KD-tree backed point index with a brute-force path for small sets.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;

/// Below this size a linear scan with partial selection beats building a
/// tree.
const BRUTE_FORCE_LIMIT: usize = 2000;

/// A single query result: the index of a point in the original slice and
/// its Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into the slice the set was built from.
    pub index: usize,
    /// Euclidean distance to the query point.
    pub distance: f64,
}

/// A static set of 3D points supporting nearest-neighbor and radius queries.
///
/// Positions are stored in double precision so query distances do not lose
/// accuracy regardless of the input precision.
#[derive(Debug)]
pub struct PointSet {
    coords: Vec<[f64; 3]>,
    tree: Option<KdTree<f64, 3>>,
}

impl PointSet {
    /// Builds a point set from single-precision positions.
    ///
    /// # Example
    ///
    /// ```
    /// use seam_spatial::PointSet;
    /// use nalgebra::Point3;
    ///
    /// let set = PointSet::new(&[Point3::origin()]);
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub fn new(positions: &[Point3<f32>]) -> Self {
        let coords: Vec<[f64; 3]> = positions
            .iter()
            .map(|p| [f64::from(p.x), f64::from(p.y), f64::from(p.z)])
            .collect();

        let tree = if coords.len() > BRUTE_FORCE_LIMIT {
            let mut tree: KdTree<f64, 3> = KdTree::with_capacity(coords.len());
            for (i, c) in coords.iter().enumerate() {
                tree.add(c, i as u64);
            }
            Some(tree)
        } else {
            None
        };

        Self { coords, tree }
    }

    /// Returns the number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns the `k` nearest points to `query`, ordered by distance with
    /// ties broken by ascending index.
    ///
    /// Fewer than `k` results are returned when the set is smaller than `k`.
    /// A point coincident with the query is a valid result at distance zero;
    /// callers that index their own points skip it by index.
    #[must_use]
    pub fn nearest(&self, query: &Point3<f32>, k: usize) -> Vec<Neighbor> {
        if k == 0 || self.coords.is_empty() {
            return Vec::new();
        }

        let q = [f64::from(query.x), f64::from(query.y), f64::from(query.z)];

        let mut result = match &self.tree {
            Some(tree) => tree
                .nearest_n::<SquaredEuclidean>(&q, k)
                .into_iter()
                .map(|n| Neighbor {
                    index: n.item as usize,
                    distance: n.distance.sqrt(),
                })
                .collect(),
            None => {
                let mut all: Vec<Neighbor> = self
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Neighbor {
                        index: i,
                        distance: squared_distance(c, &q),
                    })
                    .collect();

                let count = k.min(all.len());
                all.select_nth_unstable_by(count - 1, |a, b| {
                    (a.distance, a.index)
                        .partial_cmp(&(b.distance, b.index))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                all.truncate(count);
                for n in &mut all {
                    n.distance = n.distance.sqrt();
                }
                all
            }
        };

        sort_neighbors(&mut result);
        result
    }

    /// Returns every point within `radius` of `query` (inclusive), ordered
    /// by distance with ties broken by ascending index.
    #[must_use]
    pub fn within_radius(&self, query: &Point3<f32>, radius: f64) -> Vec<Neighbor> {
        if radius < 0.0 || self.coords.is_empty() {
            return Vec::new();
        }

        let q = [f64::from(query.x), f64::from(query.y), f64::from(query.z)];
        let r2 = radius * radius;

        let mut result: Vec<Neighbor> = match &self.tree {
            Some(tree) => tree
                .within_unsorted::<SquaredEuclidean>(&q, r2)
                .into_iter()
                .map(|n| Neighbor {
                    index: n.item as usize,
                    distance: n.distance.sqrt(),
                })
                .collect(),
            None => self
                .coords
                .iter()
                .enumerate()
                .filter_map(|(i, c)| {
                    let d2 = squared_distance(c, &q);
                    (d2 <= r2).then(|| Neighbor {
                        index: i,
                        distance: d2.sqrt(),
                    })
                })
                .collect(),
        };

        sort_neighbors(&mut result);
        result
    }
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_unstable_by(|a, b| {
        (a.distance, a.index)
            .partial_cmp(&(b.distance, b.index))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
