//! Distance metrics for nearest-neighbor queries.
//!
//! A metric compares two points over the dimensions of the tree. The search prunes a subtree
//! with the distance from the query to its node's splitting hyperplane (see [`Projection`]),
//! which is a valid lower bound only for metrics that are separable over the axes. All the
//! metrics here are; a custom metric must be too for searches to stay exact.

use crate::r#type::{Coordinates, IndexableNum};

/// A distance function between two points.
///
/// The metric receives the dimension list of the tree it is used with, so it can walk the same
/// coordinate keys the tree splits on. It must be symmetric and never negative.
pub trait Metric<K, N: IndexableNum> {
    /// Distance between `a` and `b`.
    fn distance<A, B>(&self, dimensions: &[K], a: &A, b: &B) -> f64
    where
        A: Coordinates<Key = K, Num = N> + ?Sized,
        B: Coordinates<Key = K, Num = N> + ?Sized;
}

/// Euclidean (straight-line) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl<K, N: IndexableNum> Metric<K, N> for Euclidean {
    #[inline]
    fn distance<A, B>(&self, dimensions: &[K], a: &A, b: &B) -> f64
    where
        A: Coordinates<Key = K, Num = N> + ?Sized,
        B: Coordinates<Key = K, Num = N> + ?Sized,
    {
        SquaredEuclidean.distance(dimensions, a, b).sqrt()
    }
}

/// Squared Euclidean distance.
///
/// Ranks points the same way as [`Euclidean`] without the square root, so reported distances
/// are squared.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl<K, N: IndexableNum> Metric<K, N> for SquaredEuclidean {
    #[inline]
    fn distance<A, B>(&self, dimensions: &[K], a: &A, b: &B) -> f64
    where
        A: Coordinates<Key = K, Num = N> + ?Sized,
        B: Coordinates<Key = K, Num = N> + ?Sized,
    {
        dimensions
            .iter()
            .map(|key| {
                let d = axis_gap(a.coord(key), b.coord(key));
                d * d
            })
            .sum()
    }
}

/// Manhattan (taxicab) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<K, N: IndexableNum> Metric<K, N> for Manhattan {
    #[inline]
    fn distance<A, B>(&self, dimensions: &[K], a: &A, b: &B) -> f64
    where
        A: Coordinates<Key = K, Num = N> + ?Sized,
        B: Coordinates<Key = K, Num = N> + ?Sized,
    {
        dimensions
            .iter()
            .map(|key| axis_gap(a.coord(key), b.coord(key)))
            .sum()
    }
}

/// Chebyshev (maximum axis gap) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl<K, N: IndexableNum> Metric<K, N> for Chebyshev {
    #[inline]
    fn distance<A, B>(&self, dimensions: &[K], a: &A, b: &B) -> f64
    where
        A: Coordinates<Key = K, Num = N> + ?Sized,
        B: Coordinates<Key = K, Num = N> + ?Sized,
    {
        dimensions
            .iter()
            .map(|key| axis_gap(a.coord(key), b.coord(key)))
            .fold(0.0, f64::max)
    }
}

/// Absolute difference of two coordinates, computed in `f64` so unsigned types can't underflow.
#[inline]
fn axis_gap<N: IndexableNum>(a: N, b: N) -> f64 {
    (a.to_f64().unwrap_or(0.0) - b.to_f64().unwrap_or(0.0)).abs()
}

/// The query projected onto the splitting hyperplane of a node.
///
/// Takes the query's coordinate on the split axis and the node's coordinate on every other
/// axis. The metric distance from this view to the node point is the lower bound used to decide
/// whether the far side of a split can still hold a closer point.
pub struct Projection<'a, Q: ?Sized, P: Coordinates + ?Sized> {
    query: &'a Q,
    point: &'a P,
    axis: &'a P::Key,
}

impl<'a, Q, P> Projection<'a, Q, P>
where
    Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    P: Coordinates + ?Sized,
{
    /// Project `query` onto the hyperplane through `point` orthogonal to `axis`.
    pub fn new(query: &'a Q, point: &'a P, axis: &'a P::Key) -> Self {
        Self { query, point, axis }
    }
}

impl<Q, P> Coordinates for Projection<'_, Q, P>
where
    Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    P: Coordinates + ?Sized,
    P::Key: PartialEq,
{
    type Key = P::Key;
    type Num = P::Num;

    #[inline]
    fn coord(&self, key: &Self::Key) -> Self::Num {
        if key == self.axis {
            self.query.coord(key)
        } else {
            self.point.coord(key)
        }
    }
}

/// Distance from `query` to the splitting hyperplane through `point` on `axis`.
#[inline]
pub(crate) fn orthogonal_distance<M, Q, P>(
    metric: &M,
    dimensions: &[P::Key],
    query: &Q,
    point: &P,
    axis: &P::Key,
) -> f64
where
    M: Metric<P::Key, P::Num>,
    Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    P: Coordinates + ?Sized,
    P::Key: PartialEq,
{
    let projection = Projection::new(query, point, axis);
    metric.distance(dimensions, &projection, point)
}

#[cfg(test)]
mod test {
    use super::*;

    const DIMS: [usize; 3] = [0, 1, 2];

    #[test]
    fn separable_metrics() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 6.0, 3.0];
        assert_eq!(Euclidean.distance(&DIMS, &a, &b), 5.0);
        assert_eq!(SquaredEuclidean.distance(&DIMS, &a, &b), 25.0);
        assert_eq!(Manhattan.distance(&DIMS, &a, &b), 7.0);
        assert_eq!(Chebyshev.distance(&DIMS, &a, &b), 4.0);
    }

    #[test]
    fn unsigned_coordinates_do_not_underflow() {
        let a: [u8; 2] = [1, 10];
        let b: [u8; 2] = [4, 6];
        assert_eq!(Euclidean.distance(&DIMS[..2], &a, &b), 5.0);
    }

    #[test]
    fn only_listed_dimensions_count() {
        let a = [0.0, 0.0, 100.0];
        let b = [3.0, 4.0, -100.0];
        assert_eq!(Euclidean.distance(&DIMS[..2], &a, &b), 5.0);
    }

    #[test]
    fn projection_keeps_query_on_split_axis() {
        let query = [10.0, 20.0, 30.0];
        let point = [1.0, 2.0, 3.0];
        let projection = Projection::new(&query, &point, &1);
        assert_eq!(projection.coord(&0), 1.0);
        assert_eq!(projection.coord(&1), 20.0);
        assert_eq!(projection.coord(&2), 3.0);

        let bound = orthogonal_distance(&Euclidean, &DIMS, &query, &point, &1);
        assert_eq!(bound, 18.0);
    }
}
