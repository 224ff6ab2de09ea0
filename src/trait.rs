use geo_traits::CoordTrait;

use crate::neighbors::Neighbor;
use crate::r#type::{Coord, Coordinates};

/// Key type of the points in an index.
pub type KeyOf<I> = <<I as KdIndex>::Point as Coordinates>::Key;

/// Coordinate type of the points in an index.
pub type NumOf<I> = <<I as KdIndex>::Point as Coordinates>::Num;

/// Nearest-neighbor search shared by [`KdTree`][crate::kdtree::KdTree] and
/// [`FlatKdTree`][crate::flat::FlatKdTree].
pub trait KdIndex: Sized {
    /// The stored point type.
    type Point: Coordinates;

    /// The coordinate keys the index splits on, in depth order.
    fn dimensions(&self) -> &[KeyOf<Self>];

    /// The number of points in the index.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find up to `max_nodes` points closest to `query`.
    ///
    /// With `max_distance`, only points strictly closer than it are returned. Results come back
    /// in no particular order; use [`sort_by_distance`][crate::neighbors::sort_by_distance] when
    /// ranking matters.
    ///
    /// ```
    /// use kd_index::kdtree::KdTree;
    /// use kd_index::metric::Euclidean;
    /// use kd_index::KdIndex;
    ///
    /// let points = vec![[1.0, 2.0], [3.0, 4.0], [5.0, 1.0]];
    /// let tree = KdTree::new(points, Euclidean, vec![0, 1]).unwrap();
    ///
    /// let result = tree.nearest(&[4.0, 1.0], 1, None);
    /// assert_eq!(result.len(), 1);
    /// assert_eq!(*result[0].point, [5.0, 1.0]);
    /// assert_eq!(result[0].distance, 1.0);
    /// ```
    fn nearest<Q>(
        &self,
        query: &Q,
        max_nodes: usize,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor<'_, Self::Point>>
    where
        Q: Coordinates<Key = KeyOf<Self>, Num = NumOf<Self>> + ?Sized;

    /// Find up to `max_nodes` points closest to a 2D coordinate.
    ///
    /// Only for indexes whose points are keyed by position, where `0` is x and `1` is y.
    fn nearest_coord(
        &self,
        coord: &impl CoordTrait<T = NumOf<Self>>,
        max_nodes: usize,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor<'_, Self::Point>>
    where
        Self::Point: Coordinates<Key = usize>,
    {
        self.nearest(&Coord::from_coord(coord), max_nodes, max_distance)
    }
}
