use crate::error::{KdIndexError, Result};
use crate::indices::{Indices, MutableIndices};
use crate::metric::Metric;
use crate::r#type::{Coordinates, PointId};
use crate::select::{select_with, PivotStrategy, Selectable};

/// Ranges shorter than this are sorted on the current thread.
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 4096;

/// A k-d tree laid out in a single array.
///
/// Within every range `[left, right)` the point at `(left + right) / 2` splits the range on the
/// key for its depth: points before it compare `<=` on that key and points after it `>=`.
#[derive(Debug, Clone)]
pub struct FlatKdTree<P: Coordinates, M> {
    pub(crate) points: Vec<P>,
    pub(crate) ids: Indices,
    pub(crate) metric: M,
    pub(crate) dimensions: Vec<P::Key>,
}

impl<P, M> FlatKdTree<P, M>
where
    P: Coordinates,
    M: Metric<P::Key, P::Num>,
{
    /// Arrange `points` into a tree. Each point gets the [`PointId`] of its position in `points`.
    pub fn new(points: Vec<P>, metric: M, dimensions: Vec<P::Key>) -> Result<Self> {
        Self::build(points, metric, dimensions, PivotStrategy::default())
    }

    pub(crate) fn build(
        mut points: Vec<P>,
        metric: M,
        dimensions: Vec<P::Key>,
        strategy: PivotStrategy,
    ) -> Result<Self> {
        let mut ids = Self::prepare(&points, &dimensions)?;
        sort(&mut points, ids.view_mut(), &dimensions, 0, strategy);
        Ok(Self::finish(points, ids, metric, dimensions))
    }

    /// Like [`FlatKdTree::new`], sorting independent subtrees on the rayon thread pool.
    #[cfg(feature = "rayon")]
    pub fn new_parallel(points: Vec<P>, metric: M, dimensions: Vec<P::Key>) -> Result<Self>
    where
        P: Send,
        P::Key: Sync,
    {
        let mut points = points;
        let mut ids = Self::prepare(&points, &dimensions)?;
        par_sort(
            &mut points,
            ids.view_mut(),
            &dimensions,
            0,
            PivotStrategy::default(),
        );
        Ok(Self::finish(points, ids, metric, dimensions))
    }

    fn prepare(points: &[P], dimensions: &[P::Key]) -> Result<Indices> {
        if dimensions.is_empty() {
            return Err(KdIndexError::EmptyDimensions);
        }
        let count = points.len();
        u32::try_from(count).map_err(|_| KdIndexError::TooManyItems { count })?;
        Ok(Indices::sequential(count))
    }

    fn finish(points: Vec<P>, ids: Indices, metric: M, dimensions: Vec<P::Key>) -> Self {
        log::debug!(
            "built flat kd-tree with {} points over {} dimensions using {}-byte ids",
            points.len(),
            dimensions.len(),
            ids.bytes_per_element()
        );
        Self {
            points,
            ids,
            metric,
            dimensions,
        }
    }

    /// The coordinate keys the tree splits on, in depth order.
    pub fn dimensions(&self) -> &[P::Key] {
        &self.dimensions
    }

    /// The metric used by nearest-neighbor queries.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The points in tree order.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// The id of each point in [`FlatKdTree::points`].
    pub fn ids(&self) -> &Indices {
        &self.ids
    }

    /// Iterate over all points and their ids in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &P)> {
        self.ids.iter().zip(self.points.iter())
    }

    /// Give up the tree, returning the points in tree order alongside their ids.
    pub fn into_inner(self) -> (Vec<P>, Indices) {
        (self.points, self.ids)
    }
}

/// Points and their ids, swapped in lockstep and ordered by one key.
struct ByAxisWithIds<'a, 'b, P: Coordinates> {
    points: &'a mut [P],
    ids: &'a mut MutableIndices<'b>,
    axis: &'a P::Key,
}

impl<P: Coordinates> Selectable for ByAxisWithIds<'_, '_, P> {
    type Value = P::Num;

    #[inline]
    fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn value(&self, index: usize) -> P::Num {
        self.points[index].coord(self.axis)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.points.swap(a, b);
        self.ids.swap(a, b);
    }
}

type Half<'a, P> = (&'a mut [P], MutableIndices<'a>);

/// Select the median of the range on `axis` and hand back the ranges on either side of it.
fn split_at_median<'a, P: Coordinates>(
    points: &'a mut [P],
    mut ids: MutableIndices<'a>,
    axis: &P::Key,
    strategy: PivotStrategy,
) -> (Half<'a, P>, Half<'a, P>) {
    let len = points.len();
    let mid = len >> 1;
    let mut buf = ByAxisWithIds {
        points: &mut *points,
        ids: &mut ids,
        axis,
    };
    select_with(&mut buf, 0, len, mid, strategy);

    let (left_points, rest) = points.split_at_mut(mid);
    let (left_ids, rest_ids) = ids.split_at(mid);
    let (_, right_ids) = rest_ids.split_at(1);
    ((left_points, left_ids), (&mut rest[1..], right_ids))
}

fn sort<P: Coordinates>(
    points: &mut [P],
    ids: MutableIndices<'_>,
    dimensions: &[P::Key],
    depth: usize,
    strategy: PivotStrategy,
) {
    if points.len() <= 1 {
        return;
    }
    let axis = &dimensions[depth % dimensions.len()];
    let ((left_points, left_ids), (right_points, right_ids)) =
        split_at_median(points, ids, axis, strategy);
    sort(left_points, left_ids, dimensions, depth + 1, strategy);
    sort(right_points, right_ids, dimensions, depth + 1, strategy);
}

#[cfg(feature = "rayon")]
fn par_sort<P>(
    points: &mut [P],
    ids: MutableIndices<'_>,
    dimensions: &[P::Key],
    depth: usize,
    strategy: PivotStrategy,
) where
    P: Coordinates + Send,
    P::Key: Sync,
{
    if points.len() < PARALLEL_THRESHOLD {
        return sort(points, ids, dimensions, depth, strategy);
    }
    let axis = &dimensions[depth % dimensions.len()];
    let ((left_points, left_ids), (right_points, right_ids)) =
        split_at_median(points, ids, axis, strategy);
    rayon::join(
        || par_sort(left_points, left_ids, dimensions, depth + 1, strategy),
        || par_sort(right_points, right_ids, dimensions, depth + 1, strategy),
    );
}
