use crate::error::Result;
use crate::flat::FlatKdTree;
use crate::kdtree::KdTree;
use crate::metric::Metric;
use crate::r#type::{Coordinates, PointId};
use crate::select::PivotStrategy;

/// A builder to create a [`KdTree`] or a [`FlatKdTree`].
///
/// ```
/// use kd_index::kdtree::KdTreeBuilder;
/// use kd_index::metric::Euclidean;
/// use kd_index::select::PivotStrategy;
///
/// let mut builder: KdTreeBuilder<[f64; 2], _> =
///     KdTreeBuilder::new(Euclidean, vec![0, 1]).pivot_strategy(PivotStrategy::MedianOfMedians);
/// builder.add([0., 0.]);
/// builder.add([1., 1.]);
/// let id = builder.add([2., 2.]);
/// assert_eq!(id.index(), 2);
///
/// let tree = builder.finish().unwrap();
/// assert_eq!(tree.len(), 3);
/// ```
pub struct KdTreeBuilder<P: Coordinates, M> {
    points: Vec<P>,
    metric: M,
    dimensions: Vec<P::Key>,
    strategy: PivotStrategy,
}

impl<P, M> KdTreeBuilder<P, M>
where
    P: Coordinates,
    P::Key: PartialEq,
    M: Metric<P::Key, P::Num>,
{
    /// Create a new builder for points compared with `metric` and split on `dimensions`.
    pub fn new(metric: M, dimensions: Vec<P::Key>) -> Self {
        Self {
            points: Vec::new(),
            metric,
            dimensions,
            strategy: PivotStrategy::default(),
        }
    }

    /// Choose how the median is selected during construction.
    pub fn pivot_strategy(mut self, strategy: PivotStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reserve room for `additional` more points.
    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points were added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the index.
    ///
    /// This returns the insertion index, which is the [`PointId`] queries report for the point.
    pub fn add(&mut self, point: P) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(point);
        id
    }

    /// Consume this builder, building a node-linked tree ready for queries and updates.
    pub fn finish(self) -> Result<KdTree<P, M>> {
        KdTree::build(self.points, self.metric, self.dimensions, self.strategy)
    }

    /// Consume this builder, building an array-backed tree ready for queries.
    pub fn finish_flat(self) -> Result<FlatKdTree<P, M>> {
        FlatKdTree::build(self.points, self.metric, self.dimensions, self.strategy)
    }
}
