use tinyvec::TinyVec;

use crate::flat::FlatKdTree;
use crate::metric::{orthogonal_distance, Metric};
use crate::neighbors::{Candidates, Neighbor};
use crate::r#trait::KdIndex;
use crate::r#type::Coordinates;

/// A half-open range of the point array still to be searched, or, with `resume` set, a range
/// whose near half has been searched and whose split point and far half are pending.
#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    left: usize,
    right: usize,
    depth: usize,
    resume: bool,
    far: (usize, usize),
    distance: f64,
    bound: f64,
}

impl Frame {
    fn visit(left: usize, right: usize, depth: usize) -> Self {
        Self {
            left,
            right,
            depth,
            ..Default::default()
        }
    }
}

impl<P, M> KdIndex for FlatKdTree<P, M>
where
    P: Coordinates,
    P::Key: PartialEq,
    M: Metric<P::Key, P::Num>,
{
    type Point = P;

    fn dimensions(&self) -> &[P::Key] {
        &self.dimensions
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest<Q>(
        &self,
        query: &Q,
        max_nodes: usize,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor<'_, P>>
    where
        Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    {
        if self.points.is_empty() || max_nodes == 0 {
            return vec![];
        }

        let dimensions = self.dimensions.as_slice();
        let mut best = Candidates::new(max_nodes, max_distance);

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[Frame; 32]> = TinyVec::new();
        stack.push(Frame::visit(0, self.points.len(), 0));

        while let Some(frame) = stack.pop() {
            let mid = (frame.left + frame.right) >> 1;
            if frame.resume {
                best.offer(mid, frame.distance);
                let (left, right) = frame.far;
                if left < right && best.admits(frame.bound) {
                    stack.push(Frame::visit(left, right, frame.depth + 1));
                }
                continue;
            }

            let point = &self.points[mid];
            let distance = self.metric.distance(dimensions, query, point);
            if frame.right - frame.left == 1 {
                best.offer(mid, distance);
                continue;
            }

            // A range of two or more always has a non-empty lower half.
            let axis = &dimensions[frame.depth % dimensions.len()];
            let lower = (frame.left, mid);
            let upper = (mid + 1, frame.right);
            let (near, far) = if upper.0 == upper.1 || query.coord(axis) < point.coord(axis) {
                (lower, upper)
            } else {
                (upper, lower)
            };
            let bound = orthogonal_distance(&self.metric, dimensions, query, point, axis);

            // Note: these are pushed in backwards order to what gets popped
            stack.push(Frame {
                resume: true,
                far,
                distance,
                bound,
                ..frame
            });
            stack.push(Frame::visit(near.0, near.1, frame.depth + 1));
        }

        best.into_targets()
            .map(|(index, distance)| Neighbor {
                id: self.ids.get(index),
                point: &self.points[index],
                distance,
            })
            .collect()
    }
}
