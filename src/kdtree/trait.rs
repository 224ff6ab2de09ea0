use tinyvec::TinyVec;

use crate::kdtree::node::NodeId;
use crate::kdtree::KdTree;
use crate::metric::{orthogonal_distance, Metric};
use crate::neighbors::{Candidates, Neighbor};
use crate::r#trait::KdIndex;
use crate::r#type::Coordinates;

/// One step of the depth-first search: either a node to visit, or a node whose near side has
/// been searched and which is now saved and has its far side considered.
#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    node: NodeId,
    resume: bool,
    far: Option<NodeId>,
    distance: f64,
    bound: f64,
}

impl Frame {
    fn visit(node: NodeId) -> Self {
        Self {
            node,
            ..Default::default()
        }
    }
}

impl<P, M> KdIndex for KdTree<P, M>
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
        self.nodes.len()
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
        let Some(root) = self.root else {
            return vec![];
        };
        if max_nodes == 0 {
            return vec![];
        }

        let dimensions = self.dimensions.as_slice();
        let mut best = Candidates::new(max_nodes, max_distance);

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[Frame; 32]> = TinyVec::new();
        stack.push(Frame::visit(root));

        while let Some(frame) = stack.pop() {
            if frame.resume {
                best.offer(frame.node, frame.distance);
                if let Some(far) = frame.far {
                    if best.admits(frame.bound) {
                        stack.push(Frame::visit(far));
                    }
                }
                continue;
            }

            let node = &self.nodes[frame.node];
            let distance = self.metric.distance(dimensions, query, &node.point);

            let (near, far) = match (node.left, node.right) {
                (None, None) => {
                    best.offer(frame.node, distance);
                    continue;
                }
                (Some(left), None) => (left, None),
                (None, Some(right)) => (right, None),
                (Some(left), Some(right)) => {
                    let key = &dimensions[node.axis];
                    if query.coord(key) < node.point.coord(key) {
                        (left, Some(right))
                    } else {
                        (right, Some(left))
                    }
                }
            };
            let bound = orthogonal_distance(
                &self.metric,
                dimensions,
                query,
                &node.point,
                &dimensions[node.axis],
            );

            // Note: these are pushed in backwards order to what gets popped
            stack.push(Frame {
                node: frame.node,
                resume: true,
                far,
                distance,
                bound,
            });
            stack.push(Frame::visit(near));
        }

        best.into_targets()
            .map(|(index, distance)| {
                let node = &self.nodes[index];
                Neighbor {
                    id: node.id,
                    point: &node.point,
                    distance,
                }
            })
            .collect()
    }
}
