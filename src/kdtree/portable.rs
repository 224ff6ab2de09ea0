//! Export to and import from a plain nested node structure.
//!
//! A [`PortableNode`] hierarchy carries no parent links, so it can be handed to any serializer
//! (with the `serde` feature) and loaded back later. Loading restores the parent links in one
//! top-down pass.

use std::collections::HashSet;

use crate::error::{KdIndexError, Result};
use crate::kdtree::node::{Node, NodeId, Side};
use crate::kdtree::KdTree;
use crate::metric::Metric;
use crate::r#type::{Coordinates, PointId};

/// A node of an exported tree, owning its subtrees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortableNode<P> {
    /// The stored point.
    pub point: P,
    /// The identity of the stored point.
    pub id: PointId,
    /// Index into the tree's dimensions of the key this node splits on.
    pub axis: usize,
    /// Subtree of points smaller on `axis`.
    pub left: Option<Box<PortableNode<P>>>,
    /// Subtree of points equal or larger on `axis`.
    pub right: Option<Box<PortableNode<P>>>,
}

impl<P> PortableNode<P> {
    /// A node without children.
    pub fn leaf(point: P, id: PointId, axis: usize) -> Self {
        Self {
            point,
            id,
            axis,
            left: None,
            right: None,
        }
    }
}

impl<P, M> KdTree<P, M>
where
    P: Coordinates,
    P::Key: PartialEq,
    M: Metric<P::Key, P::Num>,
{
    /// Load a tree from a previously exported (or externally built) node hierarchy.
    ///
    /// The hierarchy is taken as is; it is not rebalanced or checked against the split
    /// invariant. Every node's axis must index into `dimensions`, and ids must be unique and
    /// below `u32::MAX`. Later insertions get ids after the largest loaded one.
    pub fn from_portable(
        root: Option<PortableNode<P>>,
        metric: M,
        dimensions: Vec<P::Key>,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(KdIndexError::EmptyDimensions);
        }

        let mut nodes: Vec<Node<P>> = Vec::new();
        let mut next_id = 0u32;
        let mut seen = HashSet::new();
        let mut stack: Vec<(PortableNode<P>, Option<(NodeId, Side)>)> = Vec::new();
        if let Some(root) = root {
            stack.push((root, None));
        }

        while let Some((portable, parent)) = stack.pop() {
            let PortableNode {
                point,
                id,
                axis,
                left,
                right,
            } = portable;
            if axis >= dimensions.len() {
                return Err(KdIndexError::InvalidAxis {
                    axis,
                    dimensions: dimensions.len(),
                });
            }

            if !seen.insert(id) {
                return Err(KdIndexError::DuplicateId { id: id.0 });
            }
            let following = id
                .0
                .checked_add(1)
                .ok_or(KdIndexError::ReservedId { id: id.0 })?;

            let slot = nodes.len();
            nodes.push(Node::leaf(id, point, axis, parent.map(|(parent, _)| parent)));
            if let Some((parent, side)) = parent {
                nodes[parent].set_child(side, Some(slot));
            }
            next_id = next_id.max(following);

            if let Some(right) = right {
                stack.push((*right, Some((slot, Side::Right))));
            }
            if let Some(left) = left {
                stack.push((*left, Some((slot, Side::Left))));
            }
        }

        let root = if nodes.is_empty() { None } else { Some(0) };
        log::debug!(
            "loaded kd-tree with {} points over {} dimensions",
            nodes.len(),
            dimensions.len()
        );
        Ok(Self {
            nodes,
            root,
            metric,
            dimensions,
            next_id,
        })
    }

    /// Deep copy of the node hierarchy without parent links, or `None` for an empty tree.
    pub fn to_portable(&self) -> Option<PortableNode<P>>
    where
        P: Clone,
    {
        let root = self.root?;

        // Children come after their parent in preorder, so building in reverse preorder always
        // finds both subtrees finished.
        let mut preorder = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            preorder.push(index);
            let node = &self.nodes[index];
            stack.extend([node.right, node.left].into_iter().flatten());
        }

        let mut built: Vec<Option<PortableNode<P>>> = self.nodes.iter().map(|_| None).collect();
        for &index in preorder.iter().rev() {
            let node = &self.nodes[index];
            let mut take = |child: Option<NodeId>| {
                child
                    .and_then(|child| built[child].take())
                    .map(Box::new)
            };
            let left = take(node.left);
            let right = take(node.right);
            built[index] = Some(PortableNode {
                point: node.point.clone(),
                id: node.id,
                axis: node.axis,
                left,
                right,
            });
        }
        built[root].take()
    }
}
