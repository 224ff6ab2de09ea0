//! Utilities to traverse the KdTree structure.

use crate::kdtree::node::{Node, NodeId};
use crate::kdtree::KdTree;
use crate::r#type::{Coordinates, PointId};

/// A read-only handle on one node of a [`KdTree`].
pub struct NodeRef<'a, P: Coordinates, M> {
    /// The tree that this node is a reference onto
    tree: &'a KdTree<P, M>,
    node: NodeId,
}

impl<P: Coordinates, M> Clone for NodeRef<'_, P, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Coordinates, M> Copy for NodeRef<'_, P, M> {}

impl<'a, P: Coordinates, M> NodeRef<'a, P, M> {
    pub(crate) fn new(tree: &'a KdTree<P, M>, node: NodeId) -> Self {
        Self { tree, node }
    }

    #[inline]
    fn get(&self) -> &'a Node<P> {
        &self.tree.nodes[self.node]
    }

    fn at(&self, node: Option<NodeId>) -> Option<NodeRef<'a, P, M>> {
        node.map(|node| NodeRef::new(self.tree, node))
    }

    /// The point stored at this node.
    pub fn point(&self) -> &'a P {
        &self.get().point
    }

    /// The identity of the point stored at this node.
    pub fn id(&self) -> PointId {
        self.get().id
    }

    /// Index into the tree's dimensions of the key this node splits on.
    pub fn axis(&self) -> usize {
        self.get().axis
    }

    /// The key this node splits on.
    pub fn axis_key(&self) -> &'a P::Key {
        &self.tree.dimensions[self.get().axis]
    }

    /// The child holding points with a smaller coordinate on this node's axis.
    pub fn left(&self) -> Option<NodeRef<'a, P, M>> {
        self.at(self.get().left)
    }

    /// The child holding points with an equal or larger coordinate on this node's axis.
    pub fn right(&self) -> Option<NodeRef<'a, P, M>> {
        self.at(self.get().right)
    }

    /// The parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, P, M>> {
        self.at(self.get().parent)
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.get().is_leaf()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns `true` if both handles point at the same node of the same tree.
    pub fn same_node(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}
