use crate::r#type::PointId;

/// Position of a node in the tree's arena.
pub(crate) type NodeId = usize;

/// Which child slot of its parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A node of the tree.
///
/// Children are owned through the arena; `parent` is a plain back-reference and is `None` only
/// for the root.
#[derive(Debug, Clone)]
pub(crate) struct Node<P> {
    pub(crate) id: PointId,
    pub(crate) point: P,
    /// Index into the tree's dimensions of the key this node splits on.
    pub(crate) axis: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<P> Node<P> {
    pub(crate) fn leaf(id: PointId, point: P, axis: usize, parent: Option<NodeId>) -> Self {
        Self {
            id,
            point,
            axis,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn point(&self) -> &P {
        &self.point
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// The side `child` hangs on. `child` must be a child of this node.
    #[inline]
    pub(crate) fn side_of(&self, child: NodeId) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right, Some(child));
            Side::Right
        }
    }
}
