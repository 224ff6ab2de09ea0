use crate::error::{KdIndexError, Result};
use crate::kdtree::node::{Node, NodeId, Side};
use crate::kdtree::traversal::NodeRef;
use crate::metric::Metric;
use crate::r#type::{Coordinates, PointId};
use crate::select::{select_with, ByAxis, PivotStrategy, Selectable};

/// A k-d tree of linked nodes supporting insertion and removal.
///
/// Nodes live in one arena; each node owns its children through arena indices and keeps a
/// back-reference to its parent. A node splitting on key `a` has only points with a smaller
/// coordinate on `a` to its left, and only points with an equal or larger one to its right.
///
/// Usually this will be created with [`KdTree::new`] or a
/// [`KdTreeBuilder`][crate::kdtree::KdTreeBuilder].
#[derive(Debug, Clone)]
pub struct KdTree<P: Coordinates, M> {
    pub(crate) nodes: Vec<Node<P>>,
    pub(crate) root: Option<NodeId>,
    pub(crate) metric: M,
    pub(crate) dimensions: Vec<P::Key>,
    pub(crate) next_id: u32,
}

impl<P, M> KdTree<P, M>
where
    P: Coordinates,
    P::Key: PartialEq,
    M: Metric<P::Key, P::Num>,
{
    /// Build a balanced tree over `points`.
    ///
    /// The split key at depth `d` is `dimensions[d % dimensions.len()]`. Each point gets the
    /// [`PointId`] of its position in `points`.
    pub fn new(points: Vec<P>, metric: M, dimensions: Vec<P::Key>) -> Result<Self> {
        Self::build(points, metric, dimensions, PivotStrategy::default())
    }

    pub(crate) fn build(
        points: Vec<P>,
        metric: M,
        dimensions: Vec<P::Key>,
        strategy: PivotStrategy,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(KdIndexError::EmptyDimensions);
        }
        let count = points.len();
        let next_id = u32::try_from(count).map_err(|_| KdIndexError::TooManyItems { count })?;

        let mut nodes: Vec<Node<P>> = points
            .into_iter()
            .enumerate()
            .map(|(i, point)| Node::leaf(PointId(i as u32), point, 0, None))
            .collect();
        let root = link_balanced(&mut nodes, &dimensions, strategy);

        let tree = Self {
            nodes,
            root,
            metric,
            dimensions,
            next_id,
        };
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "built kd-tree with {} points over {} dimensions, height {}",
                tree.len(),
                tree.dimensions.len(),
                tree.height()
            );
        }
        Ok(tree)
    }

    /// The coordinate keys the tree splits on, in depth order.
    pub fn dimensions(&self) -> &[P::Key] {
        &self.dimensions
    }

    /// The metric used by nearest-neighbor queries.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Iterate over all points and their ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &P)> {
        self.nodes.iter().map(|node| (node.id, &node.point))
    }

    /// The point stored with `id`, if any. This scans every node.
    pub fn get(&self, id: PointId) -> Option<&P> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| &node.point)
    }

    /// The root node for manual traversal, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, P, M>> {
        self.root.map(|node| NodeRef::new(self, node))
    }

    /// Add a point below the leaf its coordinates lead to. Returns the id of the new point.
    ///
    /// The tree is not rebalanced; see [`KdTree::balance_factor`]. Fails with
    /// [`KdIndexError::IdsExhausted`] once every id below `u32::MAX` is taken.
    pub fn insert(&mut self, point: P) -> Result<PointId> {
        let id = PointId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(KdIndexError::IdsExhausted)?;

        let Some(mut current) = self.root else {
            self.nodes.push(Node::leaf(id, point, 0, None));
            self.root = Some(self.nodes.len() - 1);
            log::trace!("inserted {id:?} as root");
            return Ok(id);
        };

        let side = loop {
            let node = &self.nodes[current];
            let key = &self.dimensions[node.axis];
            let side = if point.coord(key) < node.point.coord(key) {
                Side::Left
            } else {
                Side::Right
            };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };

        let axis = (self.nodes[current].axis + 1) % self.dimensions.len();
        let slot = self.nodes.len();
        self.nodes.push(Node::leaf(id, point, axis, Some(current)));
        self.nodes[current].set_child(side, Some(slot));
        log::trace!("inserted {id:?} below node {current}");
        Ok(id)
    }

    /// Remove the point with identity `id`, found by descending along `point`'s coordinates.
    ///
    /// `point` only guides the descent and must have the coordinates the point was stored with;
    /// the match itself is by `id`, so coincident points are told apart. Returns the removed
    /// point, or `None` if no such point is stored, in which case the tree is unchanged.
    pub fn remove<Q>(&mut self, id: PointId, point: &Q) -> Option<P>
    where
        Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    {
        let target = self.find(id, point)?;

        // Pull replacement payloads up the tree until the point to drop sits in a leaf.
        let mut current = target;
        loop {
            let node = &self.nodes[current];
            let axis = node.axis;
            let donor = match (node.left, node.right) {
                (None, None) => break,
                (_, Some(right)) => self.find_min(right, axis),
                (Some(left), None) => {
                    let node = &mut self.nodes[current];
                    node.right = Some(left);
                    node.left = None;
                    self.find_min(left, axis)
                }
            };
            self.swap_payload(current, donor);
            current = donor;
        }

        match self.nodes[current].parent {
            Some(parent) => {
                let side = self.nodes[parent].side_of(current);
                self.nodes[parent].set_child(side, None);
            }
            None => self.root = None,
        }
        let removed = self.release(current);
        debug_assert_eq!(removed.id, id);
        log::trace!("removed {id:?}");
        Some(removed.point)
    }

    /// Height of the tree: the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> =
            self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[node];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// `height / log2(len)`: close to 1 for a balanced tree, growing as insertions skew it.
    ///
    /// A single-point tree divides by `log2(1) = 0` and yields infinity; the empty tree yields a
    /// meaningless value as well. Neither case is trapped.
    pub fn balance_factor(&self) -> f64 {
        self.height() as f64 / (self.len() as f64).log2()
    }

    /// Locate the node holding `id` by descending along `point`.
    fn find<Q>(&self, id: PointId, point: &Q) -> Option<NodeId>
    where
        Q: Coordinates<Key = P::Key, Num = P::Num> + ?Sized,
    {
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            if node.id == id {
                return Some(index);
            }
            let key = &self.dimensions[node.axis];
            current = if point.coord(key) < node.point.coord(key) {
                node.left
            } else {
                node.right
            };
        }
        None
    }

    /// The node with the smallest coordinate on `axis` in the subtree rooted at `node`.
    ///
    /// Where the subtree splits on `axis` only its left side can hold the minimum; elsewhere both
    /// sides and the node itself are compared.
    fn find_min(&self, node: NodeId, axis: usize) -> NodeId {
        let key = &self.dimensions[axis];
        let mut min = node;
        let mut stack = vec![node];
        while let Some(index) = stack.pop() {
            let current = &self.nodes[index];
            if current.axis == axis {
                if let Some(left) = current.left {
                    stack.push(left);
                    continue;
                }
            } else {
                stack.extend([current.left, current.right].into_iter().flatten());
            }
            if current.point.coord(key) < self.nodes[min].point.coord(key) {
                min = index;
            }
        }
        min
    }

    /// Exchange the points (and their ids) stored at two distinct nodes.
    fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b);
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.nodes.split_at_mut(high);
        let (x, y) = (&mut head[low], &mut tail[0]);
        std::mem::swap(&mut x.point, &mut y.point);
        std::mem::swap(&mut x.id, &mut y.id);
    }

    /// Drop an unlinked node from the arena, re-pointing the links of the node moved into its
    /// slot.
    fn release(&mut self, slot: NodeId) -> Node<P> {
        let removed = self.nodes.swap_remove(slot);
        let moved_from = self.nodes.len();
        if slot == moved_from {
            return removed;
        }

        let (parent, left, right) = {
            let moved = &self.nodes[slot];
            (moved.parent, moved.left, moved.right)
        };
        match parent {
            Some(parent) => {
                let side = self.nodes[parent].side_of(moved_from);
                self.nodes[parent].set_child(side, Some(slot));
            }
            None => self.root = Some(slot),
        }
        for child in [left, right].into_iter().flatten() {
            self.nodes[child].parent = Some(slot);
        }
        removed
    }
}

struct Pending {
    left: usize,
    right: usize,
    depth: usize,
    parent: Option<(NodeId, Side)>,
}

/// Arrange `nodes` into a balanced tree in place and link it. Each range's split node stays at
/// its position, so arena indices are positions. Returns the root.
fn link_balanced<P>(
    nodes: &mut [Node<P>],
    dimensions: &[P::Key],
    strategy: PivotStrategy,
) -> Option<NodeId>
where
    P: Coordinates,
{
    let mut root = None;
    let mut stack = vec![Pending {
        left: 0,
        right: nodes.len(),
        depth: 0,
        parent: None,
    }];

    while let Some(Pending {
        left,
        right,
        depth,
        parent,
    }) = stack.pop()
    {
        if left == right {
            continue;
        }
        let axis = depth % dimensions.len();
        let split = if right - left == 1 {
            left
        } else {
            let mid = (left + right) >> 1;
            let mut buf = ByAxis::new(nodes, &dimensions[axis], Node::point);
            select_with(&mut buf, left, right, mid, strategy);
            first_of_ties(&mut buf, left, mid)
        };

        let node = &mut nodes[split];
        node.axis = axis;
        node.parent = parent.map(|(parent, _)| parent);
        match parent {
            Some((parent, side)) => nodes[parent].set_child(side, Some(split)),
            None => root = Some(split),
        }

        stack.push(Pending {
            left: split + 1,
            right,
            depth: depth + 1,
            parent: Some((split, Side::Right)),
        });
        stack.push(Pending {
            left,
            right: split,
            depth: depth + 1,
            parent: Some((split, Side::Left)),
        });
    }
    root
}

/// Move the selected element at `mid` to the first position holding its value, so the left
/// side keeps only strictly smaller values. Everything in `[left, mid)` must be `<=` it.
fn first_of_ties<S: Selectable + ?Sized>(buf: &mut S, left: usize, mid: usize) -> usize {
    let value = buf.value(mid);
    let mut store = left;
    for i in left..mid {
        if buf.value(i) < value {
            buf.swap(store, i);
            store += 1;
        }
    }
    if store < mid {
        buf.swap(store, mid);
    }
    store
}
