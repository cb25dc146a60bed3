// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree arena: structure, insertion, removal, queries.

use alloc::vec::{self, Vec};
use core::fmt::Debug;

use kurbo::Point;
use tracing::{debug, trace};

use crate::reverse::ReverseIndex;
use crate::shapes::{Bounded, Rectangle, overlaps};

/// Capacity of every node created by subdivision.
pub const CHILD_CAPACITY: usize = 4;

/// Handle of a node in a [`QuadTree`].
///
/// Nodes are never freed, so a handle stays valid for the lifetime of the tree it
/// came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node handles are intentionally 32-bit; a tree never holds that many nodes."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Leaves take new items; internal nodes keep what they held at split time and
/// forward everything else to their children.
#[derive(Copy, Clone, Debug)]
enum NodeKind {
    Leaf,
    Internal { children: [NodeId; 4] },
}

#[derive(Clone, Debug)]
struct Node<S> {
    bounds: Rectangle,
    capacity: usize,
    depth: u32,
    items: Vec<S>,
    kind: NodeKind,
}

impl<S> Node<S> {
    fn new(bounds: Rectangle, capacity: usize, depth: u32) -> Self {
        Self {
            bounds,
            capacity,
            depth,
            items: Vec::new(),
            kind: NodeKind::Leaf,
        }
    }
}

/// Region quadtree over [`Bounded`] shapes.
///
/// The tree is a conservative broad-phase filter:
///
/// - A shape is stored in every leaf its bounding box touches, so one inserted shape
///   may be held several times. [`len`][Self::len] counts stored copies.
/// - [`query`][Self::query] returns every item of every node the region touches,
///   without re-checking the items themselves, and may yield the same shape more
///   than once. Callers run their exact test on the results.
/// - Nodes split once their capacity is reached and never merge back. Items held by a
///   node when it splits stay there.
///
/// ## Removal is keyed by center
///
/// Removal goes through a reverse index from center coordinate to the nodes holding a
/// copy. The index cannot tell apart two shapes sharing the exact same center, so
/// [`remove`][Self::remove] drops every stored shape with that center. Give shapes
/// distinct centers, or reinsert the survivors after a removal.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use understory_quadtree::{Circle, QuadTree, Rectangle};
///
/// let bounds = Rectangle::from_center(Point::new(0.0, 0.0), 100.0, 100.0);
/// let mut tree = QuadTree::new(bounds, 4);
/// for _ in 0..5 {
///     tree.insert(Circle::new(Point::new(10.0, 10.0), 0.0));
/// }
///
/// // The fifth point split the root.
/// assert_eq!(tree.node_count(), 5);
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.query(&bounds).count(), 5);
/// ```
pub struct QuadTree<S> {
    nodes: Vec<Node<S>>,
    reverse: ReverseIndex,
}

impl<S> Debug for QuadTree<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.nodes[NodeId::ROOT.idx()].bounds)
            .field("capacity", &self.nodes[NodeId::ROOT.idx()].capacity)
            .field("nodes", &self.nodes.len())
            .field("items", &self.len())
            .field("centers", &self.reverse.len())
            .finish_non_exhaustive()
    }
}

impl<S> QuadTree<S> {
    /// Create a tree covering `bounds`. The root splits once it holds `capacity` items.
    pub fn new(bounds: Rectangle, capacity: usize) -> Self {
        debug_assert!(
            bounds.half_width >= 0.0 && bounds.half_height >= 0.0,
            "quadtree bounds must have non-negative half extents"
        );
        Self {
            nodes: alloc::vec![Node::new(bounds, capacity, 0)],
            reverse: ReverseIndex::default(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Bounds of the root node.
    pub fn bounds(&self) -> Rectangle {
        self.nodes[NodeId::ROOT.idx()].bounds
    }

    /// Capacity of the root node.
    pub fn capacity(&self) -> usize {
        self.nodes[NodeId::ROOT.idx()].capacity
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored item copies across all nodes.
    ///
    /// A shape held by several leaves counts once per leaf.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.items.len()).sum()
    }

    /// Whether no node holds any item.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.items.is_empty())
    }

    /// Remove every item and forget all centers.
    ///
    /// Subdivisions are kept; the emptied nodes are reused by later inserts.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.items.clear();
        }
        self.reverse.clear();
        debug!(nodes = self.nodes.len(), "cleared quadtree");
    }

    /// Nodes currently holding a copy of a shape centered at `center`.
    ///
    /// A node holding several copies with this center is listed once per copy.
    pub fn nodes_containing(&self, center: Point) -> &[NodeId] {
        self.reverse.get(center)
    }

    /// Bounds of `node`, or `None` for a handle from another tree.
    pub fn node_bounds(&self, node: NodeId) -> Option<Rectangle> {
        self.nodes.get(node.idx()).map(|n| n.bounds)
    }

    /// Items stored directly at `node`.
    pub fn node_items(&self, node: NodeId) -> Option<&[S]> {
        self.nodes.get(node.idx()).map(|n| n.items.as_slice())
    }

    /// Children of `node` in visiting order, if it has split.
    pub fn children_of(&self, node: NodeId) -> Option<[NodeId; 4]> {
        match self.nodes.get(node.idx())?.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { children } => Some(children),
        }
    }

    /// Visit every node depth-first, parents before children, calling
    /// `f(node, bounds, depth)`.
    ///
    /// Intended for debug drawing of the partition.
    pub fn visit_nodes<F: FnMut(NodeId, &Rectangle, u32)>(&self, mut f: F) {
        self.visit_nodes_at(NodeId::ROOT, &mut f);
    }

    fn visit_nodes_at<F: FnMut(NodeId, &Rectangle, u32)>(&self, id: NodeId, f: &mut F) {
        let node = &self.nodes[id.idx()];
        f(id, &node.bounds, node.depth);
        if let NodeKind::Internal { children } = node.kind {
            for child in children {
                self.visit_nodes_at(child, f);
            }
        }
    }

    fn subdivide(&mut self, id: NodeId) -> [NodeId; 4] {
        let parent = &self.nodes[id.idx()];
        let quads = parent.bounds.quadrants();
        let depth = parent.depth + 1;

        let first = self.nodes.len();
        self.nodes.extend(
            quads
                .into_iter()
                .map(|bounds| Node::new(bounds, CHILD_CAPACITY, depth)),
        );
        let children = core::array::from_fn(|i| NodeId::new(first + i));
        self.nodes[id.idx()].kind = NodeKind::Internal { children };

        trace!(
            node = id.0,
            depth,
            half_width = quads[0].half_width,
            half_height = quads[0].half_height,
            "subdivided quadtree node"
        );
        children
    }
}

impl<S: Bounded> QuadTree<S> {
    /// Remove every stored copy of shapes centered at `shape.center()`.
    ///
    /// Only the center of `shape` is consulted. Removing a center that is not in the
    /// tree does nothing. Removal swaps the last item of a node into the freed slot,
    /// so per-node item order is not preserved.
    pub fn remove<B: Bounded + ?Sized>(&mut self, shape: &B) {
        let center = shape.center();
        let Some(holders) = self.reverse.take(center) else {
            return;
        };

        let mut removed = 0_usize;
        for id in holders {
            let node = self
                .nodes
                .get_mut(id.idx())
                .expect("quadtree invariant violated: reverse index references missing node");
            if let Some(pos) = node.items.iter().position(|s| s.center() == center) {
                node.items.swap_remove(pos);
                removed += 1;
            }
        }
        trace!(x = center.x, y = center.y, removed, "removed shape copies");
    }

    /// Collect the items of every node whose bounds touch `region`.
    ///
    /// Results come node by node, parents before children. The filter works on node
    /// bounds only: items are returned whether or not they touch `region` themselves.
    pub fn query<B: Bounded + ?Sized>(&self, region: &B) -> vec::IntoIter<&S> {
        let mut out = Vec::new();
        self.visit_query(region, |s| out.push(s));
        out.into_iter()
    }

    /// Visit the items [`query`][Self::query] would return, without allocating.
    pub fn visit_query<'a, B, F>(&'a self, region: &B, mut f: F)
    where
        B: Bounded + ?Sized,
        F: FnMut(&'a S),
    {
        self.visit_query_at(NodeId::ROOT, region, &mut f);
    }

    fn visit_query_at<'a, B, F>(&'a self, id: NodeId, region: &B, f: &mut F)
    where
        B: Bounded + ?Sized,
        F: FnMut(&'a S),
    {
        let node = &self.nodes[id.idx()];
        if !overlaps(&node.bounds, region) {
            return;
        }
        for item in &node.items {
            f(item);
        }
        if let NodeKind::Internal { children } = node.kind {
            for child in children {
                self.visit_query_at(child, region, f);
            }
        }
    }
}

impl<S: Bounded + Clone> QuadTree<S> {
    /// Insert `shape` into every node it reaches.
    ///
    /// A leaf with room keeps a copy. A full leaf splits into four children and the
    /// shape is offered to all of them, so a shape straddling quadrant borders ends up
    /// in each leaf it touches. Shapes outside the root bounds are ignored.
    pub fn insert(&mut self, shape: S) {
        self.insert_at(NodeId::ROOT, &shape);
    }

    fn insert_at(&mut self, id: NodeId, shape: &S) {
        let node = &mut self.nodes[id.idx()];
        if !overlaps(&node.bounds, shape) {
            return;
        }
        let children = match node.kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf if node.items.len() < node.capacity => {
                node.items.push(shape.clone());
                self.reverse.register(shape.center(), id);
                return;
            }
            NodeKind::Leaf => self.subdivide(id),
        };
        for child in children {
            self.insert_at(child, shape);
        }
    }
}
