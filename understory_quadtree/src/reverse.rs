// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root-owned map from a shape center to the nodes holding a copy of it.

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::tree::NodeId;

/// Nodes registered for one center. Most shapes live in one to four leaves.
pub(crate) type Holders = SmallVec<[NodeId; 4]>;

/// Hashable form of a center coordinate.
///
/// Keys compare like `f64 ==` on finite values: `-0.0` and `0.0` map to the same key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct CenterKey(u64, u64);

impl CenterKey {
    fn new(center: Point) -> Self {
        debug_assert!(
            !center.x.is_nan() && !center.y.is_nan(),
            "quadtree centers must not be NaN"
        );
        Self(canonical_bits(center.x), canonical_bits(center.y))
    }
}

#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

/// Reverse index from center coordinate to holding nodes.
///
/// A node is listed once per stored copy, so a node holding two shapes with the same
/// center appears twice.
#[derive(Debug, Default)]
pub(crate) struct ReverseIndex {
    holders: HashMap<CenterKey, Holders>,
}

impl ReverseIndex {
    pub(crate) fn register(&mut self, center: Point, node: NodeId) {
        self.holders
            .entry(CenterKey::new(center))
            .or_default()
            .push(node);
    }

    pub(crate) fn get(&self, center: Point) -> &[NodeId] {
        self.holders
            .get(&CenterKey::new(center))
            .map(|h| h.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the entry for `center` entirely and hand back its holders.
    pub(crate) fn take(&mut self, center: Point) -> Option<Holders> {
        self.holders.remove(&CenterKey::new(center))
    }

    pub(crate) fn clear(&mut self) {
        self.holders.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.holders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_shares_a_key() {
        let mut idx = ReverseIndex::default();
        idx.register(Point::new(0.0, -0.0), NodeId::ROOT);
        assert_eq!(idx.get(Point::new(-0.0, 0.0)), &[NodeId::ROOT]);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn repeated_registration_keeps_one_entry_per_copy() {
        let mut idx = ReverseIndex::default();
        let c = Point::new(3.5, -7.25);
        idx.register(c, NodeId::ROOT);
        idx.register(c, NodeId::ROOT);
        assert_eq!(idx.get(c).len(), 2);

        let taken = idx.take(c).unwrap();
        assert_eq!(taken.len(), 2);
        assert!(idx.get(c).is_empty());
        assert!(idx.take(c).is_none());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut idx = ReverseIndex::default();
        idx.register(Point::new(1.0, 1.0), NodeId::ROOT);
        idx.register(Point::new(2.0, 2.0), NodeId::ROOT);
        idx.clear();
        assert_eq!(idx.len(), 0);
        assert!(idx.get(Point::new(1.0, 1.0)).is_empty());
    }
}
