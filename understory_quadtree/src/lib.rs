// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a region quadtree for broad-phase 2D queries.
//!
//! Understory Quadtree indexes a dynamic set of bounded shapes so that proximity and
//! collision candidates can be found without testing every pair.
//!
//! - Insert shapes implementing [`Bounded`]; full nodes split into four quarters.
//! - Remove shapes in time proportional to the number of stored copies, through a
//!   reverse index from center coordinate to holding nodes.
//! - Query with any [`Bounded`] region and get back a conservative candidate set.
//!
//! Geometry comes from [`kurbo`]: centers are [`kurbo::Point`]s and plain
//! [`kurbo::Rect`]s can be used as query regions.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_quadtree::{Circle, QuadTree, Rectangle};
//!
//! let world = Rectangle::from_center(Point::new(0.0, 0.0), 100.0, 100.0);
//! let mut tree = QuadTree::new(world, 4);
//! tree.insert(Circle::new(Point::new(10.0, 10.0), 2.0));
//! tree.insert(Circle::new(Point::new(-60.0, 40.0), 5.0));
//!
//! // Broad phase, then the exact test.
//! let probe = Circle::new(Point::new(12.0, 11.0), 1.0);
//! let hits: Vec<_> = tree
//!     .query(&probe)
//!     .filter(|c| c.intersects_circle(&probe))
//!     .collect();
//! assert_eq!(hits.len(), 1);
//!
//! // Removal is keyed by center.
//! tree.remove(&Circle::new(Point::new(10.0, 10.0), 2.0));
//! assert_eq!(tree.len(), 1);
//!
//! // Plain kurbo rectangles work as query regions.
//! assert_eq!(tree.query(&Rect::new(-80.0, 20.0, -40.0, 60.0)).count(), 1);
//! ```
//!
//! ## Broad phase only
//!
//! Queries filter by node bounds, not by item. Every item of a node touched by the
//! query region is returned, and a shape stored in several leaves is returned once
//! per leaf. The tree's own overlap test is the bounding-box test [`overlaps`], also
//! for round shapes; use [`Circle::intersects_circle`] or your own exact test on the
//! candidates.
//!
//! ## Removal caveat
//!
//! The reverse index is keyed by center coordinate. Removing a shape removes every
//! stored shape with the same center. See [`QuadTree`] for details.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` in `kurbo` and `tracing`.
//! - `libm`: float math for `no_std` builds through `kurbo/libm`.
//!
//! Subdivisions are reported at `TRACE` level and [`QuadTree::clear`] at `DEBUG` level
//! through [`tracing`]; install a subscriber to see them.
//!
//! ### Float semantics
//!
//! This crate assumes finite coordinates. Debug builds assert on NaN centers.

#![no_std]

extern crate alloc;

mod reverse;
mod shapes;
mod tree;

pub use shapes::{Bounded, Circle, Rectangle, overlaps};
pub use tree::{CHILD_CAPACITY, NodeId, QuadTree};
