// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Bounded`] capability and the two shape kinds the tree ships with.

use core::fmt;

use kurbo::{Point, Rect};

/// Anything that can be stored in, or used to query, a [`QuadTree`][crate::QuadTree].
///
/// A bounded value is described by its center and half extents. The tree only ever
/// reasons about the axis-aligned box spanned by `center ± (half_width, half_height)`,
/// so a round shape is filtered by its bounding box, not by its outline.
///
/// Implementations must keep these values stable for as long as the value is stored in
/// a tree. To move a shape, remove it and insert it again.
pub trait Bounded {
    /// Center of the shape.
    fn center(&self) -> Point;

    /// Half of the horizontal extent.
    fn half_width(&self) -> f64;

    /// Half of the vertical extent.
    fn half_height(&self) -> f64;

    /// Whether this shape intersects `other`.
    ///
    /// The default implementation is the bounding-box test [`overlaps`]. Shapes that
    /// want an exact test against their own kind should expose it as a separate method
    /// (see [`Circle::intersects_circle`]).
    fn intersects(&self, other: &dyn Bounded) -> bool {
        overlaps(self, other)
    }
}

/// Axis-aligned bounding-box test between two bounded values.
///
/// Edges are inclusive: boxes that only touch are considered to intersect.
///
/// # Examples
///
/// ```
/// use kurbo::Point;
/// use understory_quadtree::{Rectangle, overlaps};
///
/// let a = Rectangle::from_center(Point::new(0.0, 0.0), 10.0, 10.0);
/// let b = Rectangle::from_center(Point::new(20.0, 0.0), 10.0, 10.0);
/// let c = Rectangle::from_center(Point::new(21.0, 0.0), 10.0, 10.0);
/// assert!(overlaps(&a, &b));
/// assert!(!overlaps(&a, &c));
/// ```
#[inline]
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Bounded + ?Sized,
    B: Bounded + ?Sized,
{
    let ca = a.center();
    let cb = b.center();
    !(ca.x + a.half_width() < cb.x - b.half_width()
        || ca.x - a.half_width() > cb.x + b.half_width()
        || ca.y + a.half_height() < cb.y - b.half_height()
        || ca.y - a.half_height() > cb.y + b.half_height())
}

/// Axis-aligned rectangle stored as a center and half extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Center point.
    pub center: Point,
    /// Half of the width.
    pub half_width: f64,
    /// Half of the height.
    pub half_height: f64,
}

impl Rectangle {
    /// Create a rectangle from its center and half extents.
    #[inline]
    pub const fn from_center(center: Point, half_width: f64, half_height: f64) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    /// Create a rectangle from its top-left corner and its full width and height.
    pub fn from_origin_size(top_left: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self {
            center: Point::new(top_left.x + half_width, top_left.y + half_height),
            half_width,
            half_height,
        }
    }

    /// The corner with the smallest coordinates.
    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(
            self.center.x - self.half_width,
            self.center.y - self.half_height,
        )
    }

    /// Full width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.half_width * 2.0
    }

    /// Full height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.half_height * 2.0
    }

    /// Convert to a kurbo min/max rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.center.x - self.half_width,
            self.center.y - self.half_height,
            self.center.x + self.half_width,
            self.center.y + self.half_height,
        )
    }

    /// Split into four equal quarters.
    ///
    /// The quarters are returned in the order the tree visits its children: offsets
    /// `(-, -)`, `(+, -)`, `(+, +)`, `(-, +)` from this rectangle's center.
    pub fn quadrants(&self) -> [Self; 4] {
        let hw = self.half_width / 2.0;
        let hh = self.half_height / 2.0;
        let c = self.center;
        [
            Self::from_center(Point::new(c.x - hw, c.y - hh), hw, hh),
            Self::from_center(Point::new(c.x + hw, c.y - hh), hw, hh),
            Self::from_center(Point::new(c.x + hw, c.y + hh), hw, hh),
            Self::from_center(Point::new(c.x - hw, c.y + hh), hw, hh),
        ]
    }
}

impl Bounded for Rectangle {
    #[inline]
    fn center(&self) -> Point {
        self.center
    }

    #[inline]
    fn half_width(&self) -> f64 {
        self.half_width
    }

    #[inline]
    fn half_height(&self) -> f64 {
        self.half_height
    }
}

impl From<Rect> for Rectangle {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::from_center(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }
}

impl fmt::Display for Rectangle {
    /// Formats as `{x y w h}` with the top-left corner and the full size.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tl = self.top_left();
        write!(f, "{{{} {} {} {}}}", tl.x, tl.y, self.width(), self.height())
    }
}

impl Bounded for Rect {
    fn center(&self) -> Point {
        Self::center(self)
    }

    fn half_width(&self) -> f64 {
        self.width().abs() / 2.0
    }

    fn half_height(&self) -> f64 {
        self.height().abs() / 2.0
    }
}

/// Circle given by center and radius.
///
/// In the tree a circle behaves like its bounding square. Use
/// [`intersects_circle`][Self::intersects_circle] for the exact narrow-phase test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Create a circle.
    #[inline]
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Exact circle-circle test.
    ///
    /// Circles that are exactly tangent do not intersect.
    ///
    /// ```
    /// use kurbo::Point;
    /// use understory_quadtree::Circle;
    ///
    /// let a = Circle::new(Point::new(0.0, 0.0), 5.0);
    /// let b = Circle::new(Point::new(8.0, 0.0), 5.0);
    /// let c = Circle::new(Point::new(10.0, 0.0), 5.0);
    /// assert!(a.intersects_circle(&b));
    /// assert!(!a.intersects_circle(&c));
    /// ```
    pub fn intersects_circle(&self, other: &Self) -> bool {
        self.radius + other.radius > (other.center - self.center).hypot()
    }
}

impl Bounded for Circle {
    #[inline]
    fn center(&self) -> Point {
        self.center
    }

    #[inline]
    fn half_width(&self) -> f64 {
        self.radius
    }

    #[inline]
    fn half_height(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn overlap_is_edge_inclusive_on_both_axes() {
        let a = Rectangle::from_center(Point::new(0.0, 0.0), 5.0, 5.0);
        let right = Rectangle::from_center(Point::new(10.0, 0.0), 5.0, 5.0);
        let below = Rectangle::from_center(Point::new(0.0, 10.0), 5.0, 5.0);
        let far = Rectangle::from_center(Point::new(0.0, 10.5), 5.0, 5.0);
        assert!(overlaps(&a, &right));
        assert!(overlaps(&a, &below));
        assert!(!overlaps(&a, &far));
        assert!(!overlaps(&far, &a));
    }

    #[test]
    fn circle_uses_bounding_box_in_tree_test() {
        // The corners of the bounding squares touch, the circles do not.
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(2.0, 2.0), 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects_circle(&b));
    }

    #[test]
    fn intersects_accepts_mixed_kinds() {
        let circle = Circle::new(Point::new(0.0, 0.0), 2.0);
        let rect = Rectangle::from_center(Point::new(3.0, 0.0), 1.0, 1.0);
        let kurbo_rect = Rect::new(10.0, 10.0, 12.0, 12.0);
        assert!(circle.intersects(&rect));
        assert!(rect.intersects(&circle));
        assert!(!circle.intersects(&kurbo_rect));
    }

    #[test]
    fn origin_size_and_center_constructors_agree() {
        let a = Rectangle::from_origin_size(Point::new(10.0, 20.0), 40.0, 60.0);
        let b = Rectangle::from_center(Point::new(30.0, 50.0), 20.0, 30.0);
        assert_eq!(a, b);
        assert_eq!(a.top_left(), Point::new(10.0, 20.0));
        assert_eq!(a.to_rect(), Rect::new(10.0, 20.0, 50.0, 80.0));
        assert_eq!(Rectangle::from(Rect::new(10.0, 20.0, 50.0, 80.0)), b);
        assert_eq!(a.to_string(), "{10 20 40 60}");
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let parent = Rectangle::from_center(Point::new(0.0, 0.0), 100.0, 50.0);
        let [a, b, c, d] = parent.quadrants();
        assert_eq!(a, Rectangle::from_center(Point::new(-50.0, -25.0), 50.0, 25.0));
        assert_eq!(b, Rectangle::from_center(Point::new(50.0, -25.0), 50.0, 25.0));
        assert_eq!(c, Rectangle::from_center(Point::new(50.0, 25.0), 50.0, 25.0));
        assert_eq!(d, Rectangle::from_center(Point::new(-50.0, 25.0), 50.0, 25.0));
    }
}
