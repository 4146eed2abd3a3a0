//! Rectangles, capability tags and shape records
//!
//! Screen convention: `pos` is the top-left corner and +Y points down.

use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque key of the body that owns a shape (the body's entity id).
pub type BodyKey = u32;

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Overwrite the component of `v` along this axis
    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::Horizontal => v.x = value,
            Axis::Vertical => v.y = value,
        }
    }

    /// Vector with `amount` along this axis and zero on the other
    #[inline]
    pub fn vec(self, amount: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(amount, 0.0),
            Axis::Vertical => Vec2::new(0.0, amount),
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (non-negative)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Side length along an axis
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        axis.of(self.size)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        a0.x < b1.x && b0.x < a1.x && a0.y < b1.y && b0.y < a1.y
    }

    /// Copy moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// Region covered while moving `displacement` along `axis`
    pub fn swept(&self, axis: Axis, displacement: f32) -> Rect {
        let moved = self.translated(axis.vec(displacement));
        let min = self.min().min(moved.min());
        let max = self.max().max(moved.max());
        Rect {
            pos: min,
            size: max - min,
        }
    }
}

/// Closed set of behavioral tags, stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tags(u32);

impl Tags {
    pub const NONE: Tags = Tags(0);
    /// Takes part in collision resolution as an obstacle
    pub const SOLID: Tags = Tags(1 << 0);
    /// Dynamic body (a bouncing square)
    pub const SQUARE: Tags = Tags(1 << 1);

    /// Number of single-bit tags
    pub const COUNT: usize = 2;
    /// Every single-bit tag, in index order
    pub const EACH: [Tags; Tags::COUNT] = [Tags::SOLID, Tags::SQUARE];

    /// True when every bit of `other` is set (vacuously true for `NONE`)
    #[inline]
    pub fn contains(self, other: Tags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Tags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Tags) {
        self.0 &= !other.0;
    }

    /// Single-bit tags set in `self`
    pub fn iter(self) -> impl Iterator<Item = Tags> {
        Tags::EACH.into_iter().filter(move |t| self.contains(*t))
    }

    /// Position of a single-bit tag in `EACH`
    pub(crate) fn slot(self) -> Option<usize> {
        Tags::EACH.iter().position(|t| *t == self)
    }
}

impl BitOr for Tags {
    type Output = Tags;

    fn bitor(self, rhs: Tags) -> Tags {
        Tags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Tags {
    fn bitor_assign(&mut self, rhs: Tags) {
        self.0 |= rhs.0;
    }
}

/// Stable handle to a shape stored in a `Space`.
///
/// The generation makes handles of removed shapes go stale instead of
/// aliasing whatever later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// A collision shape record
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub rect: Rect,
    /// Only the owning `Space` may change tags once the shape is inserted
    tags: Tags,
    /// Body owning this shape, if any
    pub owner: Option<BodyKey>,
}

impl Shape {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            tags: Tags::NONE,
            owner: None,
        }
    }

    /// Builder: tags to index on insertion
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Builder: owning body
    pub fn with_owner(mut self, owner: BodyKey) -> Self {
        self.owner = Some(owner);
        self
    }

    #[inline]
    pub fn tags(&self) -> Tags {
        self.tags
    }

    #[inline]
    pub fn has_tags(&self, tags: Tags) -> bool {
        self.tags.contains(tags)
    }

    pub(crate) fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        let inside = Rect::new(9.0, 9.0, 5.0, 5.0);

        assert!(!a.overlaps(&touching));
        assert!(!touching.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_swept_covers_both_ends() {
        let r = Rect::new(10.0, 20.0, 4.0, 4.0);

        let right = r.swept(Axis::Horizontal, 6.0);
        assert_eq!(right, Rect::new(10.0, 20.0, 10.0, 4.0));

        let up = r.swept(Axis::Vertical, -3.0);
        assert_eq!(up, Rect::new(10.0, 17.0, 4.0, 7.0));

        assert_eq!(r.swept(Axis::Vertical, 0.0), r);
    }

    #[test]
    fn test_tags_mask_ops() {
        let mut t = Tags::SQUARE;
        assert!(!t.contains(Tags::SOLID));
        assert!(t.contains(Tags::NONE));

        t.insert(Tags::SOLID);
        assert!(t.contains(Tags::SOLID | Tags::SQUARE));
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![Tags::SOLID, Tags::SQUARE]);

        t.remove(Tags::SOLID);
        t.remove(Tags::SOLID);
        assert_eq!(t, Tags::SQUARE);
    }

    #[test]
    fn test_axis_helpers() {
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(Axis::Horizontal.of(v), 3.0);
        assert_eq!(Axis::Vertical.of(v), -2.0);
        assert_eq!(Axis::Vertical.vec(5.0), Vec2::new(0.0, 5.0));

        let mut w = v;
        Axis::Horizontal.set(&mut w, -3.0);
        assert_eq!(w, Vec2::new(-3.0, -2.0));
    }
}
