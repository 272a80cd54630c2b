//! Canvas-space geometry.
//!
//! Coordinates are integer pixels with the origin at the top-left corner and
//! `y` growing downwards, matching `CanvasRenderingContext2d`.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub position: Point,
    pub width: i16,
    pub height: i16,
}

impl Rect {
    pub const fn new(position: Point, width: i16, height: i16) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    pub const fn new_from_x_y(x: i16, y: i16, width: i16, height: i16) -> Self {
        Self::new(Point { x, y }, width, height)
    }

    pub fn x(&self) -> i16 {
        self.position.x
    }

    pub fn y(&self) -> i16 {
        self.position.y
    }

    /// Saturates at `i16::MAX` instead of wrapping.
    pub fn right(&self) -> i16 {
        self.x().saturating_add(self.width)
    }

    pub fn bottom(&self) -> i16 {
        self.y().saturating_add(self.height)
    }

    pub fn set_x(&mut self, x: i16) {
        self.position.x = x;
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x() < other.right()
            && self.right() > other.x()
            && self.y() < other.bottom()
            && self.bottom() > other.y()
    }
}
