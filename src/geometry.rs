//! World space (pixel) geometry used to place entities on a maze.

use std::fmt;

/// Edge contact below this many pixels is not treated as an overlap.
pub const OVERLAP_TOLERANCE: f32 = 1e-3;

#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bounding box size of an entity, e.g. a scaled player sprite.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub fn new(width: f32, height: f32) -> Footprint {
        Footprint { width, height }
    }

    pub fn square(side: f32) -> Footprint {
        Footprint::new(side, side)
    }
}

/// Axis aligned rectangle, `x`/`y` is the top left corner.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn centred(centre: Point, footprint: Footprint) -> Rect {
        Rect::new(centre.x - footprint.width / 2.0,
                  centre.y - footprint.height / 2.0,
                  footprint.width,
                  footprint.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn centre(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Do the two rectangles share some interior area?
    /// Rectangles that only touch along an edge or a corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x + OVERLAP_TOLERANCE < other.right() &&
        other.x + OVERLAP_TOLERANCE < self.right() &&
        self.y + OVERLAP_TOLERANCE < other.bottom() &&
        other.y + OVERLAP_TOLERANCE < self.bottom()
    }

    /// Is the rectangle entirely inside `bounds` (edges may coincide)?
    pub fn is_within(&self, bounds: &Rect) -> bool {
        self.x + OVERLAP_TOLERANCE >= bounds.x &&
        self.y + OVERLAP_TOLERANCE >= bounds.y &&
        self.right() <= bounds.right() + OVERLAP_TOLERANCE &&
        self.bottom() <= bounds.bottom() + OVERLAP_TOLERANCE
    }

    /// Shortest distance from `point` to any point of the rectangle, zero when inside.
    pub fn distance_to(&self, point: Point) -> f32 {
        let closest_x = point.x.max(self.x).min(self.right());
        let closest_y = point.y.max(self.y).min(self.bottom());
        point.distance_to(Point::new(closest_x, closest_y))
    }
}
