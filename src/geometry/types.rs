//! Core geometry types for board layout
//!
//! Fundamental geometric primitives used throughout the engine: points,
//! rectangles, pad shapes, and placement transforms. All dimensions are
//! millimeters.

use serde::{Deserialize, Serialize};

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn manhattan(&self, other: &Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Axis-aligned rectangle, `min` inclusive to `max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Point::new(0.0, 0.0),
            max: Point::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Overlapping area with another rectangle (0 when disjoint)
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Gap between rectangle borders (0 when touching or overlapping)
    pub fn gap_to(&self, other: &Rect) -> f32 {
        let dx = (self.min.x.max(other.min.x) - self.max.x.min(other.max.x)).max(0.0);
        let dy = (self.min.y.max(other.min.y) - self.max.y.min(other.max.y)).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pad shape definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PadShape {
    Circle { diameter: f32 },
    Rectangle { width: f32, height: f32 },
    Oval { width: f32, height: f32 },
}

impl PadShape {
    /// Bounding box of the shape centered at the origin
    pub fn bounds(&self) -> Rect {
        let (w, h) = match *self {
            PadShape::Circle { diameter } => (diameter, diameter),
            PadShape::Rectangle { width, height } | PadShape::Oval { width, height } => {
                (width, height)
            }
        };
        Rect {
            min: Point::new(-w / 2.0, -h / 2.0),
            max: Point::new(w / 2.0, h / 2.0),
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            PadShape::Circle { diameter } => diameter > 0.0,
            PadShape::Rectangle { width, height } | PadShape::Oval { width, height } => {
                width > 0.0 && height > 0.0
            }
        }
    }
}

/// Position and rotation of a placed component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
}

impl Placement {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self { x, y, rotation }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Transform a local offset into world coordinates
    pub fn apply(&self, offset: Point) -> Point {
        let rad = self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        Point::new(
            self.x + offset.x * cos - offset.y * sin,
            self.y + offset.x * sin + offset.y * cos,
        )
    }

    /// Transform a local rectangle into its world-space bounding box
    pub fn apply_rect(&self, local: Rect) -> Rect {
        let corners = [
            self.apply(local.min),
            self.apply(Point::new(local.max.x, local.min.y)),
            self.apply(local.max),
            self.apply(Point::new(local.min.x, local.max.y)),
        ];
        let mut out = Rect::new(corners[0], corners[0]);
        for c in &corners[1..] {
            out.min.x = out.min.x.min(c.x);
            out.min.y = out.min.y.min(c.y);
            out.max.x = out.max.x.max(c.x);
            out.max.y = out.max.y.max(c.y);
        }
        out
    }
}

/// Distance metric used by clearance checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
}

/// World-space copper outline of a board feature, as seen by clearance
/// checks. Rotated rectangular pads are conservatively widened to their
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CopperShape {
    Circle { center: Point, radius: f32 },
    Box(Rect),
    Stroke { a: Point, b: Point, width: f32 },
}

impl CopperShape {
    pub fn bounds(&self) -> Rect {
        match *self {
            CopperShape::Circle { center, radius } => Rect {
                min: Point::new(center.x - radius, center.y - radius),
                max: Point::new(center.x + radius, center.y + radius),
            },
            CopperShape::Box(r) => r,
            CopperShape::Stroke { a, b, width } => {
                let half = width / 2.0;
                Rect {
                    min: Point::new(a.x.min(b.x) - half, a.y.min(b.y) - half),
                    max: Point::new(a.x.max(b.x) + half, a.y.max(b.y) + half),
                }
            }
        }
    }

    /// Approximate copper area, used by thermal fill checks
    pub fn area(&self) -> f32 {
        match *self {
            CopperShape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            CopperShape::Box(r) => r.area(),
            CopperShape::Stroke { a, b, width } => a.distance(&b) * width + width * width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_gap() {
        let a = Rect::from_size(1.0, 1.0);
        let b = Rect::new(Point::new(3.0, 0.0), Point::new(4.0, 1.0));
        assert!((a.gap_to(&b) - 2.0).abs() < 1e-6);
        assert_eq!(a.gap_to(&a), 0.0);
    }

    #[test]
    fn test_placement_rotation() {
        let p = Placement::new(10.0, 10.0, 90.0);
        let world = p.apply(Point::new(1.0, 0.0));
        assert!((world.x - 10.0).abs() < 1e-5);
        assert!((world.y - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_bounds_contain_corners() {
        let p = Placement::new(0.0, 0.0, 45.0);
        let bounds = p.apply_rect(Rect::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0)));
        // A rotated unit square needs a sqrt(2)-wide box
        assert!(bounds.width() > 2.0);
    }
}
