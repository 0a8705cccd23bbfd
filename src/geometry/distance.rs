//! Distance calculation kernels for clearance checking
//!
//! Point, segment, and shape-to-shape minimum distances. Clearance checks
//! compare copper outlines, so distances are measured between feature
//! boundaries, not centers.

use super::types::{CopperShape, DistanceMetric, Point, Rect};

/// Point-to-segment minimum distance, returning the closest point on the segment
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> (f32, Point) {
    let ab = Point::new(b.x - a.x, b.y - a.y);
    let ap = Point::new(p.x - a.x, p.y - a.y);
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;

    if ab_len2 < 1e-10 {
        // Degenerate segment
        return (p.distance(&a), a);
    }

    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len2).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * ab.x, a.y + t * ab.y);
    (p.distance(&closest), closest)
}

/// Segment-to-segment minimum distance, returning a representative closest point
pub fn segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> (f32, Point) {
    if segments_intersect(a1, a2, b1, b2) {
        return (0.0, midpoint(a1, b1));
    }

    let mut min_d = f32::MAX;
    let mut closest = a1;

    for (p, s1, s2) in [(a1, b1, b2), (a2, b1, b2), (b1, a1, a2), (b2, a1, a2)] {
        let (d, on_seg) = point_segment_distance(p, s1, s2);
        if d < min_d {
            min_d = d;
            closest = midpoint(p, on_seg);
        }
    }

    (min_d, closest)
}

/// Center-line distance between two stroked segments minus their half-widths.
/// Negative values mean the copper overlaps.
pub fn stroked_segment_gap(
    a1: Point,
    a2: Point,
    width_a: f32,
    b1: Point,
    b2: Point,
    width_b: f32,
) -> (f32, Point) {
    let (d, p) = segment_distance(a1, a2, b1, b2);
    (d - width_a / 2.0 - width_b / 2.0, p)
}

/// Distance between two points under the configured metric
pub fn metric_distance(metric: DistanceMetric, a: Point, b: Point) -> f32 {
    match metric {
        DistanceMetric::Euclidean => a.distance(&b),
        DistanceMetric::Manhattan => a.manhattan(&b),
    }
}

/// Minimum copper-to-copper gap between two features, with a representative
/// closest-approach point. Negative gaps mean overlapping copper.
///
/// The Manhattan metric applies to center-based distances (circles and
/// boxes); stroke gaps stay Euclidean since trace outlines are round.
pub fn shape_gap(a: &CopperShape, b: &CopperShape, metric: DistanceMetric) -> (f32, Point) {
    use CopperShape::*;
    match (a, b) {
        (Circle { center: c1, radius: r1 }, Circle { center: c2, radius: r2 }) => {
            let d = metric_distance(metric, *c1, *c2);
            (d - r1 - r2, midpoint(*c1, *c2))
        }
        (Circle { center, radius }, Box(rect)) | (Box(rect), Circle { center, radius }) => {
            let clamped = Point::new(
                center.x.clamp(rect.min.x, rect.max.x),
                center.y.clamp(rect.min.y, rect.max.y),
            );
            let d = metric_distance(metric, *center, clamped);
            (d - radius, midpoint(*center, clamped))
        }
        (Circle { center, radius }, Stroke { a, b, width })
        | (Stroke { a, b, width }, Circle { center, radius }) => {
            let (d, on_seg) = point_segment_distance(*center, *a, *b);
            (d - radius - width / 2.0, midpoint(*center, on_seg))
        }
        (Box(r1), Box(r2)) => {
            let gap = match metric {
                DistanceMetric::Euclidean => r1.gap_to(r2),
                DistanceMetric::Manhattan => {
                    let dx = (r1.min.x.max(r2.min.x) - r1.max.x.min(r2.max.x)).max(0.0);
                    let dy = (r1.min.y.max(r2.min.y) - r1.max.y.min(r2.max.y)).max(0.0);
                    dx + dy
                }
            };
            (gap, midpoint(r1.center(), r2.center()))
        }
        (Box(rect), Stroke { a, b, width }) | (Stroke { a, b, width }, Box(rect)) => {
            let (d, p) = box_segment_distance(rect, *a, *b);
            (d - width / 2.0, p)
        }
        (
            Stroke { a: a1, b: a2, width: w1 },
            Stroke { a: b1, b: b2, width: w2 },
        ) => stroked_segment_gap(*a1, *a2, *w1, *b1, *b2, *w2),
    }
}

fn box_segment_distance(rect: &Rect, a: Point, b: Point) -> (f32, Point) {
    if rect.contains(&a) || rect.contains(&b) {
        return (0.0, midpoint(a, b));
    }
    let corners = [
        rect.min,
        Point::new(rect.max.x, rect.min.y),
        rect.max,
        Point::new(rect.min.x, rect.max.y),
    ];
    let mut min_d = f32::MAX;
    let mut closest = a;
    for i in 0..4 {
        let (d, p) = segment_distance(corners[i], corners[(i + 1) % 4], a, b);
        if d < min_d {
            min_d = d;
            closest = p;
        }
    }
    (min_d, closest)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn orientation(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper segment intersection test (shared endpoints count as intersecting)
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    let on = |o: f32, a: Point, b: Point, p: Point| {
        o == 0.0
            && p.x >= a.x.min(b.x)
            && p.x <= a.x.max(b.x)
            && p.y >= a.y.min(b.y)
            && p.y <= a.y.max(b.y)
    };
    on(d1, b1, b2, a1) || on(d2, b1, b2, a2) || on(d3, a1, a2, b1) || on(d4, a1, a2, b2)
}
