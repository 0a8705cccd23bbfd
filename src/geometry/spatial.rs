//! Spatial indexing for copper features
//!
//! R-tree based indexing of board geometry, keyed per layer by the layout
//! database. Enables sub-linear region queries during DRC and routing.

use super::types::Rect;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// An envelope-carrying entry in a layer's R-tree
#[derive(Clone, Debug)]
pub struct SpatialItem<T> {
    pub payload: T,
    bounds: AABB<[f32; 2]>,
}

impl<T> SpatialItem<T> {
    pub fn new(payload: T, rect: Rect) -> Self {
        Self {
            payload,
            bounds: AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y]),
        }
    }

    pub fn rect(&self) -> Rect {
        let lower = self.bounds.lower();
        let upper = self.bounds.upper();
        Rect {
            min: super::types::Point::new(lower[0], lower[1]),
            max: super::types::Point::new(upper[0], upper[1]),
        }
    }
}

impl<T: PartialEq> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.bounds.distance_2(point)
    }
}

/// One R-tree per board layer
pub type LayerIndex<T> = RTree<SpatialItem<T>>;

/// Collect items whose envelopes intersect `region`
pub fn locate_in_rect<'a, T>(
    tree: &'a LayerIndex<T>,
    region: &Rect,
) -> impl Iterator<Item = &'a SpatialItem<T>> {
    let envelope = AABB::from_corners(
        [region.min.x, region.min.y],
        [region.max.x, region.max.y],
    );
    tree.locate_in_envelope_intersecting(&envelope)
}
