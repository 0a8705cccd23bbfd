//! Geometric primitives and spatial indexing
//!
//! # Submodules
//! - `types` - points, rectangles, pad shapes, placement transforms
//! - `distance` - distance kernels for clearance measurement
//! - `spatial` - R-tree indexing of copper features

pub mod distance;
pub mod spatial;
pub mod types;

pub use spatial::{locate_in_rect, LayerIndex, SpatialItem};
pub use types::{CopperShape, DistanceMetric, PadShape, Placement, Point, Rect};
