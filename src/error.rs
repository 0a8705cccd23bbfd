//! Error types for layout pipeline operations

use thiserror::Error;

/// Errors that can occur while building or transforming a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Invalid geometry at database construction time (fatal)
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Two pads of different nets occupy the same copper at construction
    #[error("pads {pad_a} and {pad_b} of different nets overlap on layer {layer}")]
    PadOverlap {
        pad_a: String,
        pad_b: String,
        layer: String,
    },

    /// Combined footprint area exceeds the board outline
    #[error("board outline too small: {required_mm2:.2} mm2 of footprints, {available_mm2:.2} mm2 available")]
    BoardTooSmall {
        required_mm2: f32,
        available_mm2: f32,
    },

    /// A mutation referenced an entity that does not exist
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// A mutation was rejected to keep the database consistent
    #[error("mutation rejected: {0}")]
    MutationRejected(String),

    /// Placement did not converge within the iteration budget
    #[error("placement did not converge after {iterations} iterations (residual {residual:.4} mm)")]
    PlacementNonConvergence { iterations: usize, residual: f32 },

    /// No route found for a net after exhausting retries
    #[error("no route found for net {net_name}")]
    RoutingFailure { net_name: String },

    /// A power net cannot carry its declared current after escalation
    #[error("power capacity violation on net {net_name}: needs {required_mm:.3} mm width, widest path {actual_mm:.3} mm")]
    PowerCapacityViolation {
        net_name: String,
        required_mm: f32,
        actual_mm: f32,
    },
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
