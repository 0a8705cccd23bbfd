//! DRC data types
//!
//! Violations are transient diagnostics: produced over a database snapshot,
//! ordered deterministically, never persisted back into the database.

use crate::db::FeatureId;
use crate::geometry::Point;
use serde::Serialize;

/// Rule kinds, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RuleKind {
    Clearance,
    TraceWidth,
    Thermal,
    /// A multi-pad net whose copper does not form one connected component
    Unrouted,
    /// A power net that cannot carry its declared current
    PowerCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single rule violation with location details
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub severity: Severity,
    /// Closest-approach point or representative location
    pub location: Point,
    /// Offending entities, at most two
    pub entities: Vec<FeatureId>,
    /// Net names involved, sorted; drives the ordering contract
    pub nets: Vec<String>,
    /// Measured value (gap, width, spacing, fill ratio), rule dependent
    pub measured: f32,
    /// Threshold the measurement failed against
    pub required: f32,
    pub detail: String,
}

impl Violation {
    /// Ordering contract: rule kind, then net name, then location.
    /// Callers (stage retry logic, tests) rely on stable diagnostics.
    pub fn sort_key(&self) -> (RuleKind, String, i64, i64) {
        let net = self.nets.first().cloned().unwrap_or_default();
        // Quantized to 0.1 um so float noise cannot reorder reports
        let qx = (self.location.x * 10000.0).round() as i64;
        let qy = (self.location.y * 10000.0).round() as i64;
        (self.rule, net, qx, qy)
    }
}

/// Sort violations into the contractual report order
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
