//! DRC entry points
//!
//! - Batch: whole-board check over a consistent snapshot, used at stage
//!   boundaries and by external callers.
//! - Incremental: re-check limited to the region touched by the last
//!   mutation, used inside routing commit loops for real-time feedback.

use super::checks;
use super::connectivity::net_is_connected;
use super::types::{sort_violations, RuleKind, Severity, Violation};
use crate::db::{FeatureId, LayerId, LayoutDb};
use crate::geometry::Rect;
use rayon::prelude::*;

/// Run the full rule check over the board.
///
/// Deterministic output order (rule kind, net name, location) and idempotent
/// over an unchanged snapshot.
pub fn run_batch_drc(db: &LayoutDb) -> Vec<Violation> {
    let start = std::time::Instant::now();

    let copper: Vec<LayerId> = db.copper_layers().map(|l| l.id).collect();
    log::debug!(
        "[DRC] checking {} copper layers of {} total",
        copper.len(),
        db.layers().len()
    );

    // Parallel per-layer clearance scan
    let mut violations: Vec<Violation> = copper
        .par_iter()
        .flat_map(|&layer| checks::check_layer_clearances(db, layer))
        .collect();

    violations.extend(checks::check_trace_widths(db));
    violations.extend(checks::check_thermal(db));
    violations.extend(check_continuity(db));

    sort_violations(&mut violations);
    log::info!(
        "[DRC] batch check completed: {} violations in {:?}",
        violations.len(),
        start.elapsed()
    );
    violations
}

/// Re-check only the region touched by the last mutation
pub fn run_incremental_drc(db: &LayoutDb, layer: LayerId, region: &Rect) -> Vec<Violation> {
    let mut violations = checks::check_region_clearances(db, layer, region);
    sort_violations(&mut violations);
    violations
}

/// Continuity over every multi-pad net: a disconnected net reports as
/// `Unrouted`, not as a clearance problem
pub fn check_continuity(db: &LayoutDb) -> Vec<Violation> {
    let mut violations = Vec::new();
    for net in db.nets() {
        if net.pads.len() < 2 || net_is_connected(db, net) {
            continue;
        }
        violations.push(Violation {
            rule: RuleKind::Unrouted,
            severity: Severity::Warning,
            location: db.pad_position(net.pads[0]),
            entities: net.pads.iter().map(|&p| FeatureId::Pad(p)).collect(),
            nets: vec![net.name.clone()],
            measured: 0.0,
            required: 0.0,
            detail: format!("net '{}' is not electrically continuous", net.name),
        });
    }
    violations
}
