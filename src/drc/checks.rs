//! Rule checking logic
//!
//! Clearance, trace width, and thermal checks over the layout database.
//! All checks are pure reads; violations are returned, never stored.

use super::types::{RuleKind, Severity, Violation};
use crate::db::{CopperRef, FeatureId, LayerId, LayoutDb};
use crate::geometry::distance::shape_gap;
use crate::geometry::{Rect, SpatialItem};
use crate::ir::ThermalTag;
use crate::power::required_trace_width;
use rayon::prelude::*;

/// Check if two copper features should be clearance-checked against each other
pub fn should_check_pair(db: &LayoutDb, a: &CopperRef, b: &CopperRef) -> bool {
    // Same net - skip
    match (a.net, b.net) {
        (Some(na), Some(nb)) if na == nb => return false,
        _ => {}
    }

    // Uncommitted components have no meaningful geometry yet
    for item in [a, b] {
        if let FeatureId::Pad(pad_id) = item.feature {
            let pad = db.pad(pad_id);
            if !db.component(pad.component).committed {
                return false;
            }
        }
    }

    true
}

fn net_name(db: &LayoutDb, net: Option<crate::db::NetId>) -> Option<String> {
    net.map(|id| db.net(id).name.clone())
}

fn clearance_violation(
    db: &LayoutDb,
    layer: LayerId,
    a: &CopperRef,
    b: &CopperRef,
) -> Option<Violation> {
    let rules = db.rules();
    let class_a = a.net.map(|n| db.net(n).class);
    let class_b = b.net.map(|n| db.net(n).class);
    let clearance = rules.clearance_between(class_a, class_b);

    let (gap, point) = shape_gap(
        &db.feature_shape(a.feature),
        &db.feature_shape(b.feature),
        rules.metric,
    );
    if gap >= clearance {
        return None;
    }

    let mut entities = vec![a.feature, b.feature];
    entities.sort_by_key(|f| f.sort_key());
    let mut nets: Vec<String> = [net_name(db, a.net), net_name(db, b.net)]
        .into_iter()
        .flatten()
        .collect();
    nets.sort();
    nets.dedup();

    Some(Violation {
        rule: RuleKind::Clearance,
        severity: Severity::Error,
        location: point,
        entities,
        nets,
        measured: gap.max(0.0),
        required: clearance,
        detail: format!(
            "copper gap {:.3} mm < {:.3} mm on layer '{}'",
            gap.max(0.0),
            clearance,
            db.layers()[layer.0 as usize].name
        ),
    })
}

/// Clearance check for every same-layer feature pair of different nets on
/// one layer. R-tree candidate filtering with the worst-case clearance,
/// parallel over features.
pub fn check_layer_clearances(db: &LayoutDb, layer: LayerId) -> Vec<Violation> {
    let expand = db.rules().max_clearance();
    let objects: Vec<&SpatialItem<CopperRef>> = db.items_on_layer(layer).collect();

    objects
        .par_iter()
        .flat_map(|obj_a| {
            let mut violations = Vec::new();
            let search = obj_a.rect().expanded(expand);

            for neighbor in db.items_in_region(layer, &search) {
                let b = &neighbor.payload;

                // Only check each pair once
                if obj_a.payload.feature.sort_key() >= b.feature.sort_key() {
                    continue;
                }
                if !should_check_pair(db, &obj_a.payload, b) {
                    continue;
                }
                if let Some(v) = clearance_violation(db, layer, &obj_a.payload, b) {
                    violations.push(v);
                }
            }

            violations
        })
        .collect()
}

/// Clearance re-check limited to features intersecting `region` on `layer`
pub fn check_region_clearances(db: &LayoutDb, layer: LayerId, region: &Rect) -> Vec<Violation> {
    let expand = db.rules().max_clearance();
    let probe = region.expanded(expand);
    let targets: Vec<&SpatialItem<CopperRef>> = db.items_in_region(layer, &probe).collect();

    let mut violations = Vec::new();
    for obj_a in &targets {
        let search = obj_a.rect().expanded(expand);
        for neighbor in db.items_in_region(layer, &search) {
            let b = &neighbor.payload;
            if obj_a.payload.feature.sort_key() >= b.feature.sort_key() {
                continue;
            }
            if !should_check_pair(db, &obj_a.payload, b) {
                continue;
            }
            if let Some(v) = clearance_violation(db, layer, &obj_a.payload, b) {
                violations.push(v);
            }
        }
    }
    violations
}

/// Every segment's width against its net minimum; power nets additionally
/// against the current-derived minimum
pub fn check_trace_widths(db: &LayoutDb) -> Vec<Violation> {
    let rules = db.rules();
    let mut violations = Vec::new();

    for segment in db.segments() {
        let net = db.net(segment.net);
        let mut required = net.min_width(rules.min_trace_width);
        if let Some(current) = net.constraints.current_a {
            required = required.max(required_trace_width(current, rules));
        }
        if let Some(max) = net.constraints.max_width {
            // An explicit cap wins here; the capacity shortfall it may cause
            // is the power analyzer's finding, not a width violation
            required = required.min(max);
        }
        if segment.width + 1e-6 < required {
            violations.push(Violation {
                rule: RuleKind::TraceWidth,
                severity: Severity::Error,
                location: crate::geometry::distance::midpoint(segment.a, segment.b),
                entities: vec![FeatureId::Segment(segment.id)],
                nets: vec![net.name.clone()],
                measured: segment.width,
                required,
                detail: format!(
                    "trace width {:.3} mm < {:.3} mm on net '{}'",
                    segment.width, required, net.name
                ),
            });
        }
    }
    violations
}

/// Heat-source spacing against sensitive components, and copper fill under
/// heat sources
pub fn check_thermal(db: &LayoutDb) -> Vec<Violation> {
    let rules = db.rules();
    let mut violations = Vec::new();

    let placed: Vec<_> = db.components().iter().filter(|c| c.committed).collect();

    for source in placed.iter() {
        let power_w = match source.thermal {
            ThermalTag::Source { power_w } => power_w,
            _ => continue,
        };
        let source_bounds = db.component_bounds(source.id);

        for other in placed.iter().filter(|c| c.thermal == ThermalTag::Sensitive) {
            let gap = source_bounds.gap_to(&db.component_bounds(other.id));
            if gap < rules.thermal_spacing {
                violations.push(Violation {
                    rule: RuleKind::Thermal,
                    severity: Severity::Error,
                    location: source_bounds.center(),
                    entities: vec![],
                    nets: vec![],
                    measured: gap,
                    required: rules.thermal_spacing,
                    detail: format!(
                        "heat source '{}' ({:.1} W) is {:.2} mm from sensitive '{}' (needs {:.2} mm)",
                        source.name, power_w, gap, other.name, rules.thermal_spacing
                    ),
                });
            }
        }

        let fill = copper_fill_ratio(db, &source_bounds);
        if fill < rules.thermal_min_copper_ratio {
            violations.push(Violation {
                rule: RuleKind::Thermal,
                severity: Severity::Error,
                location: source_bounds.center(),
                entities: vec![],
                nets: vec![],
                measured: fill,
                required: rules.thermal_min_copper_ratio,
                detail: format!(
                    "copper fill {:.2} under heat source '{}' below {:.2}",
                    fill, source.name, rules.thermal_min_copper_ratio
                ),
            });
        }
    }
    violations
}

/// Best copper fill ratio under a footprint across copper layers.
/// Approximated from feature bounding boxes clipped to the footprint.
fn copper_fill_ratio(db: &LayoutDb, bounds: &Rect) -> f32 {
    let area = bounds.area();
    if area <= 0.0 {
        return 1.0;
    }
    db.copper_layers()
        .map(|layer| {
            let covered: f32 = db
                .items_in_region(layer.id, bounds)
                .map(|item| item.rect().intersection_area(bounds))
                .sum();
            (covered / area).min(1.0)
        })
        .fold(0.0, f32::max)
}
