//! Power distribution analysis
//!
//! Post-routing validation of current-carrying capacity on power nets.
//! Required copper cross-section comes from a trace-temperature-rise model
//! (IPC-2152 style): `I = k * dT^0.44 * A^0.725` with area in square mils.
//! Nets that come up short are handed back to the router with a raised
//! minimum width; what still fails after escalation is reported.

use crate::db::{LayoutDb, NetId, NetStatus, RuleSet};
use crate::ir::NetClass;
use serde::Serialize;

/// External-layer constant of the temperature-rise model
const MODEL_K: f32 = 0.048;
/// Micrometers per mil
const UM_PER_MIL: f32 = 25.4;
/// Millimeters per mil
const MM_PER_MIL: f32 = 0.0254;

/// Minimum trace width in mm able to carry `current_a` amperes at the rule
/// set's allowed temperature rise and copper weight
pub fn required_trace_width(current_a: f32, rules: &RuleSet) -> f32 {
    if current_a <= 0.0 {
        return 0.0;
    }
    let dt = rules.temp_rise_c.max(1.0);
    // Invert I = k * dT^0.44 * A^0.725 for the cross-section area
    let area_mil2 = (current_a / (MODEL_K * dt.powf(0.44))).powf(1.0 / 0.725);
    let thickness_mil = rules.copper_thickness_um / UM_PER_MIL;
    let width_mil = area_mil2 / thickness_mil;
    width_mil * MM_PER_MIL
}

/// Vias needed for `current_a` at the rule set's per-via rating
pub fn required_via_count(current_a: f32, rules: &RuleSet) -> usize {
    if current_a <= 0.0 {
        0
    } else {
        (current_a / rules.amps_per_via).ceil() as usize
    }
}

/// Capacity assessment of one routed power net
#[derive(Debug, Clone, Serialize)]
pub struct PowerFinding {
    pub net: NetId,
    pub net_name: String,
    pub current_a: f32,
    pub required_width: f32,
    /// Narrowest routed segment, the bottleneck of the path
    pub actual_min_width: f32,
    pub via_count: usize,
    pub required_vias: usize,
    pub width_ok: bool,
    pub vias_ok: bool,
}

impl PowerFinding {
    pub fn sufficient(&self) -> bool {
        self.width_ok && self.vias_ok
    }
}

/// Assess every routed power net with a declared current
pub fn analyze(db: &LayoutDb) -> Vec<PowerFinding> {
    let rules = db.rules();
    let mut findings = Vec::new();

    for net in db.nets() {
        if net.class != NetClass::Power || net.status != NetStatus::Routed {
            continue;
        }
        let current = match net.constraints.current_a {
            Some(c) if c > 0.0 => c,
            _ => continue,
        };

        let required_width = required_trace_width(current, rules);
        let actual_min_width = db
            .segments_of_net(net.id)
            .map(|s| s.width)
            .fold(f32::MAX, f32::min);
        if actual_min_width == f32::MAX {
            // Routed with no segments means pads coincide; nothing to derate
            continue;
        }

        let via_count = db.vias_of_net(net.id).count();
        // Via ampacity only binds when the route actually changes layers
        let required_vias = if via_count > 0 {
            required_via_count(current, rules)
        } else {
            0
        };

        let finding = PowerFinding {
            net: net.id,
            net_name: net.name.clone(),
            current_a: current,
            required_width,
            actual_min_width,
            via_count,
            required_vias,
            width_ok: actual_min_width + 1e-6 >= required_width,
            vias_ok: via_count >= required_vias,
        };
        if !finding.sufficient() {
            log::warn!(
                "[power] net '{}' undersized: {:.3} mm routed, {:.3} mm required for {:.2} A",
                finding.net_name,
                finding.actual_min_width,
                finding.required_width,
                current
            );
        }
        findings.push(finding);
    }
    findings
}
