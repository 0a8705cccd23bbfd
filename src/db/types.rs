//! Layout database entities
//!
//! The canonical in-memory representation of the board: layers, placed
//! components, pads, nets, traces, and vias, plus the rule set governing
//! them. Entities are addressed by newtype ids; names are kept for
//! diagnostics and deterministic ordering.

use crate::geometry::{DistanceMetric, PadShape, Placement, Point, Rect};
use crate::ir::{LayerKind, NetClass, NetConstraints, ThermalTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PadId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViaId(pub u64);

/// Index into the board's layer stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u8);

/// Bitmask over layer stack indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerSet(pub u32);

impl LayerSet {
    pub fn single(layer: LayerId) -> Self {
        LayerSet(1 << layer.0)
    }

    pub fn insert(&mut self, layer: LayerId) {
        self.0 |= 1 << layer.0;
    }

    pub fn contains(&self, layer: LayerId) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = LayerId> + '_ {
        (0..32u8).filter(|i| self.0 & (1 << i) != 0).map(LayerId)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// One entry in the layer stack; order fixed after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
}

/// A pad's local geometry within its footprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pad {
    pub id: PadId,
    pub component: ComponentId,
    pub pin: String,
    pub offset: Point,
    pub shape: PadShape,
    pub layers: LayerSet,
    pub net: Option<NetId>,
}

/// A placed footprint instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub pads: Vec<PadId>,
    pub placement: Placement,
    /// Pinned components never move during placement
    pub pinned: bool,
    pub thermal: ThermalTag,
    /// Set once the placement engine commits a final position; committed
    /// components must sit fully inside the board outline
    pub committed: bool,
}

impl Component {
    /// Footprint bounding box in local coordinates
    pub fn local_bounds(&self, pads: &[Pad]) -> Rect {
        let mut bounds: Option<Rect> = None;
        for &pad_id in &self.pads {
            let pad = &pads[pad_id.0 as usize];
            let pb = pad.shape.bounds();
            let shifted = Rect {
                min: Point::new(pb.min.x + pad.offset.x, pb.min.y + pad.offset.y),
                max: Point::new(pb.max.x + pad.offset.x, pb.max.y + pad.offset.y),
            };
            bounds = Some(match bounds {
                Some(b) => b.union(&shifted),
                None => shifted,
            });
        }
        bounds.unwrap_or(Rect::from_size(0.0, 0.0))
    }
}

/// Routing state of a net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetStatus {
    /// Zero or one pad: no geometry required
    Trivial,
    /// Awaiting routing
    Pending,
    Routed,
    /// Routing retries exhausted
    Unrouted,
}

/// A named set of pads that must be electrically continuous
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub id: NetId,
    pub name: String,
    pub class: NetClass,
    pub pads: Vec<PadId>,
    pub constraints: NetConstraints,
    pub status: NetStatus,
}

impl Net {
    /// Effective minimum trace width given the global rule
    pub fn min_width(&self, rule_min: f32) -> f32 {
        self.constraints.min_width.unwrap_or(rule_min).max(rule_min)
    }
}

/// A copper path piece on one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSegment {
    pub id: SegmentId,
    pub net: NetId,
    pub layer: LayerId,
    pub a: Point,
    pub b: Point,
    pub width: f32,
}

impl TraceSegment {
    pub fn length(&self) -> f32 {
        self.a.distance(&self.b)
    }
}

/// A layer-to-layer copper connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Via {
    pub id: ViaId,
    pub net: NetId,
    pub at: Point,
    pub layers: LayerSet,
    pub diameter: f32,
    pub drill: f32,
}

/// Reference to any copper-bearing feature, the spatial index payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureId {
    Pad(PadId),
    Segment(SegmentId),
    Via(ViaId),
}

impl FeatureId {
    /// Stable sort key so diagnostics order deterministically
    pub fn sort_key(&self) -> (u8, u64) {
        match *self {
            FeatureId::Pad(PadId(i)) => (0, i as u64),
            FeatureId::Segment(SegmentId(i)) => (1, i),
            FeatureId::Via(ViaId(i)) => (2, i),
        }
    }
}

/// Spatial index payload: feature plus its net for pair filtering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopperRef {
    pub feature: FeatureId,
    pub net: Option<NetId>,
}

/// Numeric thresholds for every rule kind, versioned per board.
///
/// Immutable input with conservative defaults (6 mil clearance, 1 oz
/// copper, 10 C rise). Power nets get the finer `power_clearance` against
/// any neighbor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: u32,
    /// Copper-to-copper gap between general signal features, mm
    pub signal_clearance: f32,
    /// Gap required when either feature belongs to a power net, mm
    pub power_clearance: f32,
    pub min_trace_width: f32,
    /// Minimum spacing between heat sources and heat-sensitive parts, mm
    pub thermal_spacing: f32,
    /// Minimum copper fill ratio under heat-generating components
    pub thermal_min_copper_ratio: f32,
    /// Routing grid cell size, mm
    pub grid_resolution: f32,
    pub metric: DistanceMetric,
    /// Allowed trace temperature rise for the ampacity model, degrees C
    pub temp_rise_c: f32,
    /// Copper thickness, micrometers (35 um = 1 oz)
    pub copper_thickness_um: f32,
    /// Current one via is rated for, amperes
    pub amps_per_via: f32,
    pub via_diameter: f32,
    pub via_drill: f32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: 1,
            signal_clearance: 0.15, // 6 mil
            power_clearance: 0.30,
            min_trace_width: 0.15,
            thermal_spacing: 2.0,
            thermal_min_copper_ratio: 0.25,
            grid_resolution: 0.25,
            metric: DistanceMetric::Euclidean,
            temp_rise_c: 10.0,
            copper_thickness_um: 35.0,
            amps_per_via: 1.0,
            via_diameter: 0.6,
            via_drill: 0.3,
        }
    }
}

impl RuleSet {
    /// Clearance threshold for a feature pair given their net classes
    pub fn clearance_between(&self, a: Option<NetClass>, b: Option<NetClass>) -> f32 {
        if a == Some(NetClass::Power) || b == Some(NetClass::Power) {
            self.power_clearance
        } else {
            self.signal_clearance
        }
    }

    /// Worst-case clearance, used to expand incremental re-check regions
    pub fn max_clearance(&self) -> f32 {
        self.signal_clearance.max(self.power_clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_set() {
        let mut set = LayerSet::default();
        assert!(set.is_empty());
        set.insert(LayerId(0));
        set.insert(LayerId(2));
        assert!(set.contains(LayerId(0)));
        assert!(!set.contains(LayerId(1)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![LayerId(0), LayerId(2)]);
    }

    #[test]
    fn test_power_clearance_dominates() {
        let rules = RuleSet::default();
        let c = rules.clearance_between(Some(NetClass::Power), Some(NetClass::General));
        assert_eq!(c, rules.power_clearance);
        let c = rules.clearance_between(Some(NetClass::General), None);
        assert_eq!(c, rules.signal_clearance);
    }
}
