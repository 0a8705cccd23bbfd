//! Intermediate representation consumed by the layout pipeline
//!
//! Upstream compilers hand the engine a validated circuit description:
//! component instances with footprints, nets with class and constraints,
//! the layer stack, the rule set, and optional pinned positions. The engine
//! never parses a description language; these structs are the interface
//! boundary.

use crate::geometry::{PadShape, Placement, Point};
use serde::{Deserialize, Serialize};

/// A board layer definition, ordered top to bottom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Copper,
    GroundPlane,
    PowerPlane,
    Substrate,
}

impl LayerKind {
    /// Layers that carry routable/checkable copper
    pub fn is_copper(&self) -> bool {
        !matches!(self, LayerKind::Substrate)
    }
}

/// A pad within a footprint, positioned relative to the component origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadDef {
    /// Pin name, unique within the footprint (e.g. "1", "GND")
    pub pin: String,
    pub offset: Point,
    pub shape: PadShape,
    /// Indices into the layer stack this pad exists on; empty means every
    /// copper layer (through-hole)
    pub layers: Vec<usize>,
}

/// A component instance to place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Reference designator, unique on the board (e.g. "U3")
    pub name: String,
    pub pads: Vec<PadDef>,
    /// Fixed position from the IR (e.g. edge connectors); pinned components
    /// are excluded from placement moves
    pub pinned: Option<Placement>,
    pub thermal: ThermalTag,
}

/// Thermal role of a component, tagged by the upstream compiler
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ThermalTag {
    #[default]
    None,
    /// Dissipates heat; needs spacing from sensitive parts and copper fill
    Source { power_w: f32 },
    /// Degrades near heat sources
    Sensitive,
}

/// Electrical class of a net, in descending layout priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NetClass {
    Power,
    DifferentialPair,
    CriticalSignal,
    General,
}

/// Optional per-net routing constraints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetConstraints {
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub target_length: Option<f32>,
    /// Nets sharing a group id are length-matched differential pairs
    pub diff_pair_group: Option<u32>,
    /// Declared current for power nets, amperes
    pub current_a: Option<f32>,
}

/// A net definition: the pads that must become electrically continuous
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetDef {
    pub name: String,
    pub class: NetClass,
    /// (component name, pin name) pairs
    pub pads: Vec<(String, String)>,
    #[serde(default)]
    pub constraints: NetConstraints,
}

/// The validated circuit handed to the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardIr {
    /// Board outline dimensions in mm
    pub width: f32,
    pub height: f32,
    pub layers: Vec<LayerDef>,
    pub components: Vec<ComponentDef>,
    pub nets: Vec<NetDef>,
}

impl BoardIr {
    /// A bare board with the given outline and the common stackup of two
    /// copper layers around a substrate core
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            layers: vec![
                LayerDef {
                    name: "top".into(),
                    kind: LayerKind::Copper,
                },
                LayerDef {
                    name: "core".into(),
                    kind: LayerKind::Substrate,
                },
                LayerDef {
                    name: "bottom".into(),
                    kind: LayerKind::Copper,
                },
            ],
            components: Vec::new(),
            nets: Vec::new(),
        }
    }
}

/// Optional initial-condition bias from historical or learned layout data.
///
/// Hints steer the starting point of placement and the cost surface of
/// routing; they are never a correctness requirement and an empty value
/// leaves both phases fully deterministic on their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutHints {
    /// Suggested initial placement per component name
    pub positions: Vec<(String, Placement)>,
    /// Suggested routing corridor per net name; cells inside the corridor
    /// cost less during wave expansion
    pub corridors: Vec<(String, crate::geometry::Rect)>,
}

impl LayoutHints {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.corridors.is_empty()
    }

    pub fn position_for(&self, component: &str) -> Option<Placement> {
        self.positions
            .iter()
            .find(|(name, _)| name == component)
            .map(|(_, p)| *p)
    }

    pub fn corridor_for(&self, net: &str) -> Option<crate::geometry::Rect> {
        self.corridors
            .iter()
            .find(|(name, _)| name == net)
            .map(|(_, r)| *r)
    }
}
