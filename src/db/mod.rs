//! Layout database: the canonical board graph
//!
//! Constructed once from the intermediate representation, then mutated in
//! place by the placement, routing, and power phases. Mutations are
//! transactional at single-operation granularity: they validate first and
//! either fully apply or reject with no partial effect. Spatial queries go
//! through one R-tree per layer.
//!
//! # Submodules
//! - `types` - entities, ids, and the rule set

pub mod types;

pub use types::{
    Component, ComponentId, CopperRef, FeatureId, Layer, LayerId, LayerSet, Net, NetId,
    NetStatus, Pad, PadId, RuleSet, SegmentId, TraceSegment, Via, ViaId,
};

use crate::error::{LayoutError, Result};
use crate::geometry::distance::shape_gap;
use crate::geometry::{
    locate_in_rect, CopperShape, LayerIndex, PadShape, Placement, Point, Rect, SpatialItem,
};
use crate::ir::{BoardIr, NetClass};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// The in-memory board under construction
pub struct LayoutDb {
    outline: Rect,
    layers: Vec<Layer>,
    rules: RuleSet,
    components: Vec<Component>,
    pads: Vec<Pad>,
    nets: Vec<Net>,
    component_names: IndexMap<String, ComponentId>,
    net_names: IndexMap<String, NetId>,
    segments: IndexMap<SegmentId, TraceSegment>,
    vias: IndexMap<ViaId, Via>,
    next_segment: u64,
    next_via: u64,
    /// One R-tree per layer stack entry; substrate trees stay empty
    spatial: Vec<LayerIndex<CopperRef>>,
}

impl LayoutDb {
    /// Build the database from a validated intermediate representation.
    ///
    /// Fails with a `GeometryError` on an empty layer stack, invalid
    /// footprints, unresolvable net pins, or overlapping same-layer pads of
    /// different nets among already-fixed (pinned) components.
    pub fn from_ir(ir: &BoardIr, rules: RuleSet) -> Result<Self> {
        if ir.layers.is_empty() {
            return Err(LayoutError::Geometry("layer stack is empty".into()));
        }
        if !ir.layers.iter().any(|l| l.kind.is_copper()) {
            return Err(LayoutError::Geometry("no copper layer in stack".into()));
        }
        if ir.width <= 0.0 || ir.height <= 0.0 {
            return Err(LayoutError::Geometry(format!(
                "invalid board outline {}x{}",
                ir.width, ir.height
            )));
        }
        if ir.layers.len() > 32 {
            return Err(LayoutError::Geometry("layer stack exceeds 32 layers".into()));
        }

        let layers: Vec<Layer> = ir
            .layers
            .iter()
            .enumerate()
            .map(|(i, def)| Layer {
                id: LayerId(i as u8),
                name: def.name.clone(),
                kind: def.kind,
            })
            .collect();

        let all_copper = {
            let mut set = LayerSet::default();
            for l in &layers {
                if l.kind.is_copper() {
                    set.insert(l.id);
                }
            }
            set
        };

        let outline = Rect::from_size(ir.width, ir.height);
        let mut db = Self {
            outline,
            layers,
            rules,
            components: Vec::new(),
            pads: Vec::new(),
            nets: Vec::new(),
            component_names: IndexMap::new(),
            net_names: IndexMap::new(),
            segments: IndexMap::new(),
            vias: IndexMap::new(),
            next_segment: 0,
            next_via: 0,
            spatial: vec![LayerIndex::new(); ir.layers.len()],
        };

        // Components and pads
        for def in &ir.components {
            if db.component_names.contains_key(&def.name) {
                return Err(LayoutError::Geometry(format!(
                    "duplicate component name '{}'",
                    def.name
                )));
            }
            if def.pads.is_empty() {
                return Err(LayoutError::Geometry(format!(
                    "component '{}' has an empty footprint",
                    def.name
                )));
            }

            let comp_id = ComponentId(db.components.len() as u32);
            let mut pad_ids = Vec::with_capacity(def.pads.len());
            let mut seen_pins = HashSet::new();

            for pad_def in &def.pads {
                if !pad_def.shape.is_valid() {
                    return Err(LayoutError::Geometry(format!(
                        "component '{}' pad '{}' has non-positive dimensions",
                        def.name, pad_def.pin
                    )));
                }
                if !seen_pins.insert(pad_def.pin.as_str()) {
                    return Err(LayoutError::Geometry(format!(
                        "component '{}' repeats pin '{}'",
                        def.name, pad_def.pin
                    )));
                }
                let layer_set = if pad_def.layers.is_empty() {
                    all_copper
                } else {
                    let mut set = LayerSet::default();
                    for &idx in &pad_def.layers {
                        let layer = db.layers.get(idx).ok_or_else(|| {
                            LayoutError::Geometry(format!(
                                "component '{}' pad '{}' references layer {} of a {}-layer stack",
                                def.name,
                                pad_def.pin,
                                idx,
                                db.layers.len()
                            ))
                        })?;
                        if !layer.kind.is_copper() {
                            return Err(LayoutError::Geometry(format!(
                                "component '{}' pad '{}' lands on substrate layer '{}'",
                                def.name, pad_def.pin, layer.name
                            )));
                        }
                        set.insert(layer.id);
                    }
                    set
                };

                let pad_id = PadId(db.pads.len() as u32);
                db.pads.push(Pad {
                    id: pad_id,
                    component: comp_id,
                    pin: pad_def.pin.clone(),
                    offset: pad_def.offset,
                    shape: pad_def.shape,
                    layers: layer_set,
                    net: None,
                });
                pad_ids.push(pad_id);
            }

            // Unplaced components start at the outline center; only pinned
            // positions count as committed geometry
            let (placement, pinned) = match def.pinned {
                Some(p) => (p, true),
                None => {
                    let c = outline.center();
                    (Placement::new(c.x, c.y, 0.0), false)
                }
            };

            db.components.push(Component {
                id: comp_id,
                name: def.name.clone(),
                pads: pad_ids,
                placement,
                pinned,
                thermal: def.thermal,
                committed: pinned,
            });
            db.component_names.insert(def.name.clone(), comp_id);
        }

        // Nets
        for net_def in &ir.nets {
            if db.net_names.contains_key(&net_def.name) {
                return Err(LayoutError::Geometry(format!(
                    "duplicate net name '{}'",
                    net_def.name
                )));
            }
            let net_id = NetId(db.nets.len() as u32);
            let mut pad_ids = Vec::with_capacity(net_def.pads.len());
            for (comp_name, pin) in &net_def.pads {
                let comp_id = db.component_names.get(comp_name).copied().ok_or_else(|| {
                    LayoutError::UnknownEntity(format!(
                        "net '{}' references component '{}'",
                        net_def.name, comp_name
                    ))
                })?;
                let pad_id = db.components[comp_id.0 as usize]
                    .pads
                    .iter()
                    .copied()
                    .find(|&p| db.pads[p.0 as usize].pin == *pin)
                    .ok_or_else(|| {
                        LayoutError::UnknownEntity(format!(
                            "net '{}' references pin '{}.{}'",
                            net_def.name, comp_name, pin
                        ))
                    })?;
                let pad = &mut db.pads[pad_id.0 as usize];
                if let Some(existing) = pad.net {
                    return Err(LayoutError::Geometry(format!(
                        "pad '{}.{}' bound to both '{}' and '{}'",
                        comp_name, pin, db.nets[existing.0 as usize].name, net_def.name
                    )));
                }
                pad.net = Some(net_id);
                pad_ids.push(pad_id);
            }

            let status = if pad_ids.len() < 2 {
                NetStatus::Trivial
            } else {
                NetStatus::Pending
            };
            db.nets.push(Net {
                id: net_id,
                name: net_def.name.clone(),
                class: net_def.class,
                pads: pad_ids,
                constraints: net_def.constraints.clone(),
                status,
            });
            db.net_names.insert(net_def.name.clone(), net_id);
        }

        // Index every pad at its current world position
        for pad_idx in 0..db.pads.len() {
            db.index_pad(PadId(pad_idx as u32));
        }

        // Pinned footprints are committed geometry: they must sit inside the
        // outline and must not overlap each other's foreign-net pads
        for comp in &db.components {
            if !comp.pinned {
                continue;
            }
            let world = comp.placement.apply_rect(comp.local_bounds(&db.pads));
            if !db.outline.contains_rect(&world) {
                return Err(LayoutError::Geometry(format!(
                    "pinned component '{}' extends outside the board outline",
                    comp.name
                )));
            }
        }
        db.check_committed_pad_overlaps()?;

        Ok(db)
    }

    // --- accessors ---

    pub fn outline(&self) -> Rect {
        self.outline
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn copper_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.kind.is_copper())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0 as usize]
    }

    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.component_names.get(name).map(|&id| self.component(id))
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn pad(&self, id: PadId) -> &Pad {
        &self.pads[id.0 as usize]
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0 as usize]
    }

    pub fn net_by_name(&self, name: &str) -> Option<&Net> {
        self.net_names.get(name).map(|&id| self.net(id))
    }

    pub fn pads_of_net(&self, net: NetId) -> &[PadId] {
        &self.nets[net.0 as usize].pads
    }

    pub fn segments(&self) -> impl Iterator<Item = &TraceSegment> {
        self.segments.values()
    }

    pub fn vias(&self) -> impl Iterator<Item = &Via> {
        self.vias.values()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&TraceSegment> {
        self.segments.get(&id)
    }

    pub fn via(&self, id: ViaId) -> Option<&Via> {
        self.vias.get(&id)
    }

    pub fn segments_of_net(&self, net: NetId) -> impl Iterator<Item = &TraceSegment> {
        self.segments.values().filter(move |s| s.net == net)
    }

    pub fn vias_of_net(&self, net: NetId) -> impl Iterator<Item = &Via> {
        self.vias.values().filter(move |v| v.net == net)
    }

    /// Total routed copper length of a net, mm
    pub fn routed_length(&self, net: NetId) -> f32 {
        self.segments_of_net(net).map(|s| s.length()).sum()
    }

    /// World-space center of a pad
    pub fn pad_position(&self, id: PadId) -> Point {
        let pad = self.pad(id);
        let comp = self.component(pad.component);
        comp.placement.apply(pad.offset)
    }

    /// World-space copper outline of a pad
    pub fn pad_shape(&self, id: PadId) -> CopperShape {
        let pad = self.pad(id);
        let comp = self.component(pad.component);
        match pad.shape {
            PadShape::Circle { diameter } => CopperShape::Circle {
                center: comp.placement.apply(pad.offset),
                radius: diameter / 2.0,
            },
            _ => {
                let local = pad.shape.bounds();
                let shifted = Rect {
                    min: Point::new(local.min.x + pad.offset.x, local.min.y + pad.offset.y),
                    max: Point::new(local.max.x + pad.offset.x, local.max.y + pad.offset.y),
                };
                CopperShape::Box(comp.placement.apply_rect(shifted))
            }
        }
    }

    /// World-space copper outline of any feature
    pub fn feature_shape(&self, feature: FeatureId) -> CopperShape {
        match feature {
            FeatureId::Pad(id) => self.pad_shape(id),
            FeatureId::Segment(id) => {
                let s = &self.segments[&id];
                CopperShape::Stroke {
                    a: s.a,
                    b: s.b,
                    width: s.width,
                }
            }
            FeatureId::Via(id) => {
                let v = &self.vias[&id];
                CopperShape::Circle {
                    center: v.at,
                    radius: v.diameter / 2.0,
                }
            }
        }
    }

    pub fn feature_net(&self, feature: FeatureId) -> Option<NetId> {
        match feature {
            FeatureId::Pad(id) => self.pad(id).net,
            FeatureId::Segment(id) => Some(self.segments[&id].net),
            FeatureId::Via(id) => Some(self.vias[&id].net),
        }
    }

    /// World-space footprint bounding box of a component
    pub fn component_bounds(&self, id: ComponentId) -> Rect {
        let comp = self.component(id);
        comp.placement.apply_rect(comp.local_bounds(&self.pads))
    }

    /// Copper features whose bounds intersect `region` on `layer`
    pub fn items_in_region(
        &self,
        layer: LayerId,
        region: &Rect,
    ) -> impl Iterator<Item = &SpatialItem<CopperRef>> {
        locate_in_rect(&self.spatial[layer.0 as usize], region)
    }

    /// All indexed copper features on a layer
    pub fn items_on_layer(&self, layer: LayerId) -> impl Iterator<Item = &SpatialItem<CopperRef>> {
        self.spatial[layer.0 as usize].iter()
    }

    /// Nets with copper touching `region` on `layer`, deterministic order
    pub fn nets_in_region(&self, layer: LayerId, region: &Rect) -> Vec<NetId> {
        let mut ids: Vec<NetId> = self
            .items_in_region(layer, region)
            .filter_map(|i| i.payload.net)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    // --- mutations (validate first, then apply) ---

    /// Move a component to a committed position.
    ///
    /// Rejected when the footprint would leave the board outline or a pad
    /// would overlap a committed pad of a different net on a shared layer.
    pub fn set_component_position(&mut self, id: ComponentId, placement: Placement) -> Result<()> {
        let comp = &self.components[id.0 as usize];
        let world = placement.apply_rect(comp.local_bounds(&self.pads));
        if !self.outline.contains_rect(&world) {
            return Err(LayoutError::MutationRejected(format!(
                "component '{}' would extend outside the board outline",
                comp.name
            )));
        }

        // Validate the new pad positions against committed foreign copper
        for &pad_id in &comp.pads {
            let pad = &self.pads[pad_id.0 as usize];
            let shape = match pad.shape {
                PadShape::Circle { diameter } => CopperShape::Circle {
                    center: placement.apply(pad.offset),
                    radius: diameter / 2.0,
                },
                _ => {
                    let local = pad.shape.bounds();
                    let shifted = Rect {
                        min: Point::new(local.min.x + pad.offset.x, local.min.y + pad.offset.y),
                        max: Point::new(local.max.x + pad.offset.x, local.max.y + pad.offset.y),
                    };
                    CopperShape::Box(placement.apply_rect(shifted))
                }
            };
            let probe = shape.bounds();
            for layer in pad.layers.iter() {
                for item in self.items_in_region(layer, &probe) {
                    let other_pad = match item.payload.feature {
                        FeatureId::Pad(p) => &self.pads[p.0 as usize],
                        _ => continue,
                    };
                    if other_pad.component == id {
                        continue;
                    }
                    if !self.components[other_pad.component.0 as usize].committed {
                        continue;
                    }
                    if other_pad.net.is_some() && other_pad.net == pad.net {
                        continue;
                    }
                    let (gap, _) =
                        shape_gap(&shape, &self.pad_shape(other_pad.id), self.rules.metric);
                    if gap < -1e-6 {
                        return Err(LayoutError::MutationRejected(format!(
                            "pad '{}.{}' would overlap pad '{}.{}'",
                            comp.name,
                            pad.pin,
                            self.components[other_pad.component.0 as usize].name,
                            other_pad.pin
                        )));
                    }
                }
            }
        }

        // Apply: reindex the moved pads
        let pad_ids = self.components[id.0 as usize].pads.clone();
        for pad_id in &pad_ids {
            self.unindex_pad(*pad_id);
        }
        let comp = &mut self.components[id.0 as usize];
        comp.placement = placement;
        comp.committed = true;
        for pad_id in pad_ids {
            self.index_pad(pad_id);
        }
        Ok(())
    }

    /// Add a routed trace segment
    pub fn add_trace_segment(
        &mut self,
        net: NetId,
        layer: LayerId,
        a: Point,
        b: Point,
        width: f32,
    ) -> Result<SegmentId> {
        self.validate_net(net)?;
        self.validate_copper_layer(layer)?;
        if width <= 0.0 {
            return Err(LayoutError::MutationRejected(format!(
                "trace width {} must be positive",
                width
            )));
        }
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return Err(LayoutError::MutationRejected(
                "trace endpoints must be finite".into(),
            ));
        }

        let id = SegmentId(self.next_segment);
        self.next_segment += 1;
        let segment = TraceSegment {
            id,
            net,
            layer,
            a,
            b,
            width,
        };
        let bounds = CopperShape::Stroke { a, b, width }.bounds();
        self.segments.insert(id, segment);
        self.spatial[layer.0 as usize].insert(SpatialItem::new(
            CopperRef {
                feature: FeatureId::Segment(id),
                net: Some(net),
            },
            bounds,
        ));
        Ok(id)
    }

    /// Add a via spanning the given layers
    pub fn add_via(
        &mut self,
        net: NetId,
        at: Point,
        layers: LayerSet,
        diameter: f32,
        drill: f32,
    ) -> Result<ViaId> {
        self.validate_net(net)?;
        if layers.len() < 2 {
            return Err(LayoutError::MutationRejected(
                "a via must span at least two layers".into(),
            ));
        }
        for layer in layers.iter() {
            self.validate_copper_layer(layer)?;
        }
        if drill <= 0.0 || diameter <= drill {
            return Err(LayoutError::MutationRejected(format!(
                "via diameter {} / drill {} invalid",
                diameter, drill
            )));
        }

        let id = ViaId(self.next_via);
        self.next_via += 1;
        let via = Via {
            id,
            net,
            at,
            layers,
            diameter,
            drill,
        };
        let bounds = CopperShape::Circle {
            center: at,
            radius: diameter / 2.0,
        }
        .bounds();
        self.vias.insert(id, via);
        for layer in layers.iter() {
            self.spatial[layer.0 as usize].insert(SpatialItem::new(
                CopperRef {
                    feature: FeatureId::Via(id),
                    net: Some(net),
                },
                bounds,
            ));
        }
        Ok(id)
    }

    pub fn remove_trace_segment(&mut self, id: SegmentId) -> Result<()> {
        let segment = self
            .segments
            .shift_remove(&id)
            .ok_or_else(|| LayoutError::UnknownEntity(format!("segment {:?}", id)))?;
        let bounds = CopperShape::Stroke {
            a: segment.a,
            b: segment.b,
            width: segment.width,
        }
        .bounds();
        self.spatial[segment.layer.0 as usize].remove(&SpatialItem::new(
            CopperRef {
                feature: FeatureId::Segment(id),
                net: Some(segment.net),
            },
            bounds,
        ));
        Ok(())
    }

    pub fn remove_via(&mut self, id: ViaId) -> Result<()> {
        let via = self
            .vias
            .shift_remove(&id)
            .ok_or_else(|| LayoutError::UnknownEntity(format!("via {:?}", id)))?;
        let bounds = CopperShape::Circle {
            center: via.at,
            radius: via.diameter / 2.0,
        }
        .bounds();
        for layer in via.layers.iter() {
            self.spatial[layer.0 as usize].remove(&SpatialItem::new(
                CopperRef {
                    feature: FeatureId::Via(id),
                    net: Some(via.net),
                },
                bounds,
            ));
        }
        Ok(())
    }

    /// Rip up every segment and via of a net and mark it pending again
    pub fn remove_net_routing(&mut self, net: NetId) -> Result<()> {
        self.validate_net(net)?;
        let segment_ids: Vec<SegmentId> = self.segments_of_net(net).map(|s| s.id).collect();
        let via_ids: Vec<ViaId> = self.vias_of_net(net).map(|v| v.id).collect();
        for id in segment_ids {
            self.remove_trace_segment(id)?;
        }
        for id in via_ids {
            self.remove_via(id)?;
        }
        let n = &mut self.nets[net.0 as usize];
        if n.status != NetStatus::Trivial {
            n.status = NetStatus::Pending;
        }
        Ok(())
    }

    pub fn set_net_status(&mut self, net: NetId, status: NetStatus) {
        self.nets[net.0 as usize].status = status;
    }

    /// Raise a net's minimum width constraint (power escalation path)
    pub fn raise_net_min_width(&mut self, net: NetId, width: f32) {
        let c = &mut self.nets[net.0 as usize].constraints;
        c.min_width = Some(c.min_width.map_or(width, |w| w.max(width)));
    }

    /// Serializable copy of the final geometry for downstream consumers
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            outline: self.outline,
            layers: self.layers.clone(),
            components: self
                .components
                .iter()
                .map(|c| ComponentSnapshot {
                    name: c.name.clone(),
                    placement: c.placement,
                    pinned: c.pinned,
                    committed: c.committed,
                })
                .collect(),
            segments: self.segments.values().cloned().collect(),
            vias: self.vias.values().cloned().collect(),
            nets: self
                .nets
                .iter()
                .map(|n| NetStatusReportEntry {
                    name: n.name.clone(),
                    class: n.class,
                    status: n.status,
                    routed_length: self.routed_length(n.id),
                })
                .collect(),
        }
    }

    // --- internals ---

    fn validate_net(&self, net: NetId) -> Result<()> {
        if (net.0 as usize) < self.nets.len() {
            Ok(())
        } else {
            Err(LayoutError::UnknownEntity(format!("net {:?}", net)))
        }
    }

    fn validate_copper_layer(&self, layer: LayerId) -> Result<()> {
        match self.layers.get(layer.0 as usize) {
            Some(l) if l.kind.is_copper() => Ok(()),
            Some(l) => Err(LayoutError::MutationRejected(format!(
                "layer '{}' is not copper",
                l.name
            ))),
            None => Err(LayoutError::UnknownEntity(format!("layer {:?}", layer))),
        }
    }

    fn index_pad(&mut self, id: PadId) {
        let bounds = self.pad_shape(id).bounds();
        let layers = self.pads[id.0 as usize].layers;
        let item = CopperRef {
            feature: FeatureId::Pad(id),
            net: self.pads[id.0 as usize].net,
        };
        for layer in layers.iter() {
            self.spatial[layer.0 as usize].insert(SpatialItem::new(item, bounds));
        }
    }

    fn unindex_pad(&mut self, id: PadId) {
        let bounds = self.pad_shape(id).bounds();
        let layers = self.pads[id.0 as usize].layers;
        let item = CopperRef {
            feature: FeatureId::Pad(id),
            net: self.pads[id.0 as usize].net,
        };
        for layer in layers.iter() {
            self.spatial[layer.0 as usize].remove(&SpatialItem::new(item, bounds));
        }
    }

    fn check_committed_pad_overlaps(&self) -> Result<()> {
        for pad in &self.pads {
            if !self.components[pad.component.0 as usize].committed {
                continue;
            }
            let shape = self.pad_shape(pad.id);
            let probe = shape.bounds();
            for layer in pad.layers.iter() {
                for item in self.items_in_region(layer, &probe) {
                    let other = match item.payload.feature {
                        // Pairs checked once
                        FeatureId::Pad(p) if p > pad.id => &self.pads[p.0 as usize],
                        _ => continue,
                    };
                    if other.component == pad.component {
                        continue;
                    }
                    if !self.components[other.component.0 as usize].committed {
                        continue;
                    }
                    if other.net.is_some() && other.net == pad.net {
                        continue;
                    }
                    let (gap, _) = shape_gap(&shape, &self.pad_shape(other.id), self.rules.metric);
                    if gap < -1e-6 {
                        return Err(LayoutError::PadOverlap {
                            pad_a: format!(
                                "{}.{}",
                                self.components[pad.component.0 as usize].name, pad.pin
                            ),
                            pad_b: format!(
                                "{}.{}",
                                self.components[other.component.0 as usize].name, other.pin
                            ),
                            layer: self.layers[layer.0 as usize].name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Final geometry handed to manufacturing-output and visualization layers
#[derive(Debug, Clone, Serialize)]
pub struct LayoutSnapshot {
    pub outline: Rect,
    pub layers: Vec<Layer>,
    pub components: Vec<ComponentSnapshot>,
    pub segments: Vec<TraceSegment>,
    pub vias: Vec<Via>,
    pub nets: Vec<NetStatusReportEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSnapshot {
    pub name: String,
    pub placement: Placement,
    pub pinned: bool,
    pub committed: bool,
}

/// Per-net routing outcome carried in snapshots and diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct NetStatusReportEntry {
    pub name: String,
    pub class: NetClass,
    pub status: NetStatus,
    pub routed_length: f32,
}
