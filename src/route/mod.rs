//! Multi-layer maze routing
//!
//! Nets route in fixed priority order: power first, then differential-pair
//! groups, then critical signals, then everything else; within a class,
//! shorter (more constrained) nets go first. Each net gets a Lee-style wave
//! over the routing grid, commits its discovered geometry, and re-validates
//! with incremental DRC; a clearance failure at commit bumps local
//! congestion and retries, bounded. Independent same-class nets route on
//! parallel workers against a snapshot and commit through a single
//! serialized merge point.
//!
//! # Submodules
//! - `grid` - per-net routable-area discretization
//! - `wave` - cost-wave propagation and backtrace

pub mod grid;
pub mod wave;

use crate::db::{LayerId, LayerSet, LayoutDb, NetId, NetStatus, PadId};
use crate::drc::{run_incremental_drc, Violation};
use crate::geometry::{Point, Rect};
use crate::ir::{LayoutHints, NetClass};
use crate::pipeline::CancelToken;
use crate::power::required_trace_width;
use grid::{PenaltySpot, RouteGrid};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Router tuning knobs
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Cost of a layer change, in grid steps
    pub via_cost: f32,
    /// Added cost per cell inside the congestion band around foreign copper
    pub congestion_penalty: f32,
    /// Width of the congestion band beyond hard clearance, mm
    pub congestion_radius: f32,
    /// Added cost per cell outside a hinted corridor
    pub corridor_bias: f32,
    /// Rip-up-and-retry budget per net
    pub max_net_retries: usize,
    /// Cost bump stamped around a commit-time clearance failure
    pub retry_penalty: f32,
    pub retry_radius: f32,
    /// Allowed length mismatch within a differential-pair group, mm
    pub diff_pair_tolerance: f32,
    /// Serpentine detour amplitude for length matching, mm
    pub serpentine_amplitude: f32,
    pub max_serpentine_attempts: usize,
    /// Route disjoint same-class nets on parallel workers
    pub parallel: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            via_cost: 10.0,
            congestion_penalty: 2.0,
            congestion_radius: 0.5,
            corridor_bias: 0.5,
            max_net_retries: 3,
            retry_penalty: 8.0,
            retry_radius: 1.0,
            diff_pair_tolerance: 0.5,
            serpentine_amplitude: 1.0,
            max_serpentine_attempts: 3,
            parallel: true,
        }
    }
}

/// Per-net routing statistics for the diagnostic report
#[derive(Debug, Clone, Serialize)]
pub struct NetRouteStats {
    pub net: String,
    pub attempts: usize,
    pub routed: bool,
    pub length: f32,
}

/// What routing achieved
#[derive(Debug, Clone, Serialize, Default)]
pub struct RoutingOutcome {
    pub routed: usize,
    pub unrouted: Vec<String>,
    pub total_attempts: usize,
    pub per_net: Vec<NetRouteStats>,
    /// Differential-pair groups still outside tolerance after the budget
    pub length_mismatches: Vec<String>,
    pub cancelled: bool,
}

/// A discovered route before commit
#[derive(Debug, Clone)]
struct RoutePlan {
    segments: Vec<(LayerId, Point, Point)>,
    vias: Vec<(Point, LayerSet)>,
    width: f32,
    length: f32,
}

impl RoutePlan {
    /// Per-layer bounding regions for the incremental re-check
    fn regions(&self) -> Vec<(LayerId, Rect)> {
        let mut map: HashMap<LayerId, Rect> = HashMap::new();
        for &(layer, a, b) in &self.segments {
            let r = Rect {
                min: Point::new(a.x.min(b.x), a.y.min(b.y)),
                max: Point::new(a.x.max(b.x), a.y.max(b.y)),
            };
            map.entry(layer)
                .and_modify(|acc| *acc = acc.union(&r))
                .or_insert(r);
        }
        for (at, layers) in &self.vias {
            let r = Rect::new(*at, *at);
            for layer in layers.iter() {
                map.entry(layer)
                    .and_modify(|acc| *acc = acc.union(&r))
                    .or_insert(r);
            }
        }
        let mut out: Vec<(LayerId, Rect)> = map.into_iter().collect();
        out.sort_by_key(|(l, _)| *l);
        out
    }
}

/// Route every pending net. Failure is per-net: exhausted retries mark the
/// net unrouted and the run continues.
pub fn route(
    db: &mut LayoutDb,
    config: &RouterConfig,
    hints: &LayoutHints,
    cancel: &CancelToken,
) -> RoutingOutcome {
    let start = std::time::Instant::now();
    let mut outcome = RoutingOutcome::default();

    let ordered = ordered_nets(db);
    log::info!("[route] {} nets to route", ordered.len());

    let mut queue = ordered.as_slice();
    while !queue.is_empty() {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            return outcome;
        }

        let batch = if config.parallel {
            disjoint_prefix(db, queue)
        } else {
            1
        };
        let (now, rest) = queue.split_at(batch);
        queue = rest;

        if now.len() > 1 {
            // Optimistic parallel workers: plan against the current snapshot,
            // commit serially, re-validate each against the updated state
            let plans: Vec<Option<RoutePlan>> = {
                let snapshot: &LayoutDb = db;
                now.par_iter()
                    .map(|&net_id| {
                        let corridor = hints.corridor_for(&snapshot.net(net_id).name);
                        plan_route(snapshot, net_id, &[], corridor, config)
                    })
                    .collect()
            };

            for (&net_id, plan) in now.iter().zip(plans) {
                let committed = match plan {
                    Some(plan) => try_commit(db, net_id, &plan).is_ok(),
                    None => false,
                };
                if committed {
                    db.set_net_status(net_id, NetStatus::Routed);
                    record(db, &mut outcome, net_id, 1, true);
                } else {
                    // Collision with a concurrently committed route (or no
                    // path in the snapshot): retry alone against fresh state
                    route_single(db, net_id, hints, config, &mut outcome);
                }
            }
        } else {
            route_single(db, now[0], hints, config, &mut outcome);
        }
    }

    equalize_diff_pairs(db, config, hints, &mut outcome);

    log::info!(
        "[route] {} routed, {} unrouted in {:?}",
        outcome.routed,
        outcome.unrouted.len(),
        start.elapsed()
    );
    outcome
}

/// Pending multi-pad nets in routing order: class priority, then ascending
/// span, with differential-pair groups kept adjacent
fn ordered_nets(db: &LayoutDb) -> Vec<NetId> {
    fn class_rank(class: NetClass) -> u8 {
        match class {
            NetClass::Power => 0,
            NetClass::DifferentialPair => 1,
            NetClass::CriticalSignal => 2,
            NetClass::General => 3,
        }
    }

    let span = |net_id: NetId| -> f32 {
        let net = db.net(net_id);
        let mut bounds: Option<Rect> = None;
        for &pad in &net.pads {
            let p = db.pad_position(pad);
            let r = Rect::new(p, p);
            bounds = Some(match bounds {
                Some(b) => b.union(&r),
                None => r,
            });
        }
        bounds.map_or(0.0, |b| b.width() + b.height())
    };

    let pending: Vec<NetId> = db
        .nets()
        .iter()
        .filter(|n| n.status == NetStatus::Pending && n.pads.len() >= 2)
        .map(|n| n.id)
        .collect();

    // Group spans so pair members sort together
    let mut group_span: HashMap<u32, f32> = HashMap::new();
    for &id in &pending {
        let net = db.net(id);
        if let Some(group) = net.constraints.diff_pair_group {
            let s = span(id);
            group_span
                .entry(group)
                .and_modify(|m| *m = m.min(s))
                .or_insert(s);
        }
    }

    let mut keyed: Vec<(u8, i64, u32, String, NetId)> = pending
        .into_iter()
        .map(|id| {
            let net = db.net(id);
            let s = match net.constraints.diff_pair_group {
                Some(g) => group_span[&g],
                None => span(id),
            };
            (
                class_rank(net.class),
                (s * 1000.0).round() as i64,
                net.constraints.diff_pair_group.unwrap_or(0),
                net.name.clone(),
                id,
            )
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, _, _, _, id)| id).collect()
}

/// Length of the prefix of `queue` whose nets share a class and have
/// pairwise disjoint work regions, safe to plan in parallel
fn disjoint_prefix(db: &LayoutDb, queue: &[NetId]) -> usize {
    let margin = 2.0 * db.rules().max_clearance() + db.rules().grid_resolution * 4.0;
    let region = |net_id: NetId| -> Rect {
        let net = db.net(net_id);
        let mut bounds = Rect::new(db.pad_position(net.pads[0]), db.pad_position(net.pads[0]));
        for &pad in &net.pads[1..] {
            let p = db.pad_position(pad);
            bounds = bounds.union(&Rect::new(p, p));
        }
        bounds.expanded(margin)
    };

    let first_class = db.net(queue[0]).class;
    let mut taken: Vec<Rect> = vec![region(queue[0])];
    let mut count = 1;
    for &net_id in &queue[1..] {
        let net = db.net(net_id);
        if net.class != first_class || net.constraints.diff_pair_group.is_some() {
            // Pair members share a corridor by design; keep them serial
            break;
        }
        let r = region(net_id);
        if taken.iter().any(|t| t.intersects(&r)) {
            break;
        }
        taken.push(r);
        count += 1;
    }
    count
}

fn record(db: &LayoutDb, outcome: &mut RoutingOutcome, net: NetId, attempts: usize, routed: bool) {
    outcome.total_attempts += attempts;
    if routed {
        outcome.routed += 1;
    } else {
        outcome.unrouted.push(db.net(net).name.clone());
    }
    outcome.per_net.push(NetRouteStats {
        net: db.net(net).name.clone(),
        attempts,
        routed,
        length: db.routed_length(net),
    });
}

/// Route one net with the full rip-up-and-retry loop
fn route_single(
    db: &mut LayoutDb,
    net_id: NetId,
    hints: &LayoutHints,
    config: &RouterConfig,
    outcome: &mut RoutingOutcome,
) {
    let corridor = hints.corridor_for(&db.net(net_id).name);
    let mut penalties: Vec<PenaltySpot> = Vec::new();
    let mut attempts = 0;

    while attempts <= config.max_net_retries {
        attempts += 1;
        let plan = match plan_route(db, net_id, &penalties, corridor, config) {
            Some(p) => p,
            None => break, // no path exists; retrying cannot help
        };
        match try_commit(db, net_id, &plan) {
            Ok(()) => {
                db.set_net_status(net_id, NetStatus::Routed);
                record(db, outcome, net_id, attempts, true);
                return;
            }
            Err(violations) => {
                for v in &violations {
                    // Raise cost around the collision and steer the retry away
                    penalties.push(PenaltySpot {
                        layer: violation_layer(db, v),
                        at: v.location,
                        radius: config.retry_radius,
                        amount: config.retry_penalty,
                    });
                }
                log::debug!(
                    "[route] net '{}' attempt {} collided ({} violations), retrying",
                    db.net(net_id).name,
                    attempts,
                    violations.len()
                );
            }
        }
    }

    db.set_net_status(net_id, NetStatus::Unrouted);
    log::warn!("[route] net '{}' unrouted after {} attempts", db.net(net_id).name, attempts);
    record(db, outcome, net_id, attempts, false);
}

fn violation_layer(db: &LayoutDb, v: &Violation) -> LayerId {
    v.entities
        .first()
        .map(|&f| match f {
            crate::db::FeatureId::Segment(id) => db.segment(id).map(|s| s.layer),
            crate::db::FeatureId::Via(id) => db.via(id).and_then(|via| via.layers.iter().next()),
            crate::db::FeatureId::Pad(id) => db.pad(id).layers.iter().next(),
        })
        .flatten()
        .unwrap_or(LayerId(0))
}

/// Routed width for a net: its constraint floor, raised to the
/// current-derived minimum for power nets
fn effective_width(db: &LayoutDb, net_id: NetId) -> f32 {
    let net = db.net(net_id);
    let rules = db.rules();
    let mut width = net.min_width(rules.min_trace_width);
    if let Some(current) = net.constraints.current_a {
        width = width.max(required_trace_width(current, rules));
    }
    if let Some(max) = net.constraints.max_width {
        width = width.min(max);
    }
    width
}

/// Discover a full multi-terminal route for a net without touching the
/// database. Returns `None` when some pad cannot be reached.
fn plan_route(
    db: &LayoutDb,
    net_id: NetId,
    penalties: &[PenaltySpot],
    corridor: Option<Rect>,
    config: &RouterConfig,
) -> Option<RoutePlan> {
    let net = db.net(net_id);
    let width = effective_width(db, net_id);
    let mut grid = RouteGrid::for_net(
        db,
        net,
        width,
        penalties,
        corridor,
        config.congestion_penalty,
        config.congestion_radius,
        config.corridor_bias,
    );

    let pads: Vec<PadId> = net.pads.clone();
    let pad_cells: Vec<Vec<usize>> = pads.iter().map(|&p| grid.pad_cells(db, p)).collect();

    let mut tree: Vec<usize> = pad_cells[0].clone();
    let mut tree_set: HashSet<usize> = tree.iter().copied().collect();
    let mut connected: HashSet<usize> = [0].into_iter().collect();
    let mut paths: Vec<Vec<usize>> = Vec::new();

    while connected.len() < pads.len() {
        // Wave toward every still-unconnected pad at once; the nearest wins
        let mut targets: HashSet<usize> = HashSet::new();
        let mut target_owner: HashMap<usize, usize> = HashMap::new();
        for (i, cells) in pad_cells.iter().enumerate() {
            if connected.contains(&i) {
                continue;
            }
            for &c in cells {
                targets.insert(c);
                target_owner.entry(c).or_insert(i);
            }
        }

        let path = wave::propagate(&grid, &tree, &targets, config.via_cost)?;
        let reached = *path.cells.last().unwrap();
        let pad_idx = target_owner[&reached];
        connected.insert(pad_idx);

        for &c in &path.cells {
            if tree_set.insert(c) {
                tree.push(c);
            }
        }
        for &c in &pad_cells[pad_idx] {
            if tree_set.insert(c) {
                tree.push(c);
            }
        }
        paths.push(path.cells);
    }

    Some(emit_plan(&grid, paths, width))
}

/// Turn cell paths into merged trace segments and vias. Pad copper itself
/// bridges route endpoints to pad centers, so no extra stitch geometry is
/// needed.
fn emit_plan(grid: &RouteGrid, paths: Vec<Vec<usize>>, width: f32) -> RoutePlan {
    // Branch points: a later path may land mid-run on an earlier one, and
    // the trunk must break there so the junction is a segment endpoint
    let mut junctions: HashSet<usize> = HashSet::new();
    for path in paths.iter().skip(1) {
        if let Some(&first) = path.first() {
            junctions.insert(first);
        }
    }

    let mut segments: Vec<(LayerId, Point, Point)> = Vec::new();
    let mut vias: Vec<(Point, LayerSet)> = Vec::new();

    for path in &paths {
        let mut run_start: Option<(usize, Point)> = None; // (grid layer, point)
        let mut prev: Option<usize> = None;
        let mut dir: Option<(i64, i64)> = None;

        for &cell in path {
            let (gl, x, y) = grid.coords(cell);
            let center = grid.cell_center(x, y);

            match prev {
                None => {
                    run_start = Some((gl, center));
                }
                Some(prev_cell) => {
                    let (pgl, px, py) = grid.coords(prev_cell);
                    let prev_center = grid.cell_center(px, py);

                    if pgl != gl {
                        // Layer change: close the run, drop a via
                        if let Some((sl, start)) = run_start.take() {
                            if start.distance(&prev_center) > 1e-6 {
                                segments.push((grid.board_layer(sl), start, prev_center));
                            }
                        }
                        let mut span = LayerSet::default();
                        span.insert(grid.board_layer(pgl));
                        span.insert(grid.board_layer(gl));
                        vias.push((prev_center, span));
                        run_start = Some((gl, center));
                        dir = None;
                    } else {
                        let step = (x as i64 - px as i64, y as i64 - py as i64);
                        let bend = dir.is_some() && dir != Some(step);
                        if bend || junctions.contains(&prev_cell) {
                            // Close the merged run at the bend or junction
                            if let Some((sl, start)) = run_start.take() {
                                if start.distance(&prev_center) > 1e-6 {
                                    segments.push((grid.board_layer(sl), start, prev_center));
                                }
                            }
                            run_start = Some((gl, prev_center));
                        }
                        dir = Some(step);
                    }
                }
            }
            prev = Some(cell);
        }

        if let (Some((sl, start)), Some(last)) = (run_start, prev) {
            let (_, x, y) = grid.coords(last);
            let end = grid.cell_center(x, y);
            if start.distance(&end) > 1e-6 {
                segments.push((grid.board_layer(sl), start, end));
            }
        }
    }

    vias.sort_by(|a, b| {
        ((a.0.x * 1000.0) as i64, (a.0.y * 1000.0) as i64, a.1 .0)
            .cmp(&((b.0.x * 1000.0) as i64, (b.0.y * 1000.0) as i64, b.1 .0))
    });
    vias.dedup_by(|a, b| a.0.distance(&b.0) < 1e-6 && a.1 == b.1);

    let length = segments.iter().map(|(_, a, b)| a.distance(b)).sum();
    RoutePlan {
        segments,
        vias,
        width,
        length,
    }
}

/// Commit a plan and re-validate the touched regions. On clearance failure
/// the commit is rolled back and the offending violations are returned.
fn try_commit(db: &mut LayoutDb, net_id: NetId, plan: &RoutePlan) -> Result<(), Vec<Violation>> {
    let rules_via = (db.rules().via_diameter, db.rules().via_drill);

    for &(layer, a, b) in &plan.segments {
        if db.add_trace_segment(net_id, layer, a, b, plan.width).is_err() {
            let _ = db.remove_net_routing(net_id);
            return Err(Vec::new());
        }
    }
    for (at, layers) in &plan.vias {
        if db
            .add_via(net_id, *at, *layers, rules_via.0, rules_via.1)
            .is_err()
        {
            let _ = db.remove_net_routing(net_id);
            return Err(Vec::new());
        }
    }

    // Immediate incremental re-check of everything the commit touched
    let net_name = db.net(net_id).name.clone();
    let mut offending = Vec::new();
    for (layer, region) in plan.regions() {
        for v in run_incremental_drc(db, layer, &region) {
            if v.nets.iter().any(|n| n == &net_name) {
                offending.push(v);
            }
        }
    }

    if offending.is_empty() {
        Ok(())
    } else {
        let _ = db.remove_net_routing(net_id);
        Err(offending)
    }
}

/// Re-route the shorter member of out-of-tolerance differential pairs with
/// a serpentine detour until matched or the budget runs out
fn equalize_diff_pairs(
    db: &mut LayoutDb,
    config: &RouterConfig,
    hints: &LayoutHints,
    outcome: &mut RoutingOutcome,
) {
    let mut groups: HashMap<u32, Vec<NetId>> = HashMap::new();
    for net in db.nets() {
        if net.status != NetStatus::Routed {
            continue;
        }
        if let Some(g) = net.constraints.diff_pair_group {
            groups.entry(g).or_default().push(net.id);
        }
    }
    let mut group_list: Vec<(u32, Vec<NetId>)> = groups.into_iter().collect();
    group_list.sort_by_key(|(g, _)| *g);

    for (group, members) in group_list {
        if members.len() < 2 {
            continue;
        }
        let lengths: Vec<f32> = members.iter().map(|&n| db.routed_length(n)).collect();
        let (longest_idx, &longest) = lengths
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();

        let mut matched = true;
        for (i, &net_id) in members.iter().enumerate() {
            if i == longest_idx {
                continue;
            }
            let deficit = longest - lengths[i];
            if deficit <= config.diff_pair_tolerance {
                continue;
            }
            if !lengthen_net(db, net_id, longest, config, hints) {
                matched = false;
            }
        }
        if !matched {
            let names: Vec<String> = members
                .iter()
                .map(|&n| db.net(n).name.clone())
                .collect();
            log::warn!(
                "[route] differential pair group {} outside length tolerance: {:?}",
                group,
                names
            );
            outcome.length_mismatches.push(names.join("/"));
        }
    }
}

/// Rip up and re-route a net with enough serpentine added to reach
/// `target_length` within tolerance
fn lengthen_net(
    db: &mut LayoutDb,
    net_id: NetId,
    target_length: f32,
    config: &RouterConfig,
    hints: &LayoutHints,
) -> bool {
    let corridor = hints.corridor_for(&db.net(net_id).name);
    let mut amplitude = config.serpentine_amplitude;

    for _ in 0..config.max_serpentine_attempts {
        if db.remove_net_routing(net_id).is_err() {
            return false;
        }
        let base = match plan_route(db, net_id, &[], corridor, config) {
            Some(p) => p,
            None => return false,
        };
        let deficit = target_length - base.length;
        let plan = if deficit > config.diff_pair_tolerance {
            match add_serpentine(db, &base, deficit, amplitude) {
                Some(p) => p,
                None => base.clone(),
            }
        } else {
            base.clone()
        };

        if try_commit(db, net_id, &plan).is_ok() {
            db.set_net_status(net_id, NetStatus::Routed);
            let achieved = db.routed_length(net_id);
            if (target_length - achieved).abs() <= config.diff_pair_tolerance {
                return true;
            }
            // Length still off; tighten the meander and try again
        } else if try_commit(db, net_id, &base).is_ok() {
            // Keep the plain route rather than leaving the net open
            db.set_net_status(net_id, NetStatus::Routed);
        }
        amplitude = (amplitude / 2.0).max(db.rules().grid_resolution);
    }

    // Never leave the pair member open because of a failed meander
    if db.net(net_id).status != NetStatus::Routed {
        if let Some(base) = plan_route(db, net_id, &[], corridor, config) {
            if try_commit(db, net_id, &base).is_ok() {
                db.set_net_status(net_id, NetStatus::Routed);
            }
        }
    }

    let achieved = db.routed_length(net_id);
    (target_length - achieved).abs() <= config.diff_pair_tolerance
}

/// Replace the longest straight run of a plan with a square meander adding
/// roughly `extra` mm
fn add_serpentine(db: &LayoutDb, plan: &RoutePlan, extra: f32, amplitude: f32) -> Option<RoutePlan> {
    let outline = db.outline();
    let step = db.rules().grid_resolution;

    // Longest axis-aligned segment hosts the meander
    let (host_idx, &(layer, a, b)) = plan
        .segments
        .iter()
        .enumerate()
        .filter(|(_, (_, a, b))| (a.x - b.x).abs() < 1e-6 || (a.y - b.y).abs() < 1e-6)
        .max_by(|(_, (_, a1, b1)), (_, (_, a2, b2))| {
            a1.distance(b1).total_cmp(&a2.distance(b2))
        })?;

    let run = a.distance(&b);
    let bumps_needed = (extra / (2.0 * amplitude)).ceil() as usize;
    let bumps_possible = ((run / (2.0 * step)).floor() as usize).saturating_sub(1);
    let bumps = bumps_needed.min(bumps_possible).max(1);

    let horizontal = (a.y - b.y).abs() < 1e-6;
    let d = if horizontal {
        Point::new((b.x - a.x).signum(), 0.0)
    } else {
        Point::new(0.0, (b.y - a.y).signum())
    };
    // Meander toward the side with more board room
    let mid = crate::geometry::distance::midpoint(a, b);
    let p = if horizontal {
        let up_room = outline.max.y - mid.y;
        let down_room = mid.y - outline.min.y;
        Point::new(0.0, if up_room >= down_room { 1.0 } else { -1.0 })
    } else {
        let right_room = outline.max.x - mid.x;
        let left_room = mid.x - outline.min.x;
        Point::new(if right_room >= left_room { 1.0 } else { -1.0 }, 0.0)
    };

    let pitch = run / (bumps + 1) as f32;
    let mut points = vec![a];
    for k in 1..=bumps {
        let along = pitch * k as f32;
        let base = Point::new(a.x + d.x * along, a.y + d.y * along);
        let out = Point::new(base.x + p.x * amplitude, base.y + p.y * amplitude);
        let out2 = Point::new(out.x + d.x * step, out.y + d.y * step);
        let back = Point::new(base.x + d.x * step, base.y + d.y * step);
        if !outline.contains(&out) || !outline.contains(&out2) {
            return None;
        }
        points.extend([base, out, out2, back]);
    }
    points.push(b);

    let mut segments = plan.segments.clone();
    segments.remove(host_idx);
    for pair in points.windows(2) {
        if pair[0].distance(&pair[1]) > 1e-6 {
            segments.push((layer, pair[0], pair[1]));
        }
    }

    let length = segments.iter().map(|(_, a, b)| a.distance(b)).sum();
    Some(RoutePlan {
        segments,
        vias: plan.vias.clone(),
        width: plan.width,
        length,
    })
}
