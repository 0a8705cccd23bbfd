//! Force-directed placement
//!
//! Iterative relaxation assigning component positions. Each step accumulates
//! attractive forces along net connections (weighted by net class, power
//! heaviest), repulsive forces between footprints closer than clearance,
//! a boundary force keeping parts inside the outline, and a penalty pushing
//! heat sources apart. Force accumulation within a step is parallel; steps
//! are sequential barriers. The lowest-energy configuration seen is the one
//! committed, so non-convergence degrades quality instead of failing.

use crate::db::{ComponentId, LayoutDb};
use crate::error::{LayoutError, Result};
use crate::geometry::{Placement, Point, Rect};
use crate::ir::{LayoutHints, NetClass, ThermalTag};
use crate::pipeline::CancelToken;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// Placement tuning knobs
#[derive(Debug, Clone)]
pub struct PlacerConfig {
    pub max_iterations: usize,
    /// Average per-component displacement below which iteration stops, mm
    pub convergence_epsilon: f32,
    /// Spring constant for net attraction
    pub attraction: f32,
    /// Push strength for clearance-violating footprint pairs
    pub repulsion: f32,
    /// Push strength back inside the board outline
    pub boundary: f32,
    /// Extra push between heat-generating components
    pub thermal_penalty: f32,
    /// Step size applied to the accumulated force
    pub damping: f32,
    /// Largest move a component may make in one step, mm
    pub max_step: f32,
    /// Seed for the initial scatter
    pub seed: u64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            convergence_epsilon: 0.01,
            attraction: 0.02,
            repulsion: 1.0,
            boundary: 2.0,
            thermal_penalty: 1.5,
            damping: 0.5,
            max_step: 5.0,
            seed: 42,
        }
    }
}

/// Net-class weighting of the placement objective: power dominates, then
/// signal-integrity-sensitive classes, then everything else
pub fn class_weight(class: NetClass) -> f32 {
    match class {
        NetClass::Power => 4.0,
        NetClass::DifferentialPair => 3.0,
        NetClass::CriticalSignal => 2.0,
        NetClass::General => 1.0,
    }
}

/// What placement achieved, for the diagnostic report
#[derive(Debug, Clone, Serialize)]
pub struct PlacementOutcome {
    pub iterations: usize,
    pub converged: bool,
    /// Penalty energy of the committed configuration
    pub energy: f32,
    /// Average displacement at the last step, mm
    pub residual: f32,
}

struct Body {
    id: ComponentId,
    /// Footprint half extents around the component origin
    half_w: f32,
    half_h: f32,
    pinned: bool,
    heat_source: bool,
}

/// An attraction edge between two components sharing a net
struct Spring {
    a: usize,
    b: usize,
    weight: f32,
}

/// Run force-directed placement and commit the best configuration found.
///
/// Pinned components never move but still exert forces. Hints bias the
/// initial scatter only. Returns a non-convergence error only when the best
/// configuration cannot be legalized at all; running out of iterations is a
/// reported outcome, not a failure.
pub fn place(
    db: &mut LayoutDb,
    config: &PlacerConfig,
    hints: &LayoutHints,
    cancel: &CancelToken,
) -> Result<PlacementOutcome> {
    let start = std::time::Instant::now();
    let outline = db.outline();
    let clearance = db.rules().max_clearance();
    let thermal_spacing = db.rules().thermal_spacing;

    // Snapshot the bodies once; geometry is fixed during relaxation
    let bodies: Vec<Body> = db
        .components()
        .iter()
        .map(|c| {
            let local = c.local_bounds(db.pads());
            Body {
                id: c.id,
                half_w: (local.width() / 2.0).max(0.1),
                half_h: (local.height() / 2.0).max(0.1),
                pinned: c.pinned,
                heat_source: matches!(c.thermal, ThermalTag::Source { .. }),
            }
        })
        .collect();

    if bodies.is_empty() {
        return Ok(PlacementOutcome {
            iterations: 0,
            converged: true,
            energy: 0.0,
            residual: 0.0,
        });
    }

    let springs = collect_springs(db);
    let mut positions = initial_positions(db, config, hints, &bodies, outline);

    let mut best_positions = positions.clone();
    let mut best_energy = total_energy(
        &positions,
        &bodies,
        &springs,
        outline,
        clearance,
        thermal_spacing,
        config,
    );
    let mut iterations = 0;
    let mut converged = false;
    let mut residual = f32::MAX;

    for step in 0..config.max_iterations {
        if cancel.is_cancelled() {
            break;
        }
        iterations = step + 1;

        // Parallel force accumulation against an immutable position snapshot
        let forces: Vec<Point> = (0..bodies.len())
            .into_par_iter()
            .map(|i| {
                accumulate_force(
                    i,
                    &positions,
                    &bodies,
                    &springs,
                    outline,
                    clearance,
                    thermal_spacing,
                    config,
                )
            })
            .collect();

        // Barrier: apply moves sequentially
        let mut total_displacement = 0.0;
        for (i, body) in bodies.iter().enumerate() {
            if body.pinned {
                continue;
            }
            let mut dx = forces[i].x * config.damping;
            let mut dy = forces[i].y * config.damping;
            let mag = (dx * dx + dy * dy).sqrt();
            if mag > config.max_step {
                dx *= config.max_step / mag;
                dy *= config.max_step / mag;
            }
            positions[i].x = clamp_inside(
                positions[i].x + dx,
                outline.min.x + body.half_w,
                outline.max.x - body.half_w,
            );
            positions[i].y = clamp_inside(
                positions[i].y + dy,
                outline.min.y + body.half_h,
                outline.max.y - body.half_h,
            );
            total_displacement += (dx * dx + dy * dy).sqrt();
        }

        let energy = total_energy(
            &positions,
            &bodies,
            &springs,
            outline,
            clearance,
            thermal_spacing,
            config,
        );
        if energy < best_energy
            || (energy == best_energy
                && positions_key(&positions) < positions_key(&best_positions))
        {
            // Equal-energy tie-break: lexicographic by component order
            best_energy = energy;
            best_positions = positions.clone();
        }

        residual = total_displacement / bodies.len() as f32;
        if residual < config.convergence_epsilon {
            converged = true;
            break;
        }
    }

    commit(db, &bodies, &best_positions)?;

    log::info!(
        "[place] {} components, {} iterations, energy {:.3}, converged {} in {:?}",
        bodies.len(),
        iterations,
        best_energy,
        converged,
        start.elapsed()
    );

    Ok(PlacementOutcome {
        iterations,
        converged,
        energy: best_energy,
        residual,
    })
}

fn collect_springs(db: &LayoutDb) -> Vec<Spring> {
    let mut springs = Vec::new();
    for net in db.nets() {
        if net.pads.len() < 2 {
            continue;
        }
        let mut members: Vec<usize> = net
            .pads
            .iter()
            .map(|&p| db.pad(p).component.0 as usize)
            .collect();
        members.sort_unstable();
        members.dedup();
        if members.len() < 2 {
            continue;
        }
        // Pairwise springs, weight split so large nets don't dominate
        let weight = class_weight(net.class) / (members.len() - 1) as f32;
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                springs.push(Spring {
                    a: members[i],
                    b: members[j],
                    weight,
                });
            }
        }
    }
    springs
}

fn initial_positions(
    db: &LayoutDb,
    config: &PlacerConfig,
    hints: &LayoutHints,
    bodies: &[Body],
    outline: Rect,
) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let cols = (bodies.len() as f32).sqrt().ceil().max(1.0);
    let margin = 0.1;
    let usable_w = outline.width() * (1.0 - 2.0 * margin);
    let usable_h = outline.height() * (1.0 - 2.0 * margin);

    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let comp = db.component(body.id);
            if body.pinned {
                return comp.placement.position();
            }
            if let Some(hint) = hints.position_for(&comp.name) {
                return Point::new(hint.x, hint.y);
            }
            // Jittered grid scatter keeps the start deterministic per seed
            let col = i as f32 % cols;
            let row = (i as f32 / cols).floor();
            let jitter_x: f32 = rng.gen_range(-0.5..0.5);
            let jitter_y: f32 = rng.gen_range(-0.5..0.5);
            Point::new(
                outline.min.x
                    + outline.width() * margin
                    + (col + 0.5 + jitter_x * 0.5) * usable_w / cols,
                outline.min.y
                    + outline.height() * margin
                    + (row + 0.5 + jitter_y * 0.5) * usable_h / cols,
            )
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn accumulate_force(
    i: usize,
    positions: &[Point],
    bodies: &[Body],
    springs: &[Spring],
    outline: Rect,
    clearance: f32,
    thermal_spacing: f32,
    config: &PlacerConfig,
) -> Point {
    let body = &bodies[i];
    if body.pinned {
        return Point::new(0.0, 0.0);
    }
    let pos = positions[i];
    let mut fx = 0.0;
    let mut fy = 0.0;

    // Attraction along shared nets
    for spring in springs {
        let other = if spring.a == i {
            spring.b
        } else if spring.b == i {
            spring.a
        } else {
            continue;
        };
        let d = positions[other];
        fx += config.attraction * spring.weight * (d.x - pos.x);
        fy += config.attraction * spring.weight * (d.y - pos.y);
    }

    // Repulsion from footprints that would violate clearance
    for (j, other) in bodies.iter().enumerate() {
        if j == i {
            continue;
        }
        let d = positions[j];
        let min_dx = body.half_w + other.half_w + clearance;
        let min_dy = body.half_h + other.half_h + clearance;
        let dx = pos.x - d.x;
        let dy = pos.y - d.y;
        let overlap_x = min_dx - dx.abs();
        let overlap_y = min_dy - dy.abs();
        if overlap_x > 0.0 && overlap_y > 0.0 {
            // Push along the axis of least penetration
            if overlap_x < overlap_y {
                fx += config.repulsion * overlap_x * deterministic_sign(dx, i, j);
            } else {
                fy += config.repulsion * overlap_y * deterministic_sign(dy, i, j);
            }
        }

        // Heat sources repel each other out to the thermal rule distance
        if body.heat_source && other.heat_source {
            let dist = pos.distance(&d);
            let min_dist = thermal_spacing + body.half_w.max(body.half_h);
            if dist < min_dist && dist > 1e-6 {
                let push = config.thermal_penalty * (min_dist - dist);
                fx += push * dx / dist;
                fy += push * dy / dist;
            }
        }
    }

    // Boundary force back inside the outline
    let over_left = (outline.min.x + body.half_w) - pos.x;
    let over_right = pos.x - (outline.max.x - body.half_w);
    let over_bottom = (outline.min.y + body.half_h) - pos.y;
    let over_top = pos.y - (outline.max.y - body.half_h);
    if over_left > 0.0 {
        fx += config.boundary * over_left;
    }
    if over_right > 0.0 {
        fx -= config.boundary * over_right;
    }
    if over_bottom > 0.0 {
        fy += config.boundary * over_bottom;
    }
    if over_top > 0.0 {
        fy -= config.boundary * over_top;
    }

    Point::new(fx, fy)
}

/// Clamp that tolerates a footprint wider than the board (the capacity gate
/// reports those; the placer must still not panic)
fn clamp_inside(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}

/// Tie-break direction for exactly coincident components so parallel force
/// accumulation stays deterministic
fn deterministic_sign(delta: f32, i: usize, j: usize) -> f32 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else if i < j {
        -1.0
    } else {
        1.0
    }
}

#[allow(clippy::too_many_arguments)]
fn total_energy(
    positions: &[Point],
    bodies: &[Body],
    springs: &[Spring],
    outline: Rect,
    clearance: f32,
    thermal_spacing: f32,
    config: &PlacerConfig,
) -> f32 {
    let mut energy = 0.0;

    for spring in springs {
        let d = positions[spring.a].distance(&positions[spring.b]);
        energy += config.attraction * spring.weight * d * d / 2.0;
    }

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            let dx = (positions[i].x - positions[j].x).abs();
            let dy = (positions[i].y - positions[j].y).abs();
            let overlap_x = (a.half_w + b.half_w + clearance - dx).max(0.0);
            let overlap_y = (a.half_h + b.half_h + clearance - dy).max(0.0);
            if overlap_x > 0.0 && overlap_y > 0.0 {
                energy += config.repulsion * overlap_x.min(overlap_y).powi(2);
            }
            if a.heat_source && b.heat_source {
                let dist = positions[i].distance(&positions[j]);
                let min_dist = thermal_spacing + a.half_w.max(a.half_h);
                if dist < min_dist {
                    energy += config.thermal_penalty * (min_dist - dist).powi(2);
                }
            }
        }

        let body = &bodies[i];
        let pos = positions[i];
        let escape = (outline.min.x + body.half_w - pos.x).max(0.0)
            + (pos.x - (outline.max.x - body.half_w)).max(0.0)
            + (outline.min.y + body.half_h - pos.y).max(0.0)
            + (pos.y - (outline.max.y - body.half_h)).max(0.0);
        energy += config.boundary * escape * escape;
    }

    energy
}

/// Quantized positions for the equal-energy lexicographic tie-break
fn positions_key(positions: &[Point]) -> Vec<(i64, i64)> {
    positions
        .iter()
        .map(|p| ((p.x * 10000.0).round() as i64, (p.y * 10000.0).round() as i64))
        .collect()
}

/// Commit the chosen configuration, nudging apart any residual pad overlap
/// the force model left behind
fn commit(db: &mut LayoutDb, bodies: &[Body], positions: &[Point]) -> Result<()> {
    // Name order keeps commit deterministic and matches the tie-break rule
    let mut order: Vec<usize> = (0..bodies.len()).collect();
    order.sort_by(|&a, &b| {
        db.component(bodies[a].id)
            .name
            .cmp(&db.component(bodies[b].id).name)
    });

    let step = db.rules().grid_resolution.max(0.1);
    for &i in &order {
        let body = &bodies[i];
        if body.pinned {
            continue;
        }
        let rotation = db.component(body.id).placement.rotation;
        let base = positions[i];

        let mut placed = false;
        'search: for ring in 0..32 {
            let offsets: Vec<(f32, f32)> = if ring == 0 {
                vec![(0.0, 0.0)]
            } else {
                let r = ring as f32 * step;
                vec![
                    (r, 0.0),
                    (-r, 0.0),
                    (0.0, r),
                    (0.0, -r),
                    (r, r),
                    (r, -r),
                    (-r, r),
                    (-r, -r),
                ]
            };
            for (ox, oy) in offsets {
                let candidate = Placement::new(base.x + ox, base.y + oy, rotation);
                if db.set_component_position(body.id, candidate).is_ok() {
                    placed = true;
                    break 'search;
                }
            }
        }
        if !placed {
            return Err(LayoutError::Geometry(format!(
                "cannot legalize component '{}' inside the outline",
                db.component(body.id).name
            )));
        }
    }
    Ok(())
}
