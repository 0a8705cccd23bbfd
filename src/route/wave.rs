//! Wave propagation
//!
//! Lee-style expansion over the routing grid: a cost wave grows from the
//! already-connected cells of a net until it reaches the nearest unconnected
//! pad. Edge cost combines step distance, a fixed penalty per layer change,
//! and the grid's congestion bias, so the heap-ordered expansion is a
//! weighted wave rather than plain breadth-first.

use super::grid::RouteGrid;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

#[derive(Clone, Copy)]
struct WaveNode {
    cost: f32,
    cell: usize,
}

impl Eq for WaveNode {}

impl PartialEq for WaveNode {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.cell == other.cell
    }
}

impl Ord for WaveNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; cell index breaks cost ties so expansion
        // order is deterministic
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for WaveNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A discovered path, front cell first
pub struct WavePath {
    pub cost: f32,
    pub cells: Vec<usize>,
}

/// Expand from `sources` until any cell of `targets` is reached.
///
/// Returns the cheapest path (source cell through target cell) or `None`
/// when the wave exhausts reachable space.
pub fn propagate(
    grid: &RouteGrid,
    sources: &[usize],
    targets: &HashSet<usize>,
    via_cost: f32,
) -> Option<WavePath> {
    const UNVISITED: u32 = u32::MAX;

    let mut dist = vec![f32::INFINITY; grid.cell_count()];
    let mut parent = vec![UNVISITED; grid.cell_count()];
    let mut heap = BinaryHeap::new();

    for &s in sources {
        if grid.is_blocked(s) {
            continue;
        }
        dist[s] = 0.0;
        heap.push(WaveNode { cost: 0.0, cell: s });
    }

    while let Some(WaveNode { cost, cell }) = heap.pop() {
        if cost > dist[cell] {
            continue;
        }
        if targets.contains(&cell) {
            return Some(WavePath {
                cost,
                cells: backtrace(cell, &parent, sources),
            });
        }

        let (layer, x, y) = grid.coords(cell);
        let mut push = |next: usize, step: f32, heap: &mut BinaryHeap<WaveNode>| {
            if grid.is_blocked(next) {
                return;
            }
            let next_cost = cost + step + grid.bias(next);
            if next_cost < dist[next] {
                dist[next] = next_cost;
                parent[next] = cell as u32;
                heap.push(WaveNode {
                    cost: next_cost,
                    cell: next,
                });
            }
        };

        if x > 0 {
            push(grid.idx(layer, x - 1, y), 1.0, &mut heap);
        }
        if x + 1 < grid.cols {
            push(grid.idx(layer, x + 1, y), 1.0, &mut heap);
        }
        if y > 0 {
            push(grid.idx(layer, x, y - 1), 1.0, &mut heap);
        }
        if y + 1 < grid.rows {
            push(grid.idx(layer, x, y + 1), 1.0, &mut heap);
        }
        // Layer changes spend a via
        if layer > 0 {
            push(grid.idx(layer - 1, x, y), via_cost, &mut heap);
        }
        if layer + 1 < grid.layers.len() {
            push(grid.idx(layer + 1, x, y), via_cost, &mut heap);
        }
    }

    None
}

fn backtrace(target: usize, parent: &[u32], sources: &[usize]) -> Vec<usize> {
    let mut cells = vec![target];
    let mut cur = target;
    while parent[cur] != u32::MAX {
        cur = parent[cur] as usize;
        cells.push(cur);
    }
    debug_assert!(sources.contains(cells.last().unwrap()));
    cells.reverse();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LayoutDb, RuleSet};
    use crate::ir::BoardIr;

    fn empty_grid() -> RouteGrid {
        let mut ir = BoardIr::new(10.0, 10.0);
        ir.components.push(crate::ir::ComponentDef {
            name: "A".into(),
            pads: vec![crate::ir::PadDef {
                pin: "1".into(),
                offset: crate::geometry::Point::new(0.0, 0.0),
                shape: crate::geometry::PadShape::Circle { diameter: 0.5 },
                layers: vec![0],
            }],
            pinned: Some(crate::geometry::Placement::new(5.0, 5.0, 0.0)),
            thermal: Default::default(),
        });
        ir.nets.push(crate::ir::NetDef {
            name: "n".into(),
            class: crate::ir::NetClass::General,
            pads: vec![("A".into(), "1".into())],
            constraints: Default::default(),
        });
        let db = LayoutDb::from_ir(&ir, RuleSet::default()).unwrap();
        let net = db.net_by_name("n").unwrap();
        RouteGrid::for_net(&db, net, 0.2, &[], None, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_straight_wave() {
        let grid = empty_grid();
        let a = grid.idx(0, 2, 2);
        let b = grid.idx(0, 12, 2);
        let targets: HashSet<usize> = [b].into_iter().collect();
        let path = propagate(&grid, &[a], &targets, 10.0).expect("path");
        assert_eq!(path.cells.first(), Some(&a));
        assert_eq!(path.cells.last(), Some(&b));
        // 10 orthogonal steps, no congestion
        assert_eq!(path.cells.len(), 11);
        assert!((path.cost - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_unreachable_returns_none() {
        let grid = empty_grid();
        let a = grid.idx(0, 2, 2);
        let targets: HashSet<usize> = HashSet::new();
        assert!(propagate(&grid, &[a], &targets, 10.0).is_none());
    }
}
