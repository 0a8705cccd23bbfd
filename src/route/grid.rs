//! Routing grid
//!
//! Per-net discretization of the routable area: one cell lattice per copper
//! layer at the rule set's resolution. Foreign copper blocks cells out to
//! clearance plus half the routed width; a congestion band beyond that
//! raises cost so routes keep extra spacing where the board allows it.

use crate::db::{LayerId, LayoutDb, Net, PadId};
use crate::geometry::{Point, Rect};

/// A localized cost bump, accumulated by rip-up-and-retry
#[derive(Debug, Clone, Copy)]
pub struct PenaltySpot {
    pub layer: LayerId,
    pub at: Point,
    pub radius: f32,
    pub amount: f32,
}

pub struct RouteGrid {
    pub resolution: f32,
    pub cols: usize,
    pub rows: usize,
    /// Board layer behind each grid layer, top to bottom copper order
    pub layers: Vec<LayerId>,
    origin: Point,
    blocked: Vec<bool>,
    cost_bias: Vec<f32>,
}

impl RouteGrid {
    /// Build the grid for routing `net` at `width`.
    ///
    /// Own-net copper is free space (it is what the wave connects to);
    /// everything else blocks. `penalties` carries retry escalation,
    /// `corridor` the optional hint bias.
    pub fn for_net(
        db: &LayoutDb,
        net: &Net,
        width: f32,
        penalties: &[PenaltySpot],
        corridor: Option<Rect>,
        congestion_penalty: f32,
        congestion_radius: f32,
        corridor_bias: f32,
    ) -> Self {
        let outline = db.outline();
        let rules = db.rules();
        let resolution = rules.grid_resolution;
        let cols = (outline.width() / resolution).ceil() as usize;
        let rows = (outline.height() / resolution).ceil() as usize;
        let layers: Vec<LayerId> = db.copper_layers().map(|l| l.id).collect();

        let cells = cols * rows * layers.len();
        let mut grid = Self {
            resolution,
            cols,
            rows,
            layers,
            origin: outline.min,
            blocked: vec![false; cells],
            cost_bias: vec![0.0; cells],
        };

        // Board edge margin
        let margin = width / 2.0;
        for gl in 0..grid.layers.len() {
            for y in 0..rows {
                for x in 0..cols {
                    let c = grid.cell_center(x, y);
                    if c.x - outline.min.x < margin
                        || outline.max.x - c.x < margin
                        || c.y - outline.min.y < margin
                        || outline.max.y - c.y < margin
                    {
                        let idx = grid.idx(gl, x, y);
                        grid.blocked[idx] = true;
                    }
                }
            }
        }

        // Foreign copper: hard block within clearance, soft cost beyond
        for (gl, &layer) in grid.layers.clone().iter().enumerate() {
            let everything = outline.expanded(1.0);
            for item in db.items_in_region(layer, &everything) {
                if item.payload.net == Some(net.id) {
                    continue;
                }
                let other_class = item.payload.net.map(|n| db.net(n).class);
                let clearance = rules.clearance_between(Some(net.class), other_class);
                let inflate = clearance + width / 2.0;
                grid.block_rect(gl, &item.rect().expanded(inflate));
                grid.bias_rect(
                    gl,
                    &item.rect().expanded(inflate + congestion_radius),
                    congestion_penalty,
                );
            }
        }

        for spot in penalties {
            if let Some(gl) = grid.grid_layer_of(spot.layer) {
                grid.bias_rect(
                    gl,
                    &Rect {
                        min: Point::new(spot.at.x - spot.radius, spot.at.y - spot.radius),
                        max: Point::new(spot.at.x + spot.radius, spot.at.y + spot.radius),
                    },
                    spot.amount,
                );
            }
        }

        // Hint corridor: cells outside it cost extra on every layer
        if let Some(corridor) = corridor {
            for gl in 0..grid.layers.len() {
                for y in 0..rows {
                    for x in 0..cols {
                        if !corridor.contains(&grid.cell_center(x, y)) {
                            let idx = grid.idx(gl, x, y);
                            grid.cost_bias[idx] += corridor_bias;
                        }
                    }
                }
            }
        }

        grid
    }

    pub fn idx(&self, layer: usize, x: usize, y: usize) -> usize {
        (layer * self.rows + y) * self.cols + x
    }

    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let layer = idx / (self.rows * self.cols);
        let rem = idx % (self.rows * self.cols);
        (layer, rem % self.cols, rem / self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        Point::new(
            self.origin.x + (x as f32 + 0.5) * self.resolution,
            self.origin.y + (y as f32 + 0.5) * self.resolution,
        )
    }

    /// Grid cell containing a point, clamped to the lattice
    pub fn cell_at(&self, p: Point) -> (usize, usize) {
        let x = ((p.x - self.origin.x) / self.resolution).floor() as isize;
        let y = ((p.y - self.origin.y) / self.resolution).floor() as isize;
        (
            x.clamp(0, self.cols as isize - 1) as usize,
            y.clamp(0, self.rows as isize - 1) as usize,
        )
    }

    pub fn grid_layer_of(&self, layer: LayerId) -> Option<usize> {
        self.layers.iter().position(|&l| l == layer)
    }

    pub fn board_layer(&self, grid_layer: usize) -> LayerId {
        self.layers[grid_layer]
    }

    pub fn is_blocked(&self, idx: usize) -> bool {
        self.blocked[idx]
    }

    pub fn bias(&self, idx: usize) -> f32 {
        self.cost_bias[idx]
    }

    /// Cells a pad occupies, the sources and targets of wave expansion.
    /// Pad copper always yields at least the cell under its center, and its
    /// cells are never blocked for its own net.
    pub fn pad_cells(&mut self, db: &LayoutDb, pad: PadId) -> Vec<usize> {
        let bounds = db.pad_shape(pad).bounds();
        let layers = db.pad(pad).layers;
        let mut cells = Vec::new();
        for (gl, &layer) in self.layers.clone().iter().enumerate() {
            if !layers.contains(layer) {
                continue;
            }
            let (x0, y0) = self.cell_at(bounds.min);
            let (x1, y1) = self.cell_at(bounds.max);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    if bounds.contains(&self.cell_center(x, y)) {
                        cells.push(self.idx(gl, x, y));
                    }
                }
            }
            let (cx, cy) = self.cell_at(db.pad_position(pad));
            cells.push(self.idx(gl, cx, cy));
        }
        cells.sort_unstable();
        cells.dedup();
        for &c in &cells {
            self.blocked[c] = false;
        }
        cells
    }

    fn block_rect(&mut self, grid_layer: usize, rect: &Rect) {
        self.visit_rect(grid_layer, rect, |grid, idx| grid.blocked[idx] = true);
    }

    fn bias_rect(&mut self, grid_layer: usize, rect: &Rect, amount: f32) {
        self.visit_rect(grid_layer, rect, |grid, idx| grid.cost_bias[idx] += amount);
    }

    fn visit_rect(&mut self, grid_layer: usize, rect: &Rect, mut f: impl FnMut(&mut Self, usize)) {
        let (x0, y0) = self.cell_at(rect.min);
        let (x1, y1) = self.cell_at(rect.max);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = self.cell_center(x, y);
                if rect.contains(&c) {
                    let idx = self.idx(grid_layer, x, y);
                    f(self, idx);
                }
            }
        }
    }
}
