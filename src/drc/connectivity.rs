//! Electrical continuity checking
//!
//! A net with two or more pads is satisfied only when its pads, traces, and
//! vias form a single connected component. Connectivity is computed with
//! union-find over quantized feature endpoints: segment endpoints join on
//! their layer, vias join the same point across their span, and a pad joins
//! every endpoint landing on its copper area.

use crate::db::{LayoutDb, Net};
use crate::geometry::Point;
use std::collections::HashMap;

/// Plain union-find over dense indices
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// 1 um quantization so endpoint coordinates from different grid walks
/// still key to the same node
fn quantize(p: Point) -> (i64, i64) {
    ((p.x * 1000.0).round() as i64, (p.y * 1000.0).round() as i64)
}

/// True when the net's pads all sit in one connected copper component.
/// Trivial nets (fewer than two pads) are connected by definition.
pub fn net_is_connected(db: &LayoutDb, net: &Net) -> bool {
    if net.pads.len() < 2 {
        return true;
    }

    // Nodes: one per pad plus one per distinct (layer, quantized point)
    // copper junction built from segment endpoints, via points, and pad
    // centers.
    let mut nodes: HashMap<(u8, i64, i64), usize> = HashMap::new();
    let mut next = net.pads.len();
    let mut edges: Vec<(usize, usize)> = Vec::new();

    let mut junction = |layer: u8, p: Point, next: &mut usize| -> usize {
        let q = quantize(p);
        *nodes.entry((layer, q.0, q.1)).or_insert_with(|| {
            let id = *next;
            *next += 1;
            id
        })
    };

    for segment in db.segments_of_net(net.id) {
        let a = junction(segment.layer.0, segment.a, &mut next);
        let b = junction(segment.layer.0, segment.b, &mut next);
        edges.push((a, b));
    }

    for via in db.vias_of_net(net.id) {
        let mut prev: Option<usize> = None;
        for layer in via.layers.iter() {
            let j = junction(layer.0, via.at, &mut next);
            if let Some(p) = prev {
                edges.push((p, j));
            }
            prev = Some(j);
        }
    }

    for (pad_idx, &pad_id) in net.pads.iter().enumerate() {
        let center = db.pad_position(pad_id);
        for layer in db.pad(pad_id).layers.iter() {
            let j = junction(layer.0, center, &mut next);
            edges.push((pad_idx, j));
        }
    }

    // Pad copper spans an area: any junction landing on it connects. The
    // half-diagonal slack admits routes that terminate at the grid cell
    // nearest a sub-cell pad.
    let reach = db.rules().grid_resolution * 0.75;
    for (pad_idx, &pad_id) in net.pads.iter().enumerate() {
        let bounds = db.pad_shape(pad_id).bounds().expanded(reach);
        let layers = db.pad(pad_id).layers;
        for (&(layer, qx, qy), &node) in &nodes {
            if !layers.contains(crate::db::LayerId(layer)) {
                continue;
            }
            let p = Point::new(qx as f32 / 1000.0, qy as f32 / 1000.0);
            if bounds.contains(&p) {
                edges.push((pad_idx, node));
            }
        }
    }

    let mut uf = UnionFind::new(next);
    for (a, b) in edges {
        uf.union(a, b);
    }

    let root = uf.find(0);
    (1..net.pads.len()).all(|i| uf.find(i) == root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find_merges() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(3, 4);
        assert!(uf.connected(0, 1));
        assert!(!uf.connected(1, 3));
        uf.union(1, 4);
        assert!(uf.connected(0, 3));
    }

    #[test]
    fn test_quantize_merges_close_points() {
        assert_eq!(
            quantize(Point::new(1.0000001, 2.0)),
            quantize(Point::new(0.9999999, 2.0))
        );
    }
}
