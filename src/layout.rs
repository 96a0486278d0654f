use crate::graph::RouteGraph;
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn sub(&self, p: &Point) -> Point {
        Point::new(self.x - p.x, self.y - p.y)
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Node positions, indexed by petgraph node index. Coordinates lie in `[-1, 1]`.
#[derive(Clone, Debug)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    pub fn position(&self, idx: NodeIndex) -> Point {
        self.positions[idx.index()]
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutOptions {
    /// Simulation steps of `TICK` seconds each.
    pub iterations: usize,
    /// Fixed seed for reproducible pictures. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            iterations: 300,
            seed: None,
        }
    }
}

const TICK: f32 = 0.016;
/// Side of the square the stops are scattered over before the simulation starts.
const SPREAD: f32 = 200.0;
/// Cap on parallel springs drawn for one heavy connection.
const MAX_SPRINGS: usize = 4;

/// Force-directed spring layout on top of the `force_graph` simulation.
///
/// Stops start at random positions, drawn from the seed when one is given, and repel each
/// other while connections pull their ends together. A connection weighing more than the
/// mean pulls harder: it is added as up to `MAX_SPRINGS` parallel springs. After a fixed
/// number of ticks the result is centered and scaled so the farthest coordinate is at
/// distance 1 on its axis.
pub fn spring_layout(graph: &RouteGraph, options: &LayoutOptions) -> Layout {
    let n = graph.node_count();
    if n == 0 {
        return Layout { positions: Vec::new() };
    }
    if n == 1 {
        return Layout {
            positions: vec![Point::new(0.0, 0.0)],
        };
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let start: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.random::<f64>(), rng.random::<f64>()))
        .collect();

    let mut sim: ForceGraph<NodeIndex, ()> = ForceGraph::new(SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    });
    let handles: Vec<DefaultNodeIdx> = graph
        .inner()
        .node_indices()
        .map(|idx| {
            let p = start[idx.index()];
            sim.add_node(NodeData {
                x: p.x as f32 * SPREAD,
                y: p.y as f32 * SPREAD,
                mass: 10.0,
                is_anchor: false,
                user_data: idx,
            })
        })
        .collect();

    let edges: Vec<(usize, usize, f64)> = graph
        .inner()
        .edge_references()
        .filter(|e| e.source() != e.target())
        .map(|e| (e.source().index(), e.target().index(), *e.weight()))
        .collect();
    let mean = edges.iter().map(|&(_, _, w)| w).sum::<f64>() / edges.len().max(1) as f64;
    for &(u, v, weight) in &edges {
        for _ in 0..springs(weight, mean) {
            sim.add_edge(handles[u], handles[v], EdgeData::default());
        }
    }

    for _ in 0..options.iterations {
        sim.update(TICK);
    }

    let mut pos = start;
    sim.visit_nodes(|node| {
        let (x, y) = (node.x() as f64, node.y() as f64);
        // a stop the simulation lost keeps its starting place
        if x.is_finite() && y.is_finite() {
            pos[node.data.user_data.index()] = Point::new(x, y);
        } else {
            warn!(stop = node.data.user_data.index(), "layout diverged");
        }
    });

    rescale(&mut pos);
    Layout { positions: pos }
}

/// Number of parallel springs for a connection of `weight` when the mean weight is `mean`.
fn springs(weight: f64, mean: f64) -> usize {
    if mean <= 0.0 {
        return 1;
    }
    ((weight / mean).round() as usize).clamp(1, MAX_SPRINGS)
}

fn rescale(pos: &mut [Point]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.y).sum::<f64>() / n;
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.x /= lim;
            p.y /= lim;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::from_str;

    fn seeded(seed: u64) -> LayoutOptions {
        LayoutOptions {
            seed: Some(seed),
            ..LayoutOptions::default()
        }
    }

    #[test]
    fn test_every_stop_gets_a_finite_position() {
        let graph = from_str("a:b=1.0/c=2.0/\nc:d=1.0/\ne:\na-c-d").unwrap().graph();
        let layout = spring_layout(&graph, &seeded(7));
        assert_eq!(layout.positions().len(), graph.node_count());
        for p in layout.positions() {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_positions_are_distinct() {
        let graph = from_str("a:b=1.0/\nb:c=1.0/\nc:a=1.0/\na-b").unwrap().graph();
        let layout = spring_layout(&graph, &seeded(1));
        let p = layout.positions();
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert!(p[i].sub(&p[j]).norm() > 1e-6);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let graph = from_str("a:b=1.0/\nb:c=1.0/\na-b-c").unwrap().graph();
        let first = spring_layout(&graph, &seeded(42));
        let second = spring_layout(&graph, &seeded(42));
        assert_eq!(first.positions(), second.positions());
    }

    #[test]
    fn test_heavier_connections_pull_harder() {
        assert_eq!(springs(1.0, 2.0), 1);
        assert_eq!(springs(0.0, 2.0), 1);
        assert_eq!(springs(4.0, 2.0), 2);
        assert_eq!(springs(100.0, 2.0), MAX_SPRINGS);
        assert_eq!(springs(0.0, 0.0), 1);
    }

    #[test]
    fn test_weights_shape_the_layout() {
        // same shape, different weights on the first connection
        let light = from_str("a:b=1.0/\nb:c=1.0/\nc:d=1.0/\na-b").unwrap().graph();
        let heavy = from_str("a:b=9.0/\nb:c=1.0/\nc:d=1.0/\na-b").unwrap().graph();
        let light = spring_layout(&light, &seeded(3));
        let heavy = spring_layout(&heavy, &seeded(3));
        assert_ne!(light.positions(), heavy.positions());
    }

    #[test]
    fn test_disconnected_stops_are_placed() {
        let graph = from_str("a:\nb:\nc:\na").unwrap().graph();
        let layout = spring_layout(&graph, &seeded(11));
        assert_eq!(layout.positions().len(), 3);
        assert!(layout.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_single_stop_is_centered() {
        let graph = from_str("a:\na").unwrap().graph();
        let layout = spring_layout(&graph, &LayoutOptions::default());
        assert_eq!(layout.positions(), [Point::new(0.0, 0.0)]);
    }
}
