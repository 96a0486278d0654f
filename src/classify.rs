use crate::graph::RouteGraph;
use crate::types::{Membership, Route};
use fixedbitset::FixedBitSet;
use hashbrown::HashSet;
use petgraph::graph::{EdgeIndex, NodeIndex};

/// Partition of a route graph into the part on the shortest route and the rest.
///
/// Every stop and every connection of the graph is in exactly one of the two halves.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    on_path_nodes: Vec<NodeIndex>,
    off_path_nodes: Vec<NodeIndex>,
    on_path_edges: Vec<EdgeIndex>,
    off_path_edges: Vec<EdgeIndex>,
    // indexed by petgraph indices
    node_bits: FixedBitSet,
    edge_bits: FixedBitSet,
}

/// Splits the graph against the route.
///
/// A stop is on the path when the route visits it. A connection is on the path when the
/// route steps across it, in either direction. Route stops missing from the graph match
/// nothing and are not an error.
pub fn classify(graph: &RouteGraph, route: &Route) -> Classification {
    let visited: HashSet<&str> = route.stops().iter().map(String::as_str).collect();
    let steps: HashSet<(&str, &str)> = route.steps().map(|(a, b)| unordered(a, b)).collect();

    let mut node_bits = FixedBitSet::with_capacity(graph.node_count());
    let mut on_path_nodes = Vec::new();
    let mut off_path_nodes = Vec::new();
    for (idx, stop) in graph.stops() {
        if visited.contains(stop) {
            node_bits.insert(idx.index());
            on_path_nodes.push(idx);
        } else {
            off_path_nodes.push(idx);
        }
    }

    let mut edge_bits = FixedBitSet::with_capacity(graph.edge_count());
    let mut on_path_edges = Vec::new();
    let mut off_path_edges = Vec::new();
    for (idx, a, b, _) in graph.connections() {
        if steps.contains(&unordered(a, b)) {
            edge_bits.insert(idx.index());
            on_path_edges.push(idx);
        } else {
            off_path_edges.push(idx);
        }
    }

    Classification {
        on_path_nodes,
        off_path_nodes,
        on_path_edges,
        off_path_edges,
        node_bits,
        edge_bits,
    }
}

fn unordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Classification {
    pub fn on_path_nodes(&self) -> &[NodeIndex] {
        &self.on_path_nodes
    }

    pub fn off_path_nodes(&self) -> &[NodeIndex] {
        &self.off_path_nodes
    }

    pub fn on_path_edges(&self) -> &[EdgeIndex] {
        &self.on_path_edges
    }

    pub fn off_path_edges(&self) -> &[EdgeIndex] {
        &self.off_path_edges
    }

    pub fn node_membership(&self, idx: NodeIndex) -> Membership {
        if self.node_bits.contains(idx.index()) {
            Membership::OnPath
        } else {
            Membership::OffPath
        }
    }

    pub fn edge_membership(&self, idx: EdgeIndex) -> Membership {
        if self.edge_bits.contains(idx.index()) {
            Membership::OnPath
        } else {
            Membership::OffPath
        }
    }
}
