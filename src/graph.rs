use crate::input::AdjacencyRecord;
use crate::types::{Stop, UnGraph};
use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

/// Undirected weighted route network.
///
/// Stops are unique by name and keep the order in which they were first mentioned.
/// There is at most one connection per unordered pair of stops.
#[derive(Clone, Debug)]
pub struct RouteGraph {
    graph: UnGraph,
    index: HashMap<Stop, NodeIndex>,
}

impl RouteGraph {
    /// Folds adjacency records into a graph.
    ///
    /// For each record the source is registered, even with no destinations. For each
    /// `(a, b, w)` both stops are registered and the connection `a -- b` gets weight `w`.
    /// A pair declared twice, in either orientation, keeps the last weight.
    pub fn from_records(records: &[AdjacencyRecord]) -> Self {
        let mut graph = Self {
            graph: UnGraph::new_undirected(),
            index: HashMap::new(),
        };

        for record in records {
            let a = graph.add_stop(&record.source);
            for (dest, weight) in &record.destinations {
                let b = graph.add_stop(dest);
                graph.add_connection(a, b, *weight);
            }
        }

        debug!(
            stops = graph.node_count(),
            connections = graph.edge_count(),
            "built route graph"
        );
        graph
    }

    fn add_stop(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn add_connection(&mut self, a: NodeIndex, b: NodeIndex, weight: f64) {
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let previous = std::mem::replace(&mut self.graph[edge], weight);
                if previous != weight {
                    debug!(
                        a = %self.graph[a],
                        b = %self.graph[b],
                        previous,
                        weight,
                        "connection declared twice, keeping the last weight"
                    );
                }
            }
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Underlying petgraph graph.
    pub fn inner(&self) -> &UnGraph {
        &self.graph
    }

    pub fn stop_index(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn contains_stop(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn stop(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Stops in first-mention order.
    pub fn stops(&self) -> impl Iterator<Item = (NodeIndex, &str)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, self.graph[idx].as_str()))
    }

    /// Connections as `(edge, a, b, weight)`, in first-declaration order.
    pub fn connections(&self) -> impl Iterator<Item = (EdgeIndex, &str, &str, f64)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                edge.id(),
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
                *edge.weight(),
            )
        })
    }

    /// Weight of the connection between `a` and `b`, in either orientation.
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let edge = self.graph.find_edge(self.stop_index(a)?, self.stop_index(b)?)?;
        Some(self.graph[edge])
    }

    /// Connection between `a` and `b`, in either orientation.
    pub fn find_connection(&self, a: &str, b: &str) -> Option<EdgeIndex> {
        self.graph.find_edge(self.stop_index(a)?, self.stop_index(b)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{decode, parse_adjacency};

    fn records(lines: &[&str]) -> Vec<AdjacencyRecord> {
        lines.iter().map(|l| parse_adjacency(l).unwrap()).collect()
    }

    #[test]
    fn test_scenario_graph() {
        let graph = RouteGraph::from_records(&records(&[
            "Stop1:Stop2=3.0/",
            "Stop2:Stop1=3.0/Stop3=4.0/",
        ]));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let stops: Vec<_> = graph.stops().map(|(_, s)| s).collect();
        assert_eq!(stops, vec!["Stop1", "Stop2", "Stop3"]);
        assert_eq!(graph.weight("Stop1", "Stop2"), Some(3.0));
        assert_eq!(graph.weight("Stop3", "Stop2"), Some(4.0));
        assert_eq!(graph.weight("Stop1", "Stop3"), None);
    }

    #[test]
    fn test_source_without_destinations_is_registered() {
        let graph = RouteGraph::from_records(&records(&["lonely:", "a:b=1.0/"]));
        assert!(graph.contains_stop("lonely"));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_pair_keeps_last_weight() {
        let graph = RouteGraph::from_records(&records(&["a:b=1.0/", "b:a=5.0/", "a:b=7.0/"]));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("a", "b"), Some(7.0));
        assert_eq!(graph.weight("b", "a"), Some(7.0));
    }

    #[test]
    fn test_every_endpoint_is_a_stop() {
        let graph = RouteGraph::from_records(&records(&["a:b=1.0/c=2.0/", "d:a=3.0/"]));
        for (_, a, b, _) in graph.connections() {
            assert!(graph.contains_stop(a));
            assert!(graph.contains_stop(b));
        }
    }

    #[test]
    fn test_rebuild_is_identical() {
        let lines = ["a:b=1.0/c=2.5/", "c:d=0.5/", "a-c-d"];
        let first = decode(&lines).unwrap().graph();
        let second = decode(&lines).unwrap().graph();
        let stops = |g: &RouteGraph| g.stops().map(|(_, s)| s.to_string()).collect::<Vec<_>>();
        let conns = |g: &RouteGraph| {
            g.connections()
                .map(|(_, a, b, w)| (a.to_string(), b.to_string(), w))
                .collect::<Vec<_>>()
        };
        assert_eq!(stops(&first), stops(&second));
        assert_eq!(conns(&first), conns(&second));
    }
}
