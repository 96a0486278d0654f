use crate::classify::Classification;
use crate::drawing_blocks::style::format_weight;
use crate::error::{Error, RenderError, Result};
use crate::graph::RouteGraph;
use crate::types::Membership;
use dot::{Edges, GraphWalk, Labeller, Nodes};
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::path::Path;

struct DotView<'a> {
    graph: &'a RouteGraph,
    classification: &'a Classification,
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl<'a> Labeller<'a, NodeIndex, EdgeIndex> for DotView<'a> {
    fn graph_id(&self) -> dot::Id<'_> {
        dot::Id::new("routes").unwrap()
    }

    fn node_id(&self, n: &NodeIndex) -> dot::Id<'_> {
        dot::Id::new(format!("N{}", n.index())).unwrap()
    }

    fn node_label(&self, n: &NodeIndex) -> dot::LabelText<'a> {
        dot::LabelText::label(self.graph.stop(*n).to_string())
    }

    fn edge_label(&self, e: &EdgeIndex) -> dot::LabelText<'a> {
        dot::LabelText::label(format_weight(self.graph.inner()[*e]))
    }

    fn node_style(&self, n: &NodeIndex) -> dot::Style {
        match self.classification.node_membership(*n) {
            Membership::OnPath => dot::Style::Filled,
            Membership::OffPath => dot::Style::None,
        }
    }

    fn edge_style(&self, e: &EdgeIndex) -> dot::Style {
        match self.classification.edge_membership(*e) {
            Membership::OnPath => dot::Style::Bold,
            Membership::OffPath => dot::Style::Dashed,
        }
    }

    fn kind(&self) -> dot::Kind {
        dot::Kind::Graph
    }
}

impl<'a> GraphWalk<'a, NodeIndex, EdgeIndex> for DotView<'a> {
    fn nodes(&self) -> Nodes<'_, NodeIndex> {
        self.nodes.as_slice().into()
    }

    fn edges(&self) -> Edges<'_, EdgeIndex> {
        self.edges.as_slice().into()
    }

    fn source(&self, e: &EdgeIndex) -> NodeIndex {
        self.graph.inner().edge_endpoints(*e).map(|(a, _)| a).unwrap_or_default()
    }

    fn target(&self, e: &EdgeIndex) -> NodeIndex {
        self.graph.inner().edge_endpoints(*e).map(|(_, b)| b).unwrap_or_default()
    }
}

/// Returns the classified route graph in DOT format.
///
/// It shows stop names and connection weights. Stops on the route are filled,
/// connections on the route are bold and the others dashed.
///
/// Intended to be used with `neato`.
pub fn to_dot_str(graph: &RouteGraph, classification: &Classification) -> Result<String> {
    let view = DotView {
        graph,
        classification,
        nodes: graph.stops().map(|(idx, _)| idx).collect(),
        edges: graph.connections().map(|(idx, ..)| idx).collect(),
    };

    let mut buffer = std::io::Cursor::new(Vec::new());
    dot::render(&view, &mut buffer).map_err(RenderError::Dot)?;
    String::from_utf8(buffer.into_inner()).map_err(|e| {
        Error::from(RenderError::Dot(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}

/// Writes the classified route graph to a file in DOT format.
pub fn to_dot_file(
    graph: &RouteGraph,
    classification: &Classification,
    path: impl AsRef<Path>,
) -> Result<()> {
    let dot_str = to_dot_str(graph, classification)?;
    let path = path.as_ref();
    std::fs::write(path, dot_str).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::input::from_str;

    fn dot_for(dump: &str) -> String {
        let decoded = from_str(dump).unwrap();
        let graph = decoded.graph();
        let c = classify(&graph, &decoded.route);
        to_dot_str(&graph, &c).unwrap()
    }

    #[test]
    fn test_dot_output() {
        let out = dot_for("a:b=1.0/c=2.5/\nb:c=1.0/\na-b-c");
        assert!(out.starts_with("graph routes {"));
        assert_eq!(out.matches(" -- ").count(), 3);
        assert_eq!(out.matches("style=\"dashed\"").count(), 1);
        assert_eq!(out.matches("style=\"bold\"").count(), 2);
        assert_eq!(out.matches("style=\"filled\"").count(), 3);
        assert!(out.contains("label=\"2.5\""));
        assert!(out.contains("label=\"a\""));
    }

    #[test]
    fn test_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.dot");
        let decoded = from_str("a:b=1.0/\na-b").unwrap();
        let graph = decoded.graph();
        let c = classify(&graph, &decoded.route);
        to_dot_file(&graph, &c, &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            to_dot_str(&graph, &c).unwrap()
        );
    }
}
