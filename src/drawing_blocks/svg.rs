use crate::classify::Classification;
use crate::drawing_blocks::style::{edge_style, format_weight, node_style};
use crate::graph::RouteGraph;
use crate::layout::{Layout, Point};
use crate::types::Route;
use petgraph::graph::{EdgeIndex, NodeIndex};

/// Space reserved above the plot for the two title lines.
const HEADER: f64 = 70.0;
/// Fraction of the plot area kept free around the outermost stops.
const MARGIN: f64 = 0.2;

#[derive(Clone, Debug)]
pub struct SvgOptions {
    pub width: u32,
    pub height: u32,
    pub suptitle: String,
}

/// Maps layout coordinates in `[-1, 1]` onto the plot area of the canvas.
struct Viewport {
    cx: f64,
    cy: f64,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(width: f64, height: f64) -> Self {
        let plot_h = (height - HEADER).max(1.0);
        Viewport {
            cx: width / 2.0,
            cy: HEADER + plot_h / 2.0,
            sx: width / 2.0 / (1.0 + 2.0 * MARGIN),
            sy: plot_h / 2.0 / (1.0 + 2.0 * MARGIN),
        }
    }

    fn map(&self, p: Point) -> Point {
        // y grows downwards in SVG
        Point::new(self.cx + p.x * self.sx, self.cy - p.y * self.sy)
    }
}

/// Composes the route picture as an SVG document.
///
/// Draw order: connections off the route, connections on the route, stops, weight labels,
/// stop labels. The title names the first and last stop of the route.
pub fn compose(
    graph: &RouteGraph,
    route: &Route,
    classification: &Classification,
    layout: &Layout,
    options: &SvgOptions,
) -> String {
    let (width, height) = (options.width as f64, options.height as f64);
    let view = Viewport::new(width, height);
    let at = |idx: NodeIndex| view.map(layout.position(idx));

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
        w = options.width,
        h = options.height
    ));

    out.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"28\" text-anchor=\"middle\" font-size=\"18\">{}</text>\n",
        width / 2.0,
        escape(&options.suptitle)
    ));
    out.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"54\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
        width / 2.0,
        escape(&route.title())
    ));

    for (class, edges) in [
        ("off-path", classification.off_path_edges()),
        ("on-path", classification.on_path_edges()),
    ] {
        out.push_str(&format!("  <g class=\"edges {}\">\n", class));
        for &edge in edges {
            push_edge(&mut out, graph, classification, edge, &at);
        }
        out.push_str("  </g>\n");
    }

    out.push_str("  <g class=\"nodes\">\n");
    for (idx, _) in graph.stops() {
        let style = node_style(classification.node_membership(idx));
        let p = at(idx);
        out.push_str(&format!(
            "    <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\"/>\n",
            p.x, p.y, style.radius, style.fill, style.opacity
        ));
    }
    out.push_str("  </g>\n");

    out.push_str("  <g class=\"edge-labels\" font-size=\"10\">\n");
    for (edge, _, _, weight) in graph.connections() {
        let Some((a, b)) = graph.inner().edge_endpoints(edge) else {
            continue;
        };
        let (pa, pb) = (at(a), at(b));
        let mid = Point::new((pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0);
        let label = format_weight(weight);
        let w = 6.0 * label.len() as f64 + 6.0;
        out.push_str(&format!(
            "    <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.1}\" height=\"14\" rx=\"3\" fill=\"#ffffff\"/>\n",
            mid.x - w / 2.0,
            mid.y - 7.0,
            w
        ));
        out.push_str(&format!(
            "    <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
            mid.x,
            mid.y + 3.5,
            label
        ));
    }
    out.push_str("  </g>\n");

    out.push_str("  <g class=\"node-labels\" font-size=\"12\">\n");
    for (idx, stop) in graph.stops() {
        let p = at(idx);
        out.push_str(&format!(
            "    <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
            p.x,
            p.y + 4.0,
            escape(stop)
        ));
    }
    out.push_str("  </g>\n");

    out.push_str("</svg>\n");
    out
}

fn push_edge(
    out: &mut String,
    graph: &RouteGraph,
    classification: &Classification,
    edge: EdgeIndex,
    at: &impl Fn(NodeIndex) -> Point,
) {
    let Some((a, b)) = graph.inner().edge_endpoints(edge) else {
        return;
    };
    let style = edge_style(classification.edge_membership(edge));
    let (pa, pb) = (at(a), at(b));
    let dash = style
        .dash
        .map(|d| format!(" stroke-dasharray=\"{}\"", d))
        .unwrap_or_default();
    out.push_str(&format!(
        "    <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"{}/>\n",
        pa.x, pa.y, pb.x, pb.y, style.stroke, style.opacity, style.width, dash
    ));
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
