use crate::types::Membership;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub opacity: f64,
    pub radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub stroke: &'static str,
    pub opacity: f64,
    pub width: f64,
    /// SVG `stroke-dasharray`, `None` for a solid line.
    pub dash: Option<&'static str>,
}

/// Stops on the route are warm and nearly opaque, the rest cool and faded.
pub fn node_style(membership: Membership) -> NodeStyle {
    match membership {
        Membership::OnPath => NodeStyle {
            fill: "#ffa500",
            opacity: 0.8,
            radius: 14.0,
        },
        Membership::OffPath => NodeStyle {
            fill: "#0000ff",
            opacity: 0.5,
            radius: 14.0,
        },
    }
}

/// Connections on the route are solid green, the rest dashed blue. Width is uniform.
pub fn edge_style(membership: Membership) -> EdgeStyle {
    match membership {
        Membership::OnPath => EdgeStyle {
            stroke: "#008000",
            opacity: 1.0,
            width: 2.0,
            dash: None,
        },
        Membership::OffPath => EdgeStyle {
            stroke: "#0000ff",
            opacity: 0.5,
            width: 2.0,
            dash: Some("8 5"),
        },
    }
}

/// Formats a weight the way the solver prints it: integral values keep one decimal.
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{:.1}", weight)
    } else {
        format!("{}", weight)
    }
}
