/// Name of a stop, exactly as the solver printed it.
pub type Stop = String;

/// Wrapper for petgraph's graph type. Nodes are stops, edge weights are travel costs.
pub type UnGraph = petgraph::graph::UnGraph<Stop, f64>;

/// Whether a node or an edge belongs to the reported shortest route.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Membership {
    OnPath,
    OffPath,
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Membership::OnPath => write!(f, "OnPath"),
            Membership::OffPath => write!(f, "OffPath"),
        }
    }
}

/// Ordered sequence of stops forming the solver's shortest route.
///
/// Always holds at least one stop; the decoder refuses to build an empty one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    /// Returns `None` for an empty sequence.
    pub fn new(stops: Vec<Stop>) -> Option<Self> {
        if stops.is_empty() {
            None
        } else {
            Some(Self { stops })
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first(&self) -> &str {
        &self.stops[0]
    }

    pub fn last(&self) -> &str {
        &self.stops[self.stops.len() - 1]
    }

    /// Consecutive pairs `(stops[i], stops[i + 1])`, in route order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.stops
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Figure title, e.g. `"Stop1 to Stop3"`.
    pub fn title(&self) -> String {
        format!("{} to {}", self.first(), self.last())
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stops.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(stops: &[&str]) -> Route {
        Route::new(stops.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_empty_route_is_rejected() {
        assert!(Route::new(Vec::new()).is_none());
    }

    #[test]
    fn test_title_uses_endpoints() {
        assert_eq!(route(&["Stop1", "Stop2", "Stop3"]).title(), "Stop1 to Stop3");
        assert_eq!(route(&["Solo"]).title(), "Solo to Solo");
    }

    #[test]
    fn test_steps() {
        let r = route(&["a", "b", "c"]);
        let steps: Vec<_> = r.steps().collect();
        assert_eq!(steps, vec![("a", "b"), ("b", "c")]);
        assert_eq!(route(&["a"]).steps().count(), 0);
    }

    #[test]
    fn test_display_joins_with_dash() {
        assert_eq!(route(&["a", "b"]).to_string(), "a-b");
    }
}
