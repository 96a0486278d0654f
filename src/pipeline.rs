use crate::classify::{Classification, classify};
use crate::error::{Error, Result};
use crate::graph::RouteGraph;
use crate::input::decode;
use crate::render::{RenderOptions, write_png};
use crate::solver::{Solver, SolverOutput};
use crate::types::Route;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decoded, built and classified solver output. Everything but the picture.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub graph: RouteGraph,
    pub route: Route,
    pub classification: Classification,
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub title: String,
    pub stops: usize,
    pub connections: usize,
    pub on_path_stops: usize,
    pub on_path_connections: usize,
    pub output: PathBuf,
}

/// Decodes solver output, builds the graph and classifies it against the route.
pub fn analyze(output: &SolverOutput) -> Result<Analysis> {
    let decoded = decode(output.lines.as_slice())?;
    let graph = decoded.graph();

    for stop in decoded.route.stops() {
        if !graph.contains_stop(stop) {
            debug!(stop = %stop, "route stop is not in the graph");
        }
    }

    let classification = classify(&graph, &decoded.route);
    Ok(Analysis {
        graph,
        route: decoded.route,
        classification,
    })
}

/// Runs the whole pipeline for one input file: solver, decoder, graph, classifier, picture.
///
/// Every stage either succeeds or aborts the run; nothing is written on failure.
pub fn run(solver: &dyn Solver, input: &Path, options: &RenderOptions) -> Result<Summary> {
    if !input.is_file() {
        return Err(Error::MissingInput(input.to_path_buf()));
    }

    let output = solver.run(input)?;
    let analysis = analyze(&output)?;
    let written = write_png(
        &analysis.graph,
        &analysis.route,
        &analysis.classification,
        options,
    )?;

    Ok(Summary {
        title: analysis.route.title(),
        stops: analysis.graph.node_count(),
        connections: analysis.graph.edge_count(),
        on_path_stops: analysis.classification.on_path_nodes().len(),
        on_path_connections: analysis.classification.on_path_edges().len(),
        output: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::solver::CannedSolver;
    use tempfile::TempDir;

    struct Workspace {
        dir: TempDir,
        input: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let input = dir.path().join("routes.txt");
            std::fs::write(&input, "christchurch, dunedin\n").unwrap();
            Workspace { dir, input }
        }

        fn options(&self) -> RenderOptions {
            RenderOptions {
                output: self.dir.path().join("graphic.png"),
                width: 240,
                height: 200,
                seed: Some(1),
                ..RenderOptions::default()
            }
        }
    }

    const SCENARIO: [&str; 3] = ["Stop1:Stop2=3.0/", "Stop2:Stop1=3.0/Stop3=4.0/", "Stop1-Stop2-Stop3"];

    #[test]
    fn test_scenario_run() {
        let ws = Workspace::new();
        let options = ws.options();
        let summary = run(&CannedSolver::new(SCENARIO), &ws.input, &options).unwrap();
        assert_eq!(
            summary,
            Summary {
                title: "Stop1 to Stop3".to_string(),
                stops: 3,
                connections: 2,
                on_path_stops: 3,
                on_path_connections: 2,
                output: options.output.clone(),
            }
        );
        assert!(options.output.is_file());
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let ws = Workspace::new();
        let options = ws.options();
        let solver = CannedSolver::new(["Invalid input file"]);
        match run(&solver, &ws.input, &options) {
            Err(Error::SolverValidation(line)) => assert_eq!(line, "Invalid input file"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!options.output.exists());
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let ws = Workspace::new();
        let options = ws.options();
        let solver = CannedSolver::new(["A:B=x/", "A-B"]);
        let err = run(&solver, &ws.input, &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode { line: 1, kind: DecodeErrorKind::InvalidWeight(_), .. }
        ));
        assert!(!options.output.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let ws = Workspace::new();
        let missing = ws.dir.path().join("nope.txt");
        let err = run(&CannedSolver::new(SCENARIO), &missing, &ws.options()).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn test_classification_is_stable_across_runs() {
        let output = SolverOutput::from_lines(
            ["a:b=1.0/c=4.0/", "b:c=1.0/d=7.0/", "c:d=2.0/", "a-b-c-d"]
                .map(String::from)
                .to_vec(),
        )
        .unwrap();
        let first = analyze(&output).unwrap();
        for _ in 0..5 {
            let again = analyze(&output).unwrap();
            assert_eq!(again.classification, first.classification);
            assert_eq!(again.route, first.route);
        }
        assert_eq!(first.classification.on_path_edges().len(), 3);
        assert_eq!(first.classification.off_path_edges().len(), 2);
    }
}
