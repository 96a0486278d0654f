use crate::classify::Classification;
use crate::drawing_blocks::raster::svg_to_png;
use crate::drawing_blocks::svg::{SvgOptions, compose};
use crate::error::{Error, Result};
use crate::graph::RouteGraph;
use crate::layout::{LayoutOptions, spring_layout};
use crate::types::Route;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default name of the written picture, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "BusRoutesGraphic.png";
pub const DEFAULT_SUPTITLE: &str = "Bus Routes - Cheapest Route";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    /// Layout seed. Unset means a different picture on every run.
    pub seed: Option<u64>,
    pub background: String,
    pub suptitle: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            width: 800,
            height: 600,
            scale: 1.0,
            seed: None,
            background: "white".to_string(),
            suptitle: DEFAULT_SUPTITLE.to_string(),
        }
    }
}

/// Lays out the graph and draws it to PNG bytes.
pub fn render_png(
    graph: &RouteGraph,
    route: &Route,
    classification: &Classification,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let layout = spring_layout(
        graph,
        &LayoutOptions {
            seed: options.seed,
            ..LayoutOptions::default()
        },
    );
    let svg = compose(
        graph,
        route,
        classification,
        &layout,
        &SvgOptions {
            width: options.width,
            height: options.height,
            suptitle: options.suptitle.clone(),
        },
    );
    debug!(bytes = svg.len(), "composed route picture");
    Ok(svg_to_png(&svg, options.scale, &options.background)?)
}

/// Draws the picture and writes it to `options.output`, replacing any existing file.
pub fn write_png(
    graph: &RouteGraph,
    route: &Route,
    classification: &Classification,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let png = render_png(graph, route, classification, options)?;
    to_file(&png, &options.output)?;
    info!(path = %options.output.display(), bytes = png.len(), "wrote route picture");
    Ok(options.output.clone())
}

/// Writes bytes to a file.
pub fn to_file(content: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::input::from_str;

    fn options(output: PathBuf) -> RenderOptions {
        RenderOptions {
            output,
            width: 200,
            height: 160,
            seed: Some(11),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_write_png_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"stale").unwrap();

        let decoded = from_str("a:b=1.0/\nb:c=2.0/\na-b-c").unwrap();
        let graph = decoded.graph();
        let c = classify(&graph, &decoded.route);
        let written = write_png(&graph, &decoded.route, &c, &options(path.clone())).unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(&bytes[16..20], &200u32.to_be_bytes());
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let decoded = from_str("a:b=1.0/\na-b").unwrap();
        let graph = decoded.graph();
        let c = classify(&graph, &decoded.route);
        let err = write_png(&graph, &decoded.route, &c, &options(path)).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn test_scale_changes_pixel_size() {
        let decoded = from_str("a:b=1.0/\na-b").unwrap();
        let graph = decoded.graph();
        let c = classify(&graph, &decoded.route);
        let mut opts = options(PathBuf::from("unused.png"));
        opts.scale = 2.0;
        let png = render_png(&graph, &decoded.route, &c, &opts).unwrap();
        assert_eq!(&png[16..20], &400u32.to_be_bytes());
        assert_eq!(&png[20..24], &320u32.to_be_bytes());
    }
}
