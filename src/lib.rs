// #![warn(missing_docs)]

//! # bus_routes
//!
//! Draws a bus route network and highlights the cheapest route between two stops.
//!
//! The route itself is computed by an external solver. This crate runs the solver,
//! decodes its adjacency dump, builds an undirected weighted graph, splits it into
//! the part on the route and the rest, and renders the result to a PNG.
//!
//! Based on [`petgraph`](https://docs.rs/petgraph).
//!
//! ```
//! use bus_routes::{classify, input::from_str};
//!
//! let decoded = from_str("Stop1:Stop2=3.0/\nStop2:Stop3=4.0/\nStop1-Stop2-Stop3").unwrap();
//! let graph = decoded.graph();
//! let classification = classify(&graph, &decoded.route);
//! assert_eq!(classification.on_path_edges().len(), 2);
//! assert_eq!(decoded.route.title(), "Stop1 to Stop3");
//! ```

pub mod classify;
pub mod config;
pub mod drawing_blocks;
pub mod error;
pub mod graph;
pub mod input;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod solver;
pub mod types;

pub use classify::{Classification, classify};
pub use error::{Error, Result};
pub use graph::RouteGraph;
pub use types::{Membership, Route, Stop};
