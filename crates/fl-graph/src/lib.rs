//! fl-graph: graph/model layer for flowline.
//!
//! Provides:
//! - Node and edge specs as handed over by the editing surface
//! - Ordered adjacency (source -> transits, in edge declaration order)
//! - Start-node discovery, cycle-entry fallback and reachability classification
//! - Input validation at the library boundary
//!
//! # Example
//!
//! ```
//! use fl_graph::{EdgeSpec, GraphBuilder, NodeSpec};
//!
//! let mut builder = GraphBuilder::new();
//! let cut = builder.add_node(NodeSpec::new("cut", "Cutter", 12.0));
//! let weld = builder.add_node(NodeSpec::new("weld", "Welder", 30.0).with_capacity(2));
//! builder.add_edge(EdgeSpec::new("e1", cut.clone(), weld).with_transit_time(4.0));
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.start_nodes(), &[cut]);
//! assert_eq!(graph.connected_count(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{GraphBuilder, build};
pub use error::{GraphError, GraphResult};
pub use graph::{Adjacency, Diagnostic, EdgeSpec, FlowGraph, NodeSpec, Severity, Transit};
pub use indexing::NodeIndex;
