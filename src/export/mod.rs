//! Serialization of the dependency graph.
//!
//! [`table`] writes node and edge sets as separator-terminated text records.
//! [`graphml`] reads those tables back and renders a GraphML document.
pub mod graphml;
pub mod table;

pub use graphml::{simplify_identifier, GraphmlExporter, DEFAULT_TEMPLATE};
pub use table::{
    edges_to_table, nodes_to_table, read_records, write_edges_table, write_nodes_table,
};
