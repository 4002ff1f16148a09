/// Read-only queries over a built dependency mapping.
pub mod queries;

pub use queries::{GraphQuery, NodeMode};
