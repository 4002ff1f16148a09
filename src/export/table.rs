use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{ImportGraphError, Result};
use crate::types::Edge;

/// Formats nodes as `node<separator>` records.
///
/// The separator terminates every record, including the last one. Record
/// order follows the iteration order of `nodes`.
pub fn nodes_to_table<I, S>(nodes: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for node in nodes {
        out.push_str(node.as_ref());
        out.push_str(separator);
    }
    out
}

/// Formats edges as `source<edge_separator>target<record_separator>` records.
pub fn edges_to_table<'a, I>(edges: I, edge_separator: &str, record_separator: &str) -> String
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut out = String::new();
    for edge in edges {
        out.push_str(&edge.source);
        out.push_str(edge_separator);
        out.push_str(&edge.target);
        out.push_str(record_separator);
    }
    out
}

pub fn write_nodes_table<I, S>(nodes: I, separator: &str, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_table(&nodes_to_table(nodes, separator), path)
}

pub fn write_edges_table<'a, I>(
    edges: I,
    edge_separator: &str,
    record_separator: &str,
    path: &Path,
) -> Result<()>
where
    I: IntoIterator<Item = &'a Edge>,
{
    write_table(
        &edges_to_table(edges, edge_separator, record_separator),
        path,
    )
}

fn write_table(contents: &str, path: &Path) -> Result<()> {
    fs::write(path, contents).map_err(|e| ImportGraphError::io(path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote table");
    Ok(())
}

/// Reads a table back as one record per line.
///
/// Accepts both `\n` and `\r\n` line endings; no trailing empty record is
/// produced for the final terminator.
pub fn read_records(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| ImportGraphError::io(path, e))?;
    Ok(contents.lines().map(str::to_string).collect())
}
