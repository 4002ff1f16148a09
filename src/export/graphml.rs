use std::borrow::Cow;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{ImportGraphError, Result};
use crate::export::table::read_records;

/// GraphML skeleton used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
</graphml>
"#;

const ROOT_CLOSE: &str = "</graphml>";
const WEIGHT_KEY_ID: &str = "d1";
const EDGE_WEIGHT: &str = "1.0";

/// Renders node and edge tables into a GraphML document.
///
/// The document is the template with an edge `weight` key and one
/// undirected graph appended inside its root element. Every edge carries
/// the constant weight `1.0`.
#[derive(Debug, Clone)]
pub struct GraphmlExporter {
    template: String,
    template_path: Option<PathBuf>,
    edge_separator: String,
}

impl Default for GraphmlExporter {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            template_path: None,
            edge_separator: ";".to_string(),
        }
    }
}

impl GraphmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the template from `path` instead of the built-in skeleton.
    pub fn with_template_file(mut self, path: &Path) -> Result<Self> {
        self.template = fs::read_to_string(path).map_err(|e| ImportGraphError::io(path, e))?;
        self.template_path = Some(path.to_path_buf());
        Ok(self)
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self.template_path = None;
        self
    }

    /// Sets the separator between source and target in edge records.
    pub fn with_edge_separator(mut self, separator: impl Into<String>) -> Self {
        self.edge_separator = separator.into();
        self
    }

    /// Reads both tables and renders the document.
    pub fn render(&self, node_table: &Path, edge_table: &Path) -> Result<String> {
        let nodes = read_records(node_table)?;
        let edges = read_records(edge_table)?;
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "read tables for graphml"
        );
        self.render_records(&nodes, &edges, &edge_table.display().to_string())
    }

    /// Renders already-read records. `edge_source` names the edge table in
    /// error messages.
    ///
    /// Blank node records are skipped. Every edge record must hold a
    /// non-empty source and target around the edge separator, otherwise
    /// nothing is rendered.
    pub fn render_records<S: AsRef<str>>(
        &self,
        nodes: &[S],
        edges: &[S],
        edge_source: &str,
    ) -> Result<String> {
        let insert_at = self.template.rfind(ROOT_CLOSE).ok_or_else(|| {
            ImportGraphError::Template {
                message: format!("template has no closing {ROOT_CLOSE} element"),
                path: self
                    .template_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<built-in>".to_string()),
            }
        })?;

        let mut body = String::new();
        let _ = writeln!(
            body,
            "  <key id=\"{WEIGHT_KEY_ID}\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>"
        );
        let _ = writeln!(body, "  <graph id=\"G\" edgedefault=\"undirected\">");

        for node in nodes.iter().map(|s| s.as_ref()) {
            if node.trim().is_empty() {
                continue;
            }
            let _ = writeln!(
                body,
                "    <node id=\"{}\"/>",
                escape_xml_attr(&simplify_identifier(node))
            );
        }

        for (line_idx, record) in edges.iter().map(|s| s.as_ref()).enumerate() {
            let (source, target) = self.split_edge(record).ok_or_else(|| {
                ImportGraphError::MalformedRecord {
                    path: edge_source.to_string(),
                    line: line_idx + 1,
                    record: record.to_string(),
                }
            })?;
            let _ = writeln!(
                body,
                "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">",
                line_idx,
                escape_xml_attr(&simplify_identifier(source)),
                escape_xml_attr(&simplify_identifier(target))
            );
            let _ = writeln!(
                body,
                "      <data key=\"{WEIGHT_KEY_ID}\">{EDGE_WEIGHT}</data>"
            );
            let _ = writeln!(body, "    </edge>");
        }
        let _ = writeln!(body, "  </graph>");

        let mut document = String::with_capacity(self.template.len() + body.len());
        let head = &self.template[..insert_at];
        document.push_str(head);
        if !head.is_empty() && !head.ends_with('\n') {
            document.push('\n');
        }
        document.push_str(&body);
        document.push_str(&self.template[insert_at..]);
        Ok(document)
    }

    fn split_edge<'r>(&self, record: &'r str) -> Option<(&'r str, &'r str)> {
        let (source, target) = record.split_once(self.edge_separator.as_str())?;
        if source.trim().is_empty() || target.trim().is_empty() {
            return None;
        }
        Some((source, target))
    }

    /// Renders the tables and writes the document to `output`.
    ///
    /// The document is written to a temporary file and renamed into place,
    /// so a failed render never leaves a partial `output` behind.
    pub fn write(&self, node_table: &Path, edge_table: &Path, output: &Path) -> Result<()> {
        let document = self.render(node_table, edge_table)?;

        let tmp_path = temp_path_for(output);
        fs::write(&tmp_path, &document).map_err(|e| ImportGraphError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, output) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ImportGraphError::io(output, e));
        }

        info!(path = %output.display(), bytes = document.len(), "wrote graphml");
        Ok(())
    }
}

/// `deps.graphml` becomes `deps.graphml.tmp`, next to the output.
fn temp_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Shortens a dotted identifier to its last two segments.
///
/// Identifiers with at least two dots keep only `segment[n-2].segment[n-1]`
/// (`java.io.File` becomes `io.File`); anything shorter is returned as is.
pub fn simplify_identifier(identifier: &str) -> Cow<'_, str> {
    let mut parts = identifier.rsplitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(last), Some(second_last), Some(_)) => {
            Cow::Owned(format!("{second_last}.{last}"))
        }
        _ => Cow::Borrowed(identifier),
    }
}

fn escape_xml_attr(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
