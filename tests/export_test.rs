use std::collections::HashSet;
use std::fs;

use importgraph::errors::ImportGraphError;
use importgraph::export::{
    edges_to_table, nodes_to_table, read_records, simplify_identifier, write_edges_table,
    write_nodes_table, GraphmlExporter,
};
use importgraph::types::Edge;
use tempfile::TempDir;

fn sample_nodes() -> HashSet<String> {
    ["com.arneam.ClassDependencies", "com.arneam.DirExplorer", "java.io.File"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn sample_edges() -> HashSet<Edge> {
    [
        Edge::new("com.arneam.ClassDependencies", "java.io.File"),
        Edge::new("com.arneam.DirExplorer", "java.io.File"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_node_table_has_one_record_per_node() {
    let table = nodes_to_table(&sample_nodes(), "\n");
    assert!(table.ends_with('\n'));
    let records: HashSet<&str> = table.lines().collect();
    assert_eq!(records.len(), 3);
    for node in ["com.arneam.ClassDependencies", "com.arneam.DirExplorer", "java.io.File"] {
        assert!(records.contains(node), "missing {node}");
    }
}

#[test]
fn test_edge_table_any_order() {
    let table = edges_to_table(&sample_edges(), ";", "\n");
    assert!(
        table == "com.arneam.ClassDependencies;java.io.File\ncom.arneam.DirExplorer;java.io.File\n"
            || table
                == "com.arneam.DirExplorer;java.io.File\ncom.arneam.ClassDependencies;java.io.File\n",
        "unexpected table: {table:?}"
    );
}

#[test]
fn test_write_and_read_tables() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");

    write_nodes_table(&sample_nodes(), "\n", &nodes_path).unwrap();
    write_edges_table(&sample_edges(), ";", "\n", &edges_path).unwrap();

    let nodes: HashSet<String> = read_records(&nodes_path).unwrap().into_iter().collect();
    assert_eq!(nodes, sample_nodes());

    let edges = read_records(&edges_path).unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|e| e.ends_with(";java.io.File")));
}

#[test]
fn test_write_table_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("nodes.csv");
    let err = write_nodes_table(&sample_nodes(), "\n", &path).unwrap_err();
    match err {
        ImportGraphError::Io { path: p, .. } => assert!(p.ends_with("nodes.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_graphml_roundtrip_preserves_simplified_ids() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    let graphml_path = dir.path().join("deps.graphml");

    write_nodes_table(&sample_nodes(), "\n", &nodes_path).unwrap();
    write_edges_table(&sample_edges(), ";", "\n", &edges_path).unwrap();
    GraphmlExporter::new()
        .write(&nodes_path, &edges_path, &graphml_path)
        .unwrap();

    let doc = fs::read_to_string(&graphml_path).unwrap();
    for node in sample_nodes() {
        let expected = format!("<node id=\"{}\"/>", simplify_identifier(&node));
        assert!(doc.contains(&expected), "missing {expected}");
    }
    assert!(doc.contains(r#"source="arneam.ClassDependencies" target="io.File""#));
    assert!(doc.contains(r#"source="arneam.DirExplorer" target="io.File""#));
    assert!(doc.contains(r#"<edge id="e0""#));
    assert!(doc.contains(r#"<edge id="e1""#));
    assert_eq!(doc.matches("<data key=\"d1\">1.0</data>").count(), 2);
    assert!(!dir.path().join("deps.graphml.tmp").exists());
}

#[test]
fn test_graphml_write_leaves_sibling_tmp_file_alone() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    let graphml_path = dir.path().join("deps.graphml");
    let sibling = dir.path().join("deps.tmp");
    fs::write(&nodes_path, "a.A\nx.Y\n").unwrap();
    fs::write(&edges_path, "a.A;x.Y\n").unwrap();
    fs::write(&sibling, "keep me").unwrap();

    GraphmlExporter::new()
        .write(&nodes_path, &edges_path, &graphml_path)
        .unwrap();

    assert!(graphml_path.exists());
    assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
}

#[test]
fn test_graphml_rename_failure_removes_tmp_file() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    fs::write(&nodes_path, "a.A\n").unwrap();
    fs::write(&edges_path, "").unwrap();
    // A non-empty directory in the way makes the rename fail.
    let output = dir.path().join("deps.graphml");
    fs::create_dir_all(output.join("occupied")).unwrap();

    let err = GraphmlExporter::new()
        .write(&nodes_path, &edges_path, &output)
        .unwrap_err();
    assert!(matches!(err, ImportGraphError::Io { .. }));
    assert!(!dir.path().join("deps.graphml.tmp").exists());
}

#[test]
fn test_graphml_crlf_tables() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    fs::write(&nodes_path, "a.A\r\nx.Y\r\n").unwrap();
    fs::write(&edges_path, "a.A;x.Y\r\n").unwrap();

    let doc = GraphmlExporter::new().render(&nodes_path, &edges_path).unwrap();
    assert!(doc.contains(r#"<node id="a.A"/>"#));
    assert!(doc.contains(r#"<edge id="e0" source="a.A" target="x.Y">"#));
}

#[test]
fn test_graphml_malformed_edge_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    let graphml_path = dir.path().join("deps.graphml");
    fs::write(&nodes_path, "a.A\nx.Y\n").unwrap();
    fs::write(&edges_path, "a.A;x.Y\na.A x.Y\n").unwrap();

    let err = GraphmlExporter::new()
        .write(&nodes_path, &edges_path, &graphml_path)
        .unwrap_err();
    match err {
        ImportGraphError::MalformedRecord { line, record, .. } => {
            assert_eq!(line, 2);
            assert_eq!(record, "a.A x.Y");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!graphml_path.exists());
}

#[test]
fn test_graphml_blank_edge_line_is_fatal() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    fs::write(&nodes_path, "a.A\nx.Y\n").unwrap();
    fs::write(&edges_path, "a.A;x.Y\n\na.A;x.Y\n").unwrap();

    let err = GraphmlExporter::new()
        .render(&nodes_path, &edges_path)
        .unwrap_err();
    match err {
        ImportGraphError::MalformedRecord { line, record, .. } => {
            assert_eq!(line, 2);
            assert!(record.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_graphml_edge_with_empty_target_is_fatal() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    let graphml_path = dir.path().join("deps.graphml");
    fs::write(&nodes_path, "a.A\nx.Y\n").unwrap();
    fs::write(&edges_path, "a.A;x.Y\na.A;\n").unwrap();

    let err = GraphmlExporter::new()
        .write(&nodes_path, &edges_path, &graphml_path)
        .unwrap_err();
    match err {
        ImportGraphError::MalformedRecord { line, record, .. } => {
            assert_eq!(line, 2);
            assert_eq!(record, "a.A;");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!graphml_path.exists());
}

#[test]
fn test_graphml_missing_table_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = GraphmlExporter::new()
        .render(&dir.path().join("nodes.csv"), &dir.path().join("edges.csv"))
        .unwrap_err();
    assert!(matches!(err, ImportGraphError::Io { .. }));
}

#[test]
fn test_graphml_custom_template() {
    let dir = TempDir::new().unwrap();
    let template_path = dir.path().join("template.graphml");
    fs::write(
        &template_path,
        "<?xml version=\"1.0\"?>\n<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n  <!-- custom -->\n</graphml>\n",
    )
    .unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");
    fs::write(&nodes_path, "Foo\n").unwrap();
    fs::write(&edges_path, "").unwrap();

    let doc = GraphmlExporter::new()
        .with_template_file(&template_path)
        .unwrap()
        .render(&nodes_path, &edges_path)
        .unwrap();
    assert!(doc.contains("<!-- custom -->"));
    assert!(doc.contains(r#"<node id="Foo"/>"#));
    let graph_at = doc.find("<graph ").unwrap();
    let close_at = doc.rfind("</graphml>").unwrap();
    assert!(doc.find("<!-- custom -->").unwrap() < graph_at);
    assert!(graph_at < close_at);
}

#[test]
fn test_graphml_missing_template_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = GraphmlExporter::new()
        .with_template_file(&dir.path().join("nope.graphml"))
        .unwrap_err();
    assert!(matches!(err, ImportGraphError::Io { .. }));
}
