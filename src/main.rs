use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use importgraph::builder::DependencyGraphBuilder;
use importgraph::config::{get_config_path, load_config, save_config, ImportGraphConfig};
use importgraph::export::{write_edges_table, write_nodes_table, GraphmlExporter};

/// Class-level import dependency graphs for Java projects.
#[derive(Parser)]
#[command(
    name = "importgraph",
    about = "Class-level import dependency graphs for Java projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Scan sources and write the node and edge tables
    Scan {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Keep only imports fully matching this regex
        #[arg(short, long)]
        filter: Option<String>,
        /// Node table output file
        #[arg(long)]
        nodes: Option<String>,
        /// Edge table output file
        #[arg(long)]
        edges: Option<String>,
    },
    /// Render a GraphML document from existing tables
    Graphml {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Node table input file
        #[arg(long)]
        nodes: Option<String>,
        /// Edge table input file
        #[arg(long)]
        edges: Option<String>,
        /// GraphML output file
        #[arg(short, long)]
        output: Option<String>,
        /// GraphML template file
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Scan sources, write the tables, and render GraphML
    Run {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Keep only imports fully matching this regex
        #[arg(short, long)]
        filter: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> importgraph::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            let config = ImportGraphConfig {
                root_dir: project_path.to_string_lossy().to_string(),
                ..ImportGraphConfig::default()
            };
            save_config(&project_path, &config)?;
            println!("Wrote {}", get_config_path(&project_path).display());
        }
        Commands::Scan {
            path,
            filter,
            nodes,
            edges,
        } => {
            let project_path = resolve_path(path);
            let mut config = load_config(&project_path)?;
            override_opt(&mut config.filter, filter);
            override_opt(&mut config.nodes_file, nodes);
            override_opt(&mut config.edges_file, edges);
            scan(&project_path, config)?;
        }
        Commands::Graphml {
            path,
            nodes,
            edges,
            output,
            template,
        } => {
            let project_path = resolve_path(path);
            let mut config = load_config(&project_path)?;
            override_opt(&mut config.nodes_file, nodes);
            override_opt(&mut config.edges_file, edges);
            override_opt(&mut config.graphml_file, output);
            if template.is_some() {
                config.template = template;
            }
            graphml(&project_path, &config)?;
        }
        Commands::Run { path, filter } => {
            let project_path = resolve_path(path);
            let mut config = load_config(&project_path)?;
            override_opt(&mut config.filter, filter);
            let config = scan(&project_path, config)?;
            graphml(&project_path, &config)?;
        }
    }
    Ok(())
}

/// Builds the mapping and writes both tables. Returns the configuration
/// so a following render can reuse it.
fn scan(
    project_path: &Path,
    config: ImportGraphConfig,
) -> importgraph::errors::Result<ImportGraphConfig> {
    let pattern = config.filter.clone();
    let mut builder = DependencyGraphBuilder::with_config(project_path, config);
    builder.build(&pattern)?;

    let config = builder.config();
    let query = builder.query();
    let nodes = query.nodes();
    let edges = query.edges();

    let nodes_path = config.resolve(project_path, &config.nodes_file);
    let edges_path = config.resolve(project_path, &config.edges_file);
    write_nodes_table(&nodes, &config.node_separator, &nodes_path)?;
    write_edges_table(
        &edges,
        &config.edge_separator,
        &config.record_separator,
        &edges_path,
    )?;

    println!(
        "Scanned {} units: {} nodes, {} edges",
        builder.data().len(),
        nodes.len(),
        edges.len()
    );
    println!("  Nodes: {}", nodes_path.display());
    println!("  Edges: {}", edges_path.display());
    Ok(config.clone())
}

fn graphml(project_path: &Path, config: &ImportGraphConfig) -> importgraph::errors::Result<()> {
    let mut exporter = GraphmlExporter::new().with_edge_separator(config.edge_separator.clone());
    if let Some(template) = &config.template {
        exporter = exporter.with_template_file(&config.resolve(project_path, template))?;
    }

    let output = config.resolve(project_path, &config.graphml_file);
    exporter.write(
        &config.resolve(project_path, &config.nodes_file),
        &config.resolve(project_path, &config.edges_file),
        &output,
    )?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn override_opt(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
