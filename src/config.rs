use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{ImportGraphError, Result};

/// Name of the configuration file stored inside the `.importgraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store project settings.
pub const IMPORTGRAPH_DIR: &str = ".importgraph";

/// Pattern that keeps every imported symbol.
pub const MATCH_ALL: &str = ".*";

/// Configuration for an import graph project.
///
/// Controls which files are scanned, how imports are filtered, and where
/// the tables and the GraphML document are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportGraphConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Root directory of the project being scanned.
    pub root_dir: String,
    /// Glob patterns for files to include while scanning.
    pub include: Vec<String>,
    /// Glob patterns for files to exclude while scanning.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; larger files are skipped.
    pub max_file_size: u64,
    /// Regex every imported symbol must fully match to be kept.
    pub filter: String,
    /// Terminator written after each node record.
    pub node_separator: String,
    /// Separator between source and target within an edge record.
    pub edge_separator: String,
    /// Terminator written after each edge record.
    pub record_separator: String,
    /// Node table file, relative to the project root unless absolute.
    pub nodes_file: String,
    /// Edge table file, relative to the project root unless absolute.
    pub edges_file: String,
    /// GraphML output file, relative to the project root unless absolute.
    pub graphml_file: String,
    /// Optional GraphML template; the built-in skeleton is used when unset.
    pub template: Option<String>,
}

impl Default for ImportGraphConfig {
    fn default() -> Self {
        Self {
            version: 1,
            root_dir: String::new(),
            include: vec!["**/*.java".to_string()],
            exclude: vec![
                "target/**".to_string(),
                "build/**".to_string(),
                "out/**".to_string(),
                ".git/**".to_string(),
                ".gradle/**".to_string(),
                ".importgraph/**".to_string(),
                "node_modules/**".to_string(),
            ],
            max_file_size: 1_048_576,
            filter: MATCH_ALL.to_string(),
            node_separator: "\n".to_string(),
            edge_separator: ";".to_string(),
            record_separator: "\n".to_string(),
            nodes_file: "nodes.csv".to_string(),
            edges_file: "edges.csv".to_string(),
            graphml_file: "dependencies.graphml".to_string(),
            template: None,
        }
    }
}

impl ImportGraphConfig {
    /// Resolves a configured output path against the project root.
    pub fn resolve(&self, project_root: &Path, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }
}

/// Returns the path to the `.importgraph` directory within the given project root.
pub fn get_importgraph_dir(project_root: &Path) -> PathBuf {
    project_root.join(IMPORTGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.importgraph` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_importgraph_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns a default configuration
/// with `root_dir` set to the given project root.
pub fn load_config(project_root: &Path) -> Result<ImportGraphConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ImportGraphConfig {
            root_dir: project_root.to_string_lossy().to_string(),
            ..ImportGraphConfig::default()
        });
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| ImportGraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    serde_json::from_str(&contents).map_err(|e| ImportGraphError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// Saves the configuration to disk using an atomic write.
pub fn save_config(project_root: &Path, config: &ImportGraphConfig) -> Result<()> {
    let dir = get_importgraph_dir(project_root);
    fs::create_dir_all(&dir).map_err(|e| ImportGraphError::Config {
        message: format!("failed to create directory '{}': {}", dir.display(), e),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config)?;

    fs::write(&tmp_path, &json).map_err(|e| ImportGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| ImportGraphError::Config {
        message: format!(
            "failed to rename '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Determines whether a file should be scanned based on the configuration's
/// include and exclude glob patterns.
///
/// Exclude patterns take precedence over include patterns.
pub fn should_include_file(file_path: &str, config: &ImportGraphConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let matches = |pattern_str: &String| {
        Pattern::new(pattern_str)
            .map(|p| p.matches_with(file_path, match_opts))
            .unwrap_or(false)
    };

    if config.exclude.iter().any(|p| matches(p)) {
        return false;
    }
    config.include.iter().any(|p| matches(p))
}
