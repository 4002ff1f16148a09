use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{load_config, ImportGraphConfig, MATCH_ALL};
use crate::errors::{ImportGraphError, Result};
use crate::extraction::ExtractorRegistry;
use crate::filter::ImportFilter;
use crate::graph::GraphQuery;
use crate::types::{DependencyMapping, Edge, FileFacts, Unit};
use crate::visitor::FileVisitor;

/// Scans a project and accumulates, per unit, the set of symbols it imports.
///
/// Every call to [`build`](Self::build) starts from an empty mapping, so one
/// builder can be reused for several patterns in sequence.
pub struct DependencyGraphBuilder {
    project_root: PathBuf,
    config: ImportGraphConfig,
    registry: ExtractorRegistry,
    dependencies: DependencyMapping,
}

impl DependencyGraphBuilder {
    /// Creates a builder for `project_root` with the default configuration.
    pub fn new(project_root: &Path) -> Self {
        let config = ImportGraphConfig {
            root_dir: project_root.to_string_lossy().to_string(),
            ..ImportGraphConfig::default()
        };
        Self::with_config(project_root, config)
    }

    /// Creates a builder using the configuration stored under `project_root`.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        Ok(Self::with_config(project_root, config))
    }

    pub fn with_config(project_root: &Path, config: ImportGraphConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            registry: ExtractorRegistry::new(),
            dependencies: DependencyMapping::new(),
        }
    }

    /// Replaces the extractor registry, e.g. to plug in another language.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builds the mapping keeping every imported symbol.
    pub fn all(&mut self) -> Result<&Self> {
        self.build(MATCH_ALL)?;
        Ok(&*self)
    }

    /// Builds the mapping keeping only symbols that fully match `pattern`.
    pub fn all_with(&mut self, pattern: &str) -> Result<&Self> {
        self.build(pattern)?;
        Ok(&*self)
    }

    /// Clears any previous result, scans the project, and accumulates the
    /// imports that fully match `pattern`.
    ///
    /// The first file that cannot be read or parsed aborts the build and
    /// leaves the mapping empty.
    pub fn build(&mut self, pattern: &str) -> Result<&DependencyMapping> {
        let start = Instant::now();
        self.dependencies.clear();

        let filter = ImportFilter::new(pattern)?;
        let registry = &self.registry;
        let files = FileVisitor::new(&self.config).visit(&self.project_root, |path| {
            registry.extractor_for_file(path).is_some()
        })?;
        info!(
            root = %self.project_root.display(),
            pattern,
            files = files.len(),
            "building dependency mapping"
        );

        let mut mapping = DependencyMapping::new();
        for path in &files {
            let Some(extractor) = registry.extractor_for_file(path) else {
                continue;
            };
            let source = fs::read_to_string(path).map_err(|e| ImportGraphError::io(path, e))?;
            let file_facts = extractor.extract(path, &source)?;
            debug!(
                path = %path.display(),
                unit = %file_facts.unit,
                imports = file_facts.imports.len(),
                "extracted file"
            );
            accumulate(&mut mapping, file_facts, &filter);
        }

        info!(
            units = mapping.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "dependency mapping built"
        );
        self.dependencies = mapping;
        Ok(&self.dependencies)
    }

    /// Returns the mapping produced by the last build.
    pub fn data(&self) -> &DependencyMapping {
        &self.dependencies
    }

    /// Returns a read-only query view over the last build.
    pub fn query(&self) -> GraphQuery<'_> {
        GraphQuery::new(&self.dependencies)
    }

    pub fn nodes(&self) -> HashSet<String> {
        self.query().nodes()
    }

    pub fn edges(&self) -> HashSet<Edge> {
        self.query().edges()
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &ImportGraphConfig {
        &self.config
    }

    /// Returns the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Adds the imports of one file that pass `filter` to `mapping`.
///
/// A file with no matching imports adds nothing, not even an empty entry.
/// A second file with the same unit name adds its imports to the set the
/// first one started. Returns the unit name when an entry was written.
pub fn accumulate(
    mapping: &mut DependencyMapping,
    file_facts: FileFacts,
    filter: &ImportFilter,
) -> Option<Unit> {
    let kept: HashSet<String> = file_facts
        .imports
        .into_iter()
        .filter(|symbol| filter.matches(symbol))
        .collect();
    if kept.is_empty() {
        return None;
    }
    if mapping.contains_key(&file_facts.unit) {
        warn!(unit = %file_facts.unit, "unit declared by more than one file; merging imports");
    }
    mapping
        .entry(file_facts.unit.clone())
        .or_default()
        .extend(kept);
    Some(file_facts.unit)
}

/// Builds the dependency mapping of `project_root` with default settings.
pub fn build(project_root: &Path, pattern: &str) -> Result<DependencyMapping> {
    let mut builder = DependencyGraphBuilder::new(project_root);
    builder.build(pattern)?;
    Ok(builder.dependencies)
}
