//! Source fact extraction.
//!
//! Extractors parse a source file and report the facts the import graph
//! needs: the declared package and every import declaration.
mod java_extractor;

pub use java_extractor::JavaExtractor;

use std::path::Path;

use crate::errors::Result;
use crate::types::{Fact, FileFacts, Unit};

/// Trait for language-specific fact extractors.
pub trait FactExtractor: Send + Sync {
    /// File extensions this extractor handles (without leading dot).
    fn extensions(&self) -> &[&str];

    /// Human-readable language name.
    fn language_name(&self) -> &str;

    /// Parses `source` and returns its package and import facts in source order.
    ///
    /// A file that does not parse cleanly is an error; there is no
    /// best-effort mode.
    fn facts(&self, file_path: &Path, source: &str) -> Result<Vec<Fact>>;

    /// Parses `source` and folds its facts into a [`FileFacts`].
    fn extract(&self, file_path: &Path, source: &str) -> Result<FileFacts> {
        let facts = self.facts(file_path, source)?;
        Ok(collect_facts(file_path, facts))
    }
}

/// Folds a stream of facts into the unit name and import list of one file.
pub fn collect_facts(file_path: &Path, facts: impl IntoIterator<Item = Fact>) -> FileFacts {
    let mut package: Option<String> = None;
    let mut imports = Vec::new();
    for fact in facts {
        match fact {
            Fact::Package(name) => package = Some(name),
            Fact::Import(symbol) => imports.push(symbol),
        }
    }
    FileFacts {
        unit: qualified_unit_name(package.as_deref(), file_path),
        imports,
    }
}

/// Returns the class name of a source file: its file name up to the first dot.
///
/// `src/com/example/Service.java` yields `Service`.
pub fn class_name_from_file(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Returns `package.ClassName` for a file, or just `ClassName` for files in
/// the default package.
pub fn qualified_unit_name(package: Option<&str>, file_path: &Path) -> Unit {
    let class_name = class_name_from_file(file_path);
    match package {
        Some(pkg) if !pkg.is_empty() => format!("{pkg}.{class_name}"),
        _ => class_name,
    }
}

/// Registry of all available fact extractors.
///
/// Dispatches to the correct extractor based on file extension.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn FactExtractor>>,
}

impl ExtractorRegistry {
    /// Creates a new registry with all built-in extractors.
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(JavaExtractor)],
        }
    }

    /// Creates a registry from an explicit list of extractors.
    pub fn with_extractors(extractors: Vec<Box<dyn FactExtractor>>) -> Self {
        Self { extractors }
    }

    /// Returns the extractor for a file path based on its extension.
    pub fn extractor_for_file(&self, path: &Path) -> Option<&dyn FactExtractor> {
        let ext = path.extension()?.to_str()?;
        self.extractors
            .iter()
            .find(|e| e.extensions().contains(&ext))
            .map(|e| e.as_ref())
    }

    /// Returns all supported file extensions across all extractors.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
