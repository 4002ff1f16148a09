use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Fully qualified name of a source unit, e.g. `com.example.Service`.
pub type Unit = String;

/// Mapping from each unit to the set of symbols it imports.
pub type DependencyMapping = HashMap<Unit, HashSet<String>>;

/// A directed edge from a unit to one symbol it imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: Unit,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A single fact reported by an extractor while walking a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// The package the file declares, e.g. `com.example`.
    Package(String),
    /// A symbol named by an import declaration, e.g. `java.util.List`.
    Import(String),
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileFacts {
    /// Qualified unit name: declared package plus the file's class name.
    pub unit: Unit,
    /// Imported symbols, in declaration order.
    pub imports: Vec<String>,
}
