use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::{should_include_file, ImportGraphConfig};
use crate::errors::{ImportGraphError, Result};

/// Walks a project tree and yields the source files worth extracting.
///
/// Files are returned in a deterministic order (sorted by file name at
/// every directory level) so repeated runs report problems in the same
/// order.
pub struct FileVisitor<'a> {
    config: &'a ImportGraphConfig,
}

impl<'a> FileVisitor<'a> {
    pub fn new(config: &'a ImportGraphConfig) -> Self {
        Self { config }
    }

    /// Returns every file under `root` that passes the include/exclude
    /// globs, the size limit, and `accept`.
    ///
    /// Paths are absolute (joined onto `root`). An unreadable directory
    /// entry aborts the walk.
    pub fn visit<F>(&self, root: &Path, accept: F) -> Result<Vec<PathBuf>>
    where
        F: Fn(&Path) -> bool,
    {
        if !root.is_dir() {
            return Err(ImportGraphError::Io {
                message: "project root is not a directory".to_string(),
                path: root.display().to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| ImportGraphError::Io {
                message: e.to_string(),
                path: e
                    .path()
                    .unwrap_or(root)
                    .display()
                    .to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = relative.to_string_lossy().replace('\\', "/");
            if !should_include_file(&rel_str, self.config) || !accept(path) {
                continue;
            }
            let size = entry
                .metadata()
                .map_err(|e| ImportGraphError::Io {
                    message: e.to_string(),
                    path: path.display().to_string(),
                })?
                .len();
            if size > self.config.max_file_size {
                warn!(
                    path = %rel_str,
                    size,
                    limit = self.config.max_file_size,
                    "skipping file over max_file_size; its unit is left out of the graph"
                );
                continue;
            }
            files.push(path.to_path_buf());
        }
        Ok(files)
    }
}
