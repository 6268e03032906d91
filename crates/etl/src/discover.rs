use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use playlog_core::error::{PlaylogError, Result};

const JSON_GLOB: &str = "**/*.json";

/// Collects every `*.json` file below `root`, recursively, as absolute paths.
///
/// Paths come back in the glob crate's sorted walk order. Dot directories are
/// walked like any other; only files whose own name starts with a dot are
/// skipped.
pub fn discover_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    let root = fs::canonicalize(root)
        .map_err(|e| PlaylogError::Discovery(format!("{}: {e}", root.display())))?;
    fs::read_dir(&root)
        .map_err(|e| PlaylogError::Discovery(format!("{}: {e}", root.display())))?;

    let pattern = format!("{}/{JSON_GLOB}", Pattern::escape(&root.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| PlaylogError::Discovery(format!("bad pattern {pattern}: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PlaylogError::Discovery(e.to_string()))?;
        if path.is_file() && !is_hidden_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
