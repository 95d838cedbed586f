// src/track/paths.rs

//! Path normalisation helpers shared by the scanner and the live watcher.
//!
//! Tracked paths are root-relative strings with forward slashes; these
//! helpers are the single place where OS paths are converted to that form.

use std::path::{Path, PathBuf};

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Only if both attempts fail do we give up.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(slashify(rel));
    }

    // Helps on platforms (notably macOS) where different absolute prefixes
    // may refer to the same underlying directory (symlinks, /private/var/...).
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(slashify(rel));
        }
    }

    None
}

/// Resolve a root-relative path string against `root`.
///
/// `"."` and the empty string name the root itself; joining them would
/// produce `root/.`, which confuses exact-path lookups.
pub fn join_rel(root: &Path, rel: &str) -> PathBuf {
    if rel == "." || rel.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

fn slashify(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
