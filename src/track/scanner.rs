// src/track/scanner.rs

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::track::paths::relative_str;
use crate::track::rules::RuleSet;
use crate::track::TrackerContext;

/// Enumerate every tracked file under `start`.
///
/// Walks the subtree through the directory-listing collaborator, converts
/// each file to a root-relative path and keeps only those passing
/// classification. The result is deduplicated and sorted, so callers get a
/// stable notification order.
///
/// A missing `start` is a legitimate transient state (e.g. an output
/// directory before the first build) and yields an empty result. A `start`
/// that is itself a file yields at most that file. Listing errors from the
/// collaborator propagate unmodified.
pub fn scan(
    fs: &dyn FileSystem,
    root: &Path,
    start: &Path,
    rules: &RuleSet,
    ctx: &TrackerContext,
) -> Result<Vec<String>> {
    if !fs.exists(start) {
        debug!(?start, "scan target does not exist, returning empty set");
        return Ok(Vec::new());
    }

    let mut seen: HashSet<String> = HashSet::new();

    if fs.is_file(start) {
        collect(root, start, rules, ctx, &mut seen);
    } else {
        let mut stack = vec![start.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs.read_dir(&dir)? {
                if fs.is_dir(&entry) {
                    stack.push(entry);
                } else if fs.is_file(&entry) {
                    collect(root, &entry, rules, ctx, &mut seen);
                }
            }
        }
    }

    let mut found: Vec<String> = seen.into_iter().collect();
    found.sort();
    Ok(found)
}

fn collect(
    root: &Path,
    file: &Path,
    rules: &RuleSet,
    ctx: &TrackerContext,
    seen: &mut HashSet<String>,
) {
    if let Some(rel) = relative_str(root, file) {
        if rules.is_tracked(&rel, ctx) {
            seen.insert(rel);
        }
    }
}
