// src/track/index.rs

use std::collections::HashSet;

use globset::{Glob, GlobBuilder, GlobSetBuilder};

use crate::errors::Result;

/// The authoritative set of currently tracked paths.
///
/// Paths are root-relative strings with forward slashes; equality is plain
/// string equality. Iteration order is unspecified.
#[derive(Debug, Default)]
pub struct PathIndex {
    paths: HashSet<String>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Returns true if the path was not already present.
    pub fn insert(&mut self, path: &str) -> bool {
        self.paths.insert(path.to_string())
    }

    /// Returns true if the path was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// The subset of known paths matching a glob pattern.
    ///
    /// `*` and `?` do not cross `/`; use `**` to span directories.
    pub fn select_matching(&self, pattern: &str) -> Result<HashSet<String>> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();
        Ok(self
            .paths
            .iter()
            .filter(|p| glob.is_match(p.as_str()))
            .cloned()
            .collect())
    }

    /// The subset of known paths lying under `rel_dir` (or equal to it, so
    /// that a reload scoped to a single file selects that file).
    ///
    /// `"."` and the empty string select everything.
    pub fn select_under(&self, rel_dir: &str) -> Result<HashSet<String>> {
        if rel_dir == "." || rel_dir.is_empty() {
            return Ok(self.paths.iter().cloned().collect());
        }

        let dir = rel_dir.trim_end_matches('/');
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new(dir)?);
        builder.add(Glob::new(&format!("{dir}/**"))?);
        let set = builder.build()?;

        Ok(self
            .paths
            .iter()
            .filter(|p| set.is_match(p.as_str()))
            .cloned()
            .collect())
    }
}
