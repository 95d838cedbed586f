#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use sitewatch::errors::Result;
use sitewatch::fs::mock::MockFileSystem;
use sitewatch::track::{FileTracker, RuleSet, TrackerContext};

/// A tracker over a mock filesystem, rooted at `/site`.
///
/// Keeps a handle to the mock so tests can mutate "disk" state between
/// reloads through `add_file`/`remove_file`.
pub struct TrackerFixture {
    pub fs: MockFileSystem,
    pub root: PathBuf,
    pub tracker: FileTracker,
}

impl TrackerFixture {
    /// Fixture with an empty rule set; tests add the rules they need.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::new())
    }

    /// Fixture seeded with the builtin rules.
    pub fn builtin() -> Result<Self> {
        Ok(Self::with_rules(RuleSet::builtin()?))
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self::with_rules_and_context(rules, TrackerContext::default())
    }

    pub fn with_rules_and_context(rules: RuleSet, ctx: TrackerContext) -> Self {
        let fs = MockFileSystem::new();
        let root = PathBuf::from("/site");
        fs.add_dir(&root);

        let tracker = FileTracker::with_rules(root.clone(), Arc::new(fs.clone()), ctx, rules);

        Self { fs, root, tracker }
    }

    /// Create a file on the mock disk, path relative to the fixture root.
    pub fn add_file(&self, rel: &str) {
        self.fs.add_file(self.root.join(rel));
    }

    /// Remove a file from the mock disk, path relative to the fixture root.
    pub fn remove_file(&self, rel: &str) {
        self.fs.remove_file(self.root.join(rel));
    }
}

impl Default for TrackerFixture {
    fn default() -> Self {
        Self::new()
    }
}
