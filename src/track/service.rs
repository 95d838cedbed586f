// src/track/service.rs

use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::track::dispatch::{CallbackEntry, Dispatcher};
use crate::track::index::PathIndex;
use crate::track::paths::join_rel;
use crate::track::rules::{Rule, RuleSet};
use crate::track::{scanner, TrackerContext};

/// The file-change tracking service.
///
/// Owns the tracked-path index, the rule set and the callback registries;
/// nothing else mutates them. All operations are synchronous. A host that
/// drives events from a background watcher must serialize them onto the
/// same execution context before calling in (see `live`).
pub struct FileTracker {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    ctx: TrackerContext,
    rules: RuleSet,
    index: PathIndex,
    dispatcher: Dispatcher,
    ready: bool,
}

impl std::fmt::Debug for FileTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTracker")
            .field("root", &self.root)
            .field("tracked", &self.index.len())
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

impl FileTracker {
    /// Create a tracker seeded with the builtin rules.
    pub fn new(root: PathBuf, fs: Arc<dyn FileSystem>, ctx: TrackerContext) -> Result<Self> {
        Ok(Self::with_rules(root, fs, ctx, RuleSet::builtin()?))
    }

    /// Create a tracker with an explicit rule set.
    pub fn with_rules(
        root: PathBuf,
        fs: Arc<dyn FileSystem>,
        ctx: TrackerContext,
        rules: RuleSet,
    ) -> Self {
        Self {
            root,
            fs,
            ctx,
            rules,
            index: PathIndex::new(),
            dispatcher: Dispatcher::new(),
            ready: false,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn context(&self) -> &TrackerContext {
        &self.ctx
    }

    /// Whether the initial load has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Register a watch rule under `name`.
    ///
    /// After the initial load has completed this triggers a full reload, so
    /// files the new rule picks up (or releases) are reported retroactively.
    /// Before readiness the rule simply takes part in future reloads.
    pub fn watch(&mut self, name: &str, rule: Rule) -> Result<()> {
        self.rules.add_watch(name, rule);
        if self.ready {
            self.reload(".", false)?;
        }
        Ok(())
    }

    /// Register an ignore rule under `name`. Same reload behaviour as
    /// [`watch`](Self::watch).
    pub fn ignore(&mut self, name: &str, rule: Rule) -> Result<()> {
        self.rules.add_ignore(name, rule);
        if self.ready {
            self.reload(".", false)?;
        }
        Ok(())
    }

    /// Register a change callback, optionally scoped by a path matcher.
    pub fn on_change<F>(&mut self, matcher: Option<Regex>, handler: F)
    where
        F: FnMut(&str) -> Result<()> + 'static,
    {
        self.dispatcher.on_change(matcher, handler);
    }

    /// Register a delete callback, optionally scoped by a path matcher.
    pub fn on_delete<F>(&mut self, matcher: Option<Regex>, handler: F)
    where
        F: FnMut(&str) -> Result<()> + 'static,
    {
        self.dispatcher.on_delete(matcher, handler);
    }

    /// The registered change callbacks, in registration order.
    pub fn change_callbacks(&self) -> &[CallbackEntry] {
        self.dispatcher.change_entries()
    }

    /// The registered delete callbacks, in registration order.
    pub fn delete_callbacks(&self) -> &[CallbackEntry] {
        self.dispatcher.delete_entries()
    }

    /// Whether `path` is currently tracked.
    pub fn exists(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    /// Whether `path` passes classification under the current rules.
    pub fn is_tracked(&self, path: &str) -> bool {
        self.rules.is_tracked(path, &self.ctx)
    }

    /// All currently tracked paths, in no particular order.
    pub fn known_paths(&self) -> impl Iterator<Item = &str> {
        self.index.iter()
    }

    /// Initial load: a dedicated pass over the data directory, then the full
    /// project root, then the tracker is marked ready.
    pub fn startup(&mut self) -> Result<()> {
        let data_dir = self.ctx.data_dir.clone();
        self.reload(&data_dir, false)?;
        self.reload(".", false)?;
        self.ready = true;
        info!(tracked = self.index.len(), "initial load complete");
        Ok(())
    }

    /// Reconcile the index against the on-disk state of a subtree.
    ///
    /// `rel_path` is relative to the tracker root (`"."` for everything).
    /// Newly discovered tracked files produce change notifications; with
    /// `only_new` false, previously known files that the scan no longer
    /// finds produce delete notifications. Files that are both known and
    /// still present are not re-notified, which makes back-to-back reloads
    /// of unchanged trees silent. A `rel_path` that does not exist on disk
    /// is a no-op.
    pub fn reload(&mut self, rel_path: &str, only_new: bool) -> Result<()> {
        let start = join_rel(&self.root, rel_path);
        if !self.fs.exists(&start) {
            debug!(path = %rel_path, "reload target does not exist, skipping");
            return Ok(());
        }

        let mut subset = self.index.select_under(rel_path)?;
        let current = scanner::scan(self.fs.as_ref(), &self.root, &start, &self.rules, &self.ctx)?;
        debug!(
            path = %rel_path,
            only_new,
            known = subset.len(),
            on_disk = current.len(),
            "reload pass"
        );

        for path in current {
            // Known and still present: nothing to report.
            if subset.remove(&path) {
                continue;
            }
            self.did_change(&path)?;
        }

        if !only_new {
            // Whatever is left was known under this subtree but not found on
            // disk this pass.
            let mut missing: Vec<String> = subset.into_iter().collect();
            missing.sort();
            for path in missing {
                self.did_delete(&path)?;
            }
        }

        Ok(())
    }

    /// Reload variant that reports additions only, never deletions.
    pub fn find_new(&mut self, rel_path: &str) -> Result<()> {
        self.reload(rel_path, true)
    }

    /// Record a change to a single path and notify change callbacks.
    ///
    /// This is the entry point for an external live-event source; it
    /// performs no scan and no classification check of its own.
    pub fn did_change(&mut self, path: &str) -> Result<()> {
        debug!(path = %path, "file change");
        self.index.insert(path);
        self.dispatcher.dispatch_changed(path)
    }

    /// Record the deletion of a single path and notify delete callbacks.
    pub fn did_delete(&mut self, path: &str) -> Result<()> {
        debug!(path = %path, "file delete");
        self.index.remove(path);
        self.dispatcher.dispatch_deleted(path)
    }
}
