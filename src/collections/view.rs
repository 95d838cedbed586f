// src/collections/view.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::collections::graph::ResourceGraph;
use crate::errors::{Result, SitewatchError};

/// Boxed selection predicate for a collection.
pub type SelectFn<R> = Box<dyn Fn(&R) -> bool>;

/// Boxed group-key function. An item may land in zero, one or several
/// groups; keys are already their canonical string form.
pub type GroupKeyFn<R> = Box<dyn Fn(&R) -> Vec<String>>;

/// A value memoized against an external version counter.
///
/// `get_or_compute` compares the stored stamp to the counter and re-derives
/// the value on mismatch; otherwise the cached value is returned untouched.
/// The stamp starts out unset, so the first access always computes.
#[derive(Debug)]
pub struct Versioned<T> {
    stamp: Option<u64>,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(initial: T) -> Self {
        Self {
            stamp: None,
            data: initial,
        }
    }

    /// The version the cached value was computed at, if any.
    pub fn stamp(&self) -> Option<u64> {
        self.stamp
    }

    pub fn get_or_compute<F>(&mut self, version: u64, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if self.stamp != Some(version) {
            self.data = compute();
            self.stamp = Some(version);
        }
        &self.data
    }
}

/// A flat, lazily recomputed selection over a resource graph.
pub struct Collection<R> {
    select: SelectFn<R>,
    cache: Versioned<Vec<R>>,
}

impl<R> fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("stamp", &self.cache.stamp())
            .finish_non_exhaustive()
    }
}

impl<R: Clone> Collection<R> {
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&R) -> bool + 'static,
    {
        Self {
            select: Box::new(select),
            cache: Versioned::new(Vec::new()),
        }
    }

    /// The selected items, in graph order.
    ///
    /// Served from cache while the graph version is unchanged.
    pub fn items(&mut self, graph: &dyn ResourceGraph<R>) -> &[R] {
        let select = &self.select;
        self.cache.get_or_compute(graph.version(), || {
            let mut out = Vec::new();
            for item in graph.items() {
                if select(item) {
                    out.push(item.clone());
                }
            }
            out
        })
    }
}

/// A keyed, lazily recomputed selection over a resource graph.
///
/// Selected items are fanned out to every key their group function yields;
/// within a group, items keep selection order.
pub struct GroupedCollection<R> {
    select: SelectFn<R>,
    group_by: GroupKeyFn<R>,
    cache: Versioned<BTreeMap<String, Vec<R>>>,
}

impl<R> fmt::Debug for GroupedCollection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedCollection")
            .field("stamp", &self.cache.stamp())
            .finish_non_exhaustive()
    }
}

impl<R: Clone> GroupedCollection<R> {
    pub fn new<F, G>(select: F, group_by: G) -> Self
    where
        F: Fn(&R) -> bool + 'static,
        G: Fn(&R) -> Vec<String> + 'static,
    {
        Self {
            select: Box::new(select),
            group_by: Box::new(group_by),
            cache: Versioned::new(BTreeMap::new()),
        }
    }

    /// All groups, keyed by canonical group key.
    pub fn groups(&mut self, graph: &dyn ResourceGraph<R>) -> &BTreeMap<String, Vec<R>> {
        let select = &self.select;
        let group_by = &self.group_by;
        self.cache.get_or_compute(graph.version(), || {
            let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
            for item in graph.items() {
                if !select(item) {
                    continue;
                }
                for key in group_by(item) {
                    groups.entry(key).or_default().push(item.clone());
                }
            }
            groups
        })
    }

    /// The items of one group. Unknown keys are an error, not an empty
    /// sequence.
    pub fn group(&mut self, key: &str, graph: &dyn ResourceGraph<R>) -> Result<&[R]> {
        self.groups(graph)
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| SitewatchError::GroupNotFound(key.to_string()))
    }
}
