// src/collections/store.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::collections::graph::ResourceGraph;
use crate::collections::view::{Collection, GroupedCollection};
use crate::errors::{Result, SitewatchError};

/// Either shape of collection, as stored under a name.
pub enum AnyCollection<R> {
    Flat(Collection<R>),
    Grouped(GroupedCollection<R>),
}

impl<R> fmt::Debug for AnyCollection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyCollection::Flat(c) => c.fmt(f),
            AnyCollection::Grouped(c) => c.fmt(f),
        }
    }
}

/// Named collections, defined once at configuration time.
///
/// Lookups are strict: asking for a name that was never defined (or using
/// the flat accessor on a grouped collection and vice versa) is an error,
/// never a silent empty result.
pub struct CollectionStore<R> {
    collections: BTreeMap<String, AnyCollection<R>>,
}

impl<R> fmt::Debug for CollectionStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("names", &self.collections.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<R> Default for CollectionStore<R> {
    fn default() -> Self {
        Self {
            collections: BTreeMap::new(),
        }
    }
}

impl<R: Clone> CollectionStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a flat collection. Redefining a name replaces it.
    pub fn define<F>(&mut self, name: &str, select: F)
    where
        F: Fn(&R) -> bool + 'static,
    {
        self.collections
            .insert(name.to_string(), AnyCollection::Flat(Collection::new(select)));
    }

    /// Define a grouped collection.
    pub fn define_grouped<F, G>(&mut self, name: &str, select: F, group_by: G)
    where
        F: Fn(&R) -> bool + 'static,
        G: Fn(&R) -> Vec<String> + 'static,
    {
        self.collections.insert(
            name.to_string(),
            AnyCollection::Grouped(GroupedCollection::new(select, group_by)),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut AnyCollection<R>> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| SitewatchError::CollectionNotFound(name.to_string()))
    }

    /// The items of a flat collection.
    pub fn items(&mut self, name: &str, graph: &dyn ResourceGraph<R>) -> Result<&[R]> {
        match self.get_mut(name)? {
            AnyCollection::Flat(c) => Ok(c.items(graph)),
            AnyCollection::Grouped(_) => Err(SitewatchError::ConfigError(format!(
                "collection '{name}' is grouped; use groups()"
            ))),
        }
    }

    /// The group map of a grouped collection.
    pub fn groups(
        &mut self,
        name: &str,
        graph: &dyn ResourceGraph<R>,
    ) -> Result<&BTreeMap<String, Vec<R>>> {
        match self.get_mut(name)? {
            AnyCollection::Grouped(c) => Ok(c.groups(graph)),
            AnyCollection::Flat(_) => Err(SitewatchError::ConfigError(format!(
                "collection '{name}' is flat; use items()"
            ))),
        }
    }

    /// One group of a grouped collection.
    pub fn group(
        &mut self,
        name: &str,
        key: &str,
        graph: &dyn ResourceGraph<R>,
    ) -> Result<&[R]> {
        match self.get_mut(name)? {
            AnyCollection::Grouped(c) => c.group(key, graph),
            AnyCollection::Flat(_) => Err(SitewatchError::ConfigError(format!(
                "collection '{name}' is flat; use items()"
            ))),
        }
    }
}
