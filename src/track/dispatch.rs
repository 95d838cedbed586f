// src/track/dispatch.rs

use std::fmt;

use regex::Regex;

use crate::errors::Result;

/// Boxed callback invoked with the affected root-relative path.
pub type Handler = Box<dyn FnMut(&str) -> Result<()>>;

/// A registered callback plus its optional path matcher.
///
/// With no matcher the callback fires for every event; with one it fires
/// only for paths the matcher accepts.
pub struct CallbackEntry {
    matcher: Option<Regex>,
    handler: Handler,
}

impl CallbackEntry {
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }
}

impl fmt::Debug for CallbackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEntry")
            .field("matcher", &self.matcher.as_ref().map(Regex::as_str))
            .finish_non_exhaustive()
    }
}

/// Registry of change and delete callbacks.
///
/// Callbacks run synchronously and in registration order. An error from one
/// handler propagates immediately and aborts the remaining handlers for
/// that event; it is never swallowed.
#[derive(Default)]
pub struct Dispatcher {
    changed: Vec<CallbackEntry>,
    deleted: Vec<CallbackEntry>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("changed", &self.changed.len())
            .field("deleted", &self.deleted.len())
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change callback.
    pub fn on_change<F>(&mut self, matcher: Option<Regex>, handler: F)
    where
        F: FnMut(&str) -> Result<()> + 'static,
    {
        self.changed.push(CallbackEntry {
            matcher,
            handler: Box::new(handler),
        });
    }

    /// Register a delete callback.
    pub fn on_delete<F>(&mut self, matcher: Option<Regex>, handler: F)
    where
        F: FnMut(&str) -> Result<()> + 'static,
    {
        self.deleted.push(CallbackEntry {
            matcher,
            handler: Box::new(handler),
        });
    }

    /// The change registrations, in registration order.
    pub fn change_entries(&self) -> &[CallbackEntry] {
        &self.changed
    }

    /// The delete registrations, in registration order.
    pub fn delete_entries(&self) -> &[CallbackEntry] {
        &self.deleted
    }

    /// Notify change callbacks that `path` changed.
    pub fn dispatch_changed(&mut self, path: &str) -> Result<()> {
        dispatch(&mut self.changed, path)
    }

    /// Notify delete callbacks that `path` was deleted.
    pub fn dispatch_deleted(&mut self, path: &str) -> Result<()> {
        dispatch(&mut self.deleted, path)
    }
}

fn dispatch(entries: &mut [CallbackEntry], path: &str) -> Result<()> {
    for entry in entries.iter_mut() {
        let interested = match &entry.matcher {
            Some(matcher) => matcher.is_match(path),
            None => true,
        };
        if interested {
            (entry.handler)(path)?;
        }
    }
    Ok(())
}
