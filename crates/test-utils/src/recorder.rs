#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sitewatch::errors::Result;

/// What a recorded notification was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedKind {
    Changed,
    Deleted,
}

/// One notification as seen by a recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: RecordedKind,
    pub path: String,
}

/// Collects the notifications delivered to its handlers.
///
/// Clones share the same buffer, so a test can hand `change_handler()` /
/// `delete_handler()` to a tracker and later assert on `events()`.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change callback that records every invocation.
    pub fn change_handler(&self) -> impl FnMut(&str) -> Result<()> + 'static {
        let events = Rc::clone(&self.events);
        move |path: &str| {
            events.borrow_mut().push(RecordedEvent {
                kind: RecordedKind::Changed,
                path: path.to_string(),
            });
            Ok(())
        }
    }

    /// A delete callback that records every invocation.
    pub fn delete_handler(&self) -> impl FnMut(&str) -> Result<()> + 'static {
        let events = Rc::clone(&self.events);
        move |path: &str| {
            events.borrow_mut().push(RecordedEvent {
                kind: RecordedKind::Deleted,
                path: path.to_string(),
            });
            Ok(())
        }
    }

    /// Everything recorded so far, in delivery order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Paths of recorded change notifications, in delivery order.
    pub fn changed_paths(&self) -> Vec<String> {
        self.paths_of(RecordedKind::Changed)
    }

    /// Paths of recorded delete notifications, in delivery order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.paths_of(RecordedKind::Deleted)
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn paths_of(&self, kind: RecordedKind) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.path.clone())
            .collect()
    }
}
