// src/collections/mod.rs

//! Derived views over a dynamic resource graph.
//!
//! The graph itself lives outside this crate; all we rely on is its item
//! sequence and a monotonic version counter that the owner bumps on every
//! structural mutation. Views cache their derived contents together with
//! the version they were computed at and recompute lazily on the next
//! access after the version moves; nothing here is invalidated by push.

pub mod graph;
pub mod store;
pub mod view;

pub use graph::{InMemoryGraph, ResourceGraph};
pub use store::{AnyCollection, CollectionStore};
pub use view::{Collection, GroupedCollection, Versioned};
