use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use sitewatch::collections::{CollectionStore, InMemoryGraph};
use sitewatch::errors::SitewatchError;

type TestResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Page {
    path: String,
    tags: Vec<String>,
}

fn page(path: &str, tags: &[&str]) -> Page {
    Page {
        path: path.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn flat_collection_selects_in_graph_order() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &[]));
    graph.insert(page("about.md", &[]));
    graph.insert(page("posts/b.md", &[]));

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define("posts", |p: &Page| p.path.starts_with("posts/"));

    let items = store.items("posts", &graph)?;
    let paths: Vec<&str> = items.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["posts/a.md", "posts/b.md"]);

    Ok(())
}

#[test]
fn flat_collection_recomputes_only_on_version_change() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &[]));
    graph.insert(page("posts/b.md", &[]));

    let evaluations: Rc<RefCell<usize>> = Rc::default();
    let counter = Rc::clone(&evaluations);

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define("posts", move |p: &Page| {
        *counter.borrow_mut() += 1;
        p.path.starts_with("posts/")
    });

    let first: Vec<Page> = store.items("posts", &graph)?.to_vec();
    let after_first = *evaluations.borrow();
    assert_eq!(after_first, 2);

    // Same version: served from cache, selector not re-run.
    let second: Vec<Page> = store.items("posts", &graph)?.to_vec();
    assert_eq!(first, second);
    assert_eq!(*evaluations.borrow(), after_first);

    // Version bump: exactly one recompute over the new item list.
    graph.insert(page("posts/c.md", &[]));
    let third = store.items("posts", &graph)?;
    assert_eq!(third.len(), 3);
    assert_eq!(*evaluations.borrow(), after_first + 3);

    Ok(())
}

#[test]
fn touch_invalidates_without_structural_change() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &[]));

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define("posts", |p: &Page| p.path.starts_with("posts/"));

    assert_eq!(store.items("posts", &graph)?.len(), 1);
    graph.touch();
    assert_eq!(store.items("posts", &graph)?.len(), 1);

    Ok(())
}

#[test]
fn grouped_collection_fans_items_out_to_every_key() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &["rust", "testing"]));
    graph.insert(page("posts/b.md", &["rust"]));
    graph.insert(page("untagged.md", &[]));

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define_grouped(
        "by_tag",
        |p: &Page| p.path.ends_with(".md"),
        |p: &Page| p.tags.clone(),
    );

    let groups = store.groups("by_tag", &graph)?;
    assert_eq!(groups.len(), 2);

    let rust: Vec<&str> = groups["rust"].iter().map(|p| p.path.as_str()).collect();
    assert_eq!(rust, vec!["posts/a.md", "posts/b.md"]);

    let testing: Vec<&str> = groups["testing"].iter().map(|p| p.path.as_str()).collect();
    assert_eq!(testing, vec!["posts/a.md"]);

    Ok(())
}

#[test]
fn unknown_group_key_is_an_error() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &["rust"]));

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define_grouped("by_tag", |_: &Page| true, |p: &Page| p.tags.clone());

    match store.group("by_tag", "haskell", &graph) {
        Err(SitewatchError::GroupNotFound(key)) => assert_eq!(key, "haskell"),
        Err(e) => panic!("Expected GroupNotFound, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }

    Ok(())
}

#[test]
fn unknown_collection_name_is_an_error() -> TestResult {
    let graph: InMemoryGraph<Page> = InMemoryGraph::new();
    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define("posts", |_: &Page| true);

    match store.items("pages", &graph) {
        Err(SitewatchError::CollectionNotFound(name)) => assert_eq!(name, "pages"),
        Err(e) => panic!("Expected CollectionNotFound, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }

    Ok(())
}

#[test]
fn accessing_a_collection_with_the_wrong_shape_is_an_error() -> TestResult {
    let graph: InMemoryGraph<Page> = InMemoryGraph::new();
    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define("posts", |_: &Page| true);
    store.define_grouped("by_tag", |_: &Page| true, |p: &Page| p.tags.clone());

    assert!(matches!(
        store.groups("posts", &graph),
        Err(SitewatchError::ConfigError(_))
    ));
    assert!(matches!(
        store.items("by_tag", &graph),
        Err(SitewatchError::ConfigError(_))
    ));

    Ok(())
}

#[test]
fn grouped_collection_tracks_graph_removals() -> TestResult {
    let mut graph = InMemoryGraph::new();
    graph.insert(page("posts/a.md", &["rust"]));
    graph.insert(page("posts/b.md", &["rust"]));

    let mut store: CollectionStore<Page> = CollectionStore::new();
    store.define_grouped("by_tag", |_: &Page| true, |p: &Page| p.tags.clone());

    assert_eq!(store.group("by_tag", "rust", &graph)?.len(), 2);

    graph.retain(|p| p.path != "posts/b.md");
    assert_eq!(store.group("by_tag", "rust", &graph)?.len(), 1);

    Ok(())
}
