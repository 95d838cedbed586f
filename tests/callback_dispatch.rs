use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use anyhow::anyhow;
use regex::Regex;
use sitewatch::errors::SitewatchError;
use sitewatch::track::{Rule, RuleSet};
use sitewatch_test_utils::builders::TrackerFixture;

type TestResult = Result<(), Box<dyn Error>>;

fn markdown_fixture() -> Result<TrackerFixture, Box<dyn Error>> {
    let mut rules = RuleSet::new();
    rules.add_watch("markdown", Rule::pattern(r"\.md$")?);
    Ok(TrackerFixture::with_rules(rules))
}

#[test]
fn callbacks_fire_in_registration_order() -> TestResult {
    let mut fx = markdown_fixture()?;
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let first = Rc::clone(&order);
    fx.tracker.on_change(None, move |_| {
        first.borrow_mut().push("first");
        Ok(())
    });
    let second = Rc::clone(&order);
    fx.tracker.on_change(None, move |_| {
        second.borrow_mut().push("second");
        Ok(())
    });

    fx.tracker.did_change("a.md")?;

    assert_eq!(*order.borrow(), vec!["first", "second"]);

    Ok(())
}

#[test]
fn matchers_scope_callbacks_to_matching_paths() -> TestResult {
    let mut fx = markdown_fixture()?;
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    let blog_seen = Rc::clone(&seen);
    fx.tracker
        .on_change(Some(Regex::new(r"^blog/")?), move |path| {
            blog_seen.borrow_mut().push(format!("blog:{path}"));
            Ok(())
        });
    let all_seen = Rc::clone(&seen);
    fx.tracker.on_change(None, move |path| {
        all_seen.borrow_mut().push(format!("all:{path}"));
        Ok(())
    });

    fx.tracker.did_change("blog/a.md")?;
    fx.tracker.did_change("docs/b.md")?;

    assert_eq!(
        *seen.borrow(),
        vec!["blog:blog/a.md", "all:blog/a.md", "all:docs/b.md"]
    );

    Ok(())
}

#[test]
fn handler_failure_aborts_remaining_dispatch() -> TestResult {
    let mut fx = markdown_fixture()?;
    let reached: Rc<RefCell<bool>> = Rc::default();

    fx.tracker
        .on_change(None, |_| Err(anyhow!("handler blew up").into()));
    let flag = Rc::clone(&reached);
    fx.tracker.on_change(None, move |_| {
        *flag.borrow_mut() = true;
        Ok(())
    });

    let result = fx.tracker.did_change("a.md");

    assert!(matches!(result, Err(SitewatchError::Other(_))));
    assert!(!*reached.borrow());
    // Bookkeeping applied before the failing callback is not rolled back.
    assert!(fx.tracker.exists("a.md"));

    Ok(())
}

#[test]
fn registries_are_introspectable() -> TestResult {
    let mut fx = markdown_fixture()?;

    fx.tracker
        .on_change(Some(Regex::new(r"^blog/")?), |_| Ok(()));
    fx.tracker.on_change(None, |_| Ok(()));
    fx.tracker.on_delete(None, |_| Ok(()));

    let change = fx.tracker.change_callbacks();
    assert_eq!(change.len(), 2);
    assert_eq!(change[0].matcher().map(|m| m.as_str()), Some("^blog/"));
    assert!(change[1].matcher().is_none());

    assert_eq!(fx.tracker.delete_callbacks().len(), 1);

    Ok(())
}

#[test]
fn delete_callbacks_respect_matchers_too() -> TestResult {
    let mut fx = markdown_fixture()?;
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    let blog_seen = Rc::clone(&seen);
    fx.tracker
        .on_delete(Some(Regex::new(r"^blog/")?), move |path| {
            blog_seen.borrow_mut().push(path.to_string());
            Ok(())
        });

    fx.tracker.did_change("blog/a.md")?;
    fx.tracker.did_change("docs/b.md")?;
    fx.tracker.did_delete("docs/b.md")?;
    fx.tracker.did_delete("blog/a.md")?;

    assert_eq!(*seen.borrow(), vec!["blog/a.md"]);

    Ok(())
}
