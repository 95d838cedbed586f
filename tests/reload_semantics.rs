use std::error::Error;

use sitewatch::track::{Rule, RuleSet};
use sitewatch_test_utils::builders::TrackerFixture;
use sitewatch_test_utils::recorder::{EventRecorder, RecordedKind};

type TestResult = Result<(), Box<dyn Error>>;

fn markdown_rules() -> Result<RuleSet, Box<dyn Error>> {
    let mut rules = RuleSet::new();
    rules.add_watch("markdown", Rule::pattern(r"\.md$")?);
    Ok(rules)
}

fn recorded_fixture() -> Result<(TrackerFixture, EventRecorder), Box<dyn Error>> {
    let mut fx = TrackerFixture::with_rules(markdown_rules()?);
    let rec = EventRecorder::new();
    fx.tracker.on_change(None, rec.change_handler());
    fx.tracker.on_delete(None, rec.delete_handler());
    Ok((fx, rec))
}

#[test]
fn full_reload_tracks_exactly_the_classified_files() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("posts/a.md");
    fx.add_file("posts/b.txt");
    fx.add_file("notes.md");

    fx.tracker.reload(".", false)?;

    let mut changed = rec.changed_paths();
    changed.sort();
    assert_eq!(changed, vec!["notes.md", "posts/a.md"]);

    assert!(fx.tracker.exists("posts/a.md"));
    assert!(fx.tracker.exists("notes.md"));
    assert!(!fx.tracker.exists("posts/b.txt"));

    Ok(())
}

#[test]
fn second_reload_with_unchanged_disk_is_silent() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("posts/a.md");
    fx.add_file("posts/b.md");

    fx.tracker.reload(".", false)?;
    assert_eq!(rec.len(), 2);

    rec.clear();
    fx.tracker.reload(".", false)?;
    assert!(rec.is_empty());

    Ok(())
}

#[test]
fn full_reload_infers_deletions() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("posts/a.md");
    fx.tracker.reload(".", false)?;
    rec.clear();

    fx.remove_file("posts/a.md");
    fx.tracker.reload(".", false)?;

    assert_eq!(rec.deleted_paths(), vec!["posts/a.md"]);
    assert_eq!(rec.len(), 1);
    assert!(!fx.tracker.exists("posts/a.md"));

    Ok(())
}

#[test]
fn only_new_reload_never_deletes() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("posts/a.md");
    fx.tracker.reload(".", false)?;
    rec.clear();

    fx.remove_file("posts/a.md");
    fx.tracker.find_new(".")?;

    assert!(rec.is_empty());
    // The stale entry stays until a full reload runs.
    assert!(fx.tracker.exists("posts/a.md"));

    Ok(())
}

#[test]
fn only_new_reload_reports_additions() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("posts/a.md");
    fx.tracker.reload(".", false)?;
    rec.clear();

    fx.add_file("posts/b.md");
    fx.tracker.find_new(".")?;

    assert_eq!(rec.changed_paths(), vec!["posts/b.md"]);

    Ok(())
}

#[test]
fn reload_of_missing_directory_is_a_noop() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;

    fx.tracker.reload("never-created", false)?;

    assert!(rec.is_empty());
    assert_eq!(fx.tracker.known_paths().count(), 0);

    Ok(())
}

#[test]
fn reload_is_scoped_to_its_subtree() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("a/x.md");
    fx.add_file("b/y.md");
    fx.tracker.reload(".", false)?;
    rec.clear();

    // b/y.md disappears, but we only reload a/.
    fx.remove_file("b/y.md");
    fx.tracker.reload("a", false)?;

    assert!(rec.is_empty());
    assert!(fx.tracker.exists("b/y.md"));

    // A root reload picks the deletion up.
    fx.tracker.reload(".", false)?;
    assert_eq!(rec.deleted_paths(), vec!["b/y.md"]);

    Ok(())
}

#[test]
fn changes_are_reported_before_deletions_within_one_pass() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;
    fx.add_file("old.md");
    fx.tracker.reload(".", false)?;
    rec.clear();

    fx.remove_file("old.md");
    fx.add_file("new.md");
    fx.tracker.reload(".", false)?;

    let events = rec.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, RecordedKind::Changed);
    assert_eq!(events[0].path, "new.md");
    assert_eq!(events[1].kind, RecordedKind::Deleted);
    assert_eq!(events[1].path, "old.md");

    Ok(())
}

#[test]
fn startup_reloads_data_dir_before_root() -> TestResult {
    let mut rules = markdown_rules()?;
    rules.add_watch("data", Rule::pattern(r"^data/")?);
    let mut fx = TrackerFixture::with_rules(rules);
    let rec = EventRecorder::new();
    fx.tracker.on_change(None, rec.change_handler());

    fx.add_file("data/site.yml");
    fx.add_file("posts/a.md");

    assert!(!fx.tracker.is_ready());
    fx.tracker.startup()?;
    assert!(fx.tracker.is_ready());

    let changed = rec.changed_paths();
    assert_eq!(changed.first().map(String::as_str), Some("data/site.yml"));
    assert!(changed.contains(&"posts/a.md".to_string()));
    // The data file is already known by the root pass; no duplicate.
    assert_eq!(changed.len(), 2);

    Ok(())
}

#[test]
fn did_change_and_did_delete_update_index_directly() -> TestResult {
    let (mut fx, rec) = recorded_fixture()?;

    // No scan involved: the live-event source vouches for the path.
    fx.tracker.did_change("posts/live.md")?;
    assert!(fx.tracker.exists("posts/live.md"));
    assert_eq!(rec.changed_paths(), vec!["posts/live.md"]);

    fx.tracker.did_delete("posts/live.md")?;
    assert!(!fx.tracker.exists("posts/live.md"));
    assert_eq!(rec.deleted_paths(), vec!["posts/live.md"]);

    Ok(())
}
