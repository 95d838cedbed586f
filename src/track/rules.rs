// src/track/rules.rs

use std::fmt;

use regex::Regex;

use crate::errors::{Result, SitewatchError};
use crate::track::TrackerContext;

/// Boxed predicate form of a rule.
pub type PredicateFn = Box<dyn Fn(&str, &TrackerContext) -> bool>;

/// A single classification rule.
///
/// A rule is either a structural pattern tested against the path string, or
/// an arbitrary predicate over the path and the tracker context. The two
/// forms are interchangeable everywhere a rule is accepted.
pub enum Rule {
    Pattern(Regex),
    Predicate(PredicateFn),
}

impl Rule {
    /// Compile a pattern rule from a regex string.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Rule::Pattern(Regex::new(pattern)?))
    }

    /// Wrap a predicate function as a rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &TrackerContext) -> bool + 'static,
    {
        Rule::Predicate(Box::new(f))
    }

    /// Test this rule against a root-relative path.
    pub fn matches(&self, path: &str, ctx: &TrackerContext) -> bool {
        match self {
            Rule::Pattern(regex) => regex.is_match(path),
            Rule::Predicate(pred) => pred(path, ctx),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Debug)]
struct NamedRule {
    name: String,
    rule: Rule,
}

/// Named, insertion-ordered watch and ignore rules.
///
/// A path is *tracked* when at least one watch rule matches it and no ignore
/// rule does. Ignores always win; there is no per-rule override. Within a
/// group the rules are a plain OR, so their order never affects
/// classification. Order is kept only so that re-registering a name
/// replaces the rule in place.
#[derive(Debug, Default)]
pub struct RuleSet {
    watch: Vec<NamedRule>,
    ignore: Vec<NamedRule>,
}

impl RuleSet {
    /// An empty rule set: nothing is tracked until watch rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default rules a content pipeline starts from: watch the source
    /// and data directories plus library code, ignore editor droppings and
    /// git metadata. All entries are named, so configuration can replace
    /// any of them individually.
    pub fn builtin() -> Result<Self> {
        let mut rules = Self::new();

        rules.add_watch(
            "source",
            Rule::predicate(|path, ctx| under_dir(path, &ctx.source_dir)),
        );
        rules.add_watch(
            "data",
            Rule::predicate(|path, ctx| under_dir(path, &ctx.data_dir)),
        );
        rules.add_watch("library", Rule::pattern(r"^(lib|helpers)/")?);

        rules.add_ignore("emacs_files", Rule::pattern(r"(^|/)\.?#")?);
        rules.add_ignore("tilde_files", Rule::pattern(r"~$")?);
        rules.add_ignore("ds_store", Rule::pattern(r"\.DS_Store$")?);
        rules.add_ignore("git", Rule::pattern(r"(^|/)\.git(ignore|modules|/)")?);

        Ok(rules)
    }

    /// Insert or replace a watch rule. Replacing keeps the original
    /// position; a new name is appended.
    pub fn add_watch(&mut self, name: &str, rule: Rule) {
        upsert(&mut self.watch, name, rule);
    }

    /// Insert or replace an ignore rule.
    pub fn add_ignore(&mut self, name: &str, rule: Rule) {
        upsert(&mut self.ignore, name, rule);
    }

    /// Names of the watch rules, in registration order.
    pub fn watch_names(&self) -> impl Iterator<Item = &str> {
        self.watch.iter().map(|r| r.name.as_str())
    }

    /// Names of the ignore rules, in registration order.
    pub fn ignore_names(&self) -> impl Iterator<Item = &str> {
        self.ignore.iter().map(|r| r.name.as_str())
    }

    /// Look up a watch rule by name. Unknown names are an error, never a
    /// silent default.
    pub fn watch_rule(&self, name: &str) -> Result<&Rule> {
        lookup(&self.watch, name)
    }

    /// Look up an ignore rule by name.
    pub fn ignore_rule(&self, name: &str) -> Result<&Rule> {
        lookup(&self.ignore, name)
    }

    /// Whether `path` passes classification: watched and not ignored.
    pub fn is_tracked(&self, path: &str, ctx: &TrackerContext) -> bool {
        let watched = self.watch.iter().any(|r| r.rule.matches(path, ctx));
        if !watched {
            return false;
        }
        self.ignore.iter().all(|r| !r.rule.matches(path, ctx))
    }
}

fn lookup<'a>(rules: &'a [NamedRule], name: &str) -> Result<&'a Rule> {
    rules
        .iter()
        .find(|r| r.name == name)
        .map(|r| &r.rule)
        .ok_or_else(|| SitewatchError::RuleNotFound(name.to_string()))
}

fn upsert(rules: &mut Vec<NamedRule>, name: &str, rule: Rule) {
    match rules.iter_mut().find(|r| r.name == name) {
        Some(existing) => existing.rule = rule,
        None => rules.push(NamedRule {
            name: name.to_string(),
            rule,
        }),
    }
}

/// True when `path` lies strictly under the directory `dir`.
fn under_dir(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}
