// src/config/model.rs

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [default]
/// source_dir = "source"
/// data_dir = "data"
///
/// [watch.posts]
/// pattern = '^posts/'
///
/// [ignore.drafts]
/// pattern = '/_drafts/'
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Directory layout and builtin-rule toggle from `[default]`.
    #[serde(default)]
    pub default: DefaultSection,

    /// Extra watch rules from `[watch.<name>]`.
    ///
    /// Keys are the *rule names*; re-using a builtin name replaces that
    /// builtin rule.
    #[serde(default)]
    pub watch: BTreeMap<String, RulePattern>,

    /// Extra ignore rules from `[ignore.<name>]`.
    #[serde(default)]
    pub ignore: BTreeMap<String, RulePattern>,
}

/// `[default]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSection {
    /// Directory holding renderable sources, relative to the project root.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Directory holding structured data files, reloaded in a dedicated
    /// pass before the rest of the project.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Whether to seed the builtin watch/ignore rules. Disable to start
    /// from an empty rule set.
    #[serde(default = "default_builtin_rules")]
    pub builtin_rules: bool,
}

fn default_source_dir() -> String {
    "source".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_builtin_rules() -> bool {
    true
}

impl Default for DefaultSection {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            data_dir: default_data_dir(),
            builtin_rules: default_builtin_rules(),
        }
    }
}

/// A single `[watch.<name>]` / `[ignore.<name>]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RulePattern {
    /// Regular expression tested against root-relative paths.
    pub pattern: String,
}

/// Validated configuration: patterns are compiled, directories checked.
///
/// Constructed via `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    default: DefaultSection,
    watch: Vec<(String, Regex)>,
    ignore: Vec<(String, Regex)>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        default: DefaultSection,
        watch: Vec<(String, Regex)>,
        ignore: Vec<(String, Regex)>,
    ) -> Self {
        Self {
            default,
            watch,
            ignore,
        }
    }

    pub fn default_section(&self) -> &DefaultSection {
        &self.default
    }

    /// Compiled watch rules as `(name, regex)`, in name order.
    pub fn watch_rules(&self) -> &[(String, Regex)] {
        &self.watch
    }

    /// Compiled ignore rules as `(name, regex)`, in name order.
    pub fn ignore_rules(&self) -> &[(String, Regex)] {
        &self.ignore
    }
}
