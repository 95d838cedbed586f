// src/config/validate.rs

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::model::{ConfigFile, DefaultSection, RawConfigFile, RulePattern};
use crate::errors::{Result, SitewatchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SitewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_defaults(&raw.default)?;
        let watch = compile_rules("watch", &raw.watch)?;
        let ignore = compile_rules("ignore", &raw.ignore)?;
        Ok(ConfigFile::new_unchecked(raw.default, watch, ignore))
    }
}

fn validate_defaults(default: &DefaultSection) -> Result<()> {
    validate_dir("source_dir", &default.source_dir)?;
    validate_dir("data_dir", &default.data_dir)?;
    Ok(())
}

fn validate_dir(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SitewatchError::ConfigError(format!(
            "[default].{key} must not be empty"
        )));
    }
    if value.starts_with('/') {
        return Err(SitewatchError::ConfigError(format!(
            "[default].{key} must be relative to the project root (got '{value}')"
        )));
    }
    if value.ends_with('/') {
        return Err(SitewatchError::ConfigError(format!(
            "[default].{key} must not end with '/' (got '{value}')"
        )));
    }
    Ok(())
}

fn compile_rules(
    group: &str,
    raw: &BTreeMap<String, RulePattern>,
) -> Result<Vec<(String, Regex)>> {
    let mut compiled = Vec::with_capacity(raw.len());
    for (name, spec) in raw {
        let regex = Regex::new(&spec.pattern).map_err(|e| {
            SitewatchError::ConfigError(format!(
                "invalid pattern for [{group}.{name}]: {e}"
            ))
        })?;
        compiled.push((name.clone(), regex));
    }
    Ok(compiled)
}
