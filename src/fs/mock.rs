// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for tests.
///
/// Clones share the same underlying entry map, so a test can keep a handle
/// and mutate disk state while a tracker holds another clone behind
/// `Arc<dyn FileSystem>`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // Ensure a relative root exists
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Create a file, implicitly creating all parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.clone(), MockEntry::File);
        link_into_parents(&mut entries, &path);
    }

    /// Create an empty directory, implicitly creating all parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry(path.clone())
            .or_insert_with(|| MockEntry::Dir(Vec::new()));
        link_into_parents(&mut entries, &path);
    }

    /// Remove a file and unlink it from its parent directory.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        entries.remove(path);

        if let Some(parent) = path.parent() {
            let parent = normalize_parent(parent);
            if let Some(MockEntry::Dir(children)) = entries.get_mut(&parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    children.retain(|c| c != name);
                }
            }
        }
    }
}

/// Walk up from `path`, creating directory entries and child links as needed.
fn link_into_parents(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let mut child = path.to_path_buf();
    while let Some(parent) = child.parent() {
        let parent = normalize_parent(parent);
        let name = child.file_name().and_then(|n| n.to_str()).map(str::to_string);

        let entry = entries
            .entry(parent.clone())
            .or_insert_with(|| MockEntry::Dir(Vec::new()));
        if let (MockEntry::Dir(children), Some(name)) = (entry, name) {
            if !children.contains(&name) {
                children.push(name);
            }
        }

        if parent == child {
            break;
        }
        child = parent;
    }
}

fn normalize_parent(parent: &Path) -> PathBuf {
    if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::File))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
