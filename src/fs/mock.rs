// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { executable: bool },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for probing tests.
///
/// Clones share state, so a test can keep a handle and inspect what an
/// installer created.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.to_path_buf(), MockEntry::File { executable: false });
        link_into_parent(&mut entries, path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        ensure_dir(&mut entries, path.as_ref());
    }

    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(
            entries.get(path.as_ref()),
            Some(MockEntry::File { executable: true })
        )
    }
}

fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(entries, path);
}

/// Register `path` as a child of its parent directory, creating parents as
/// needed. Stops at the filesystem root or an empty parent.
fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() || parent == path {
        return;
    }

    ensure_dir(entries, parent);

    if let (Some(MockEntry::Dir(children)), Some(name)) = (
        entries.get_mut(parent),
        path.file_name().and_then(|n| n.to_str()),
    ) {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::File { .. }))
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

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.remove(path) {
            Some(MockEntry::File { .. }) => {
                if let Some(MockEntry::Dir(children)) =
                    path.parent().and_then(|p| entries.get_mut(p))
                {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        children.retain(|c| c != name);
                    }
                }
                Ok(())
            }
            Some(dir @ MockEntry::Dir(_)) => {
                entries.insert(path.to_path_buf(), dir);
                Err(anyhow!("Is a directory: {:?}", path))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn set_executable(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(path) {
            Some(MockEntry::File { executable }) => {
                *executable = true;
                Ok(())
            }
            _ => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
