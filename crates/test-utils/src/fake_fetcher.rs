use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use toolstrap::exec::Fetcher;
use toolstrap::fs::mock::MockFileSystem;

/// Offline [`Fetcher`] that "unpacks" a fixed list of files into a
/// [`MockFileSystem`].
#[derive(Debug, Clone)]
pub struct FakeFetcher {
    fs: MockFileSystem,
    contents: Vec<PathBuf>,
    fail: bool,
    urls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            contents: Vec::new(),
            fail: false,
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Relative paths every extracted archive contains.
    pub fn with_contents(mut self, files: &[&str]) -> Self {
        self.contents = files.iter().map(PathBuf::from).collect();
        self
    }

    /// Every download fails (e.g. no network).
    pub fn offline(mut self) -> Self {
        self.fail = true;
        self
    }

    /// URLs requested so far.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            bail!("network unreachable: {url}");
        }
        self.fs.add_file(dest);
        Ok(())
    }

    fn download_and_extract(&self, url: &str, dest_dir: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            bail!("network unreachable: {url}");
        }
        for file in &self.contents {
            self.fs.add_file(dest_dir.join(file));
        }
        Ok(())
    }
}
