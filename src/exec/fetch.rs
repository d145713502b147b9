// src/exec/fetch.rs

//! Downloading and unpacking release archives.

use std::fmt::Debug;
use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info};

/// Trait abstracting network downloads so installers can be tested offline.
pub trait Fetcher: Send + Sync + Debug {
    /// Download `url` to the file `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Download an archive from `url` and unpack it into `dest_dir`.
    ///
    /// The archive is stored next to its contents while unpacking and
    /// removed afterwards.
    fn download_and_extract(&self, url: &str, dest_dir: &Path) -> Result<()> {
        let archive = dest_dir.join(archive_file_name(url));

        self.download(url, &archive)?;
        extract_archive(&archive, dest_dir)?;
        fs::remove_file(&archive)
            .with_context(|| format!("removing archive {:?}", archive))?;
        Ok(())
    }
}

/// File name to store a download from `url` under: the last path segment,
/// without query string or fragment.
pub fn archive_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download.archive")
}

/// Fetcher backed by a blocking HTTP client.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for HttpFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        info!(%url, dest = %dest.display(), "downloading");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .with_context(|| format!("downloading {url}"))?;

        let mut file = File::create(dest).with_context(|| format!("creating file {:?}", dest))?;
        let bytes = response
            .copy_to(&mut file)
            .with_context(|| format!("writing {:?}", dest))?;

        debug!(%url, bytes, "download complete");
        Ok(())
    }
}

/// Archive formats the installers know how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else {
            None
        }
    }
}

/// Unpack `archive` into `dest_dir`, picking the format from its extension.
pub fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    let Some(kind) = ArchiveKind::from_path(archive) else {
        bail!("unsupported archive format: {:?}", archive);
    };

    debug!(archive = %archive.display(), dest = %dest_dir.display(), ?kind, "extracting");
    let file = File::open(archive).with_context(|| format!("opening archive {:?}", archive))?;

    match kind {
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(file)
                .with_context(|| format!("reading zip {:?}", archive))?;
            zip.extract(dest_dir)
                .with_context(|| format!("extracting {:?}", archive))?;
        }
        ArchiveKind::TarGz => {
            let mut tar = tar::Archive::new(GzDecoder::new(file));
            tar.unpack(dest_dir)
                .with_context(|| format!("extracting {:?}", archive))?;
        }
    }

    Ok(())
}
