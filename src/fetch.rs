//! Package download and archive extraction.
//!
//! Prebuilt Qt packages are plain HTTP downloads of `tar.gz` / `tar.xz`
//! archives. The provisioner talks to the [`PackageFetcher`] trait so tests
//! can substitute a fetcher that materializes a fake install tree.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tar::Archive;
use xz2::read::XzDecoder;

/// Downloads a package archive and unpacks it into a destination directory.
pub trait PackageFetcher {
    /// Fetch `url` and extract its contents under `dest`.
    ///
    /// Any network or extraction failure aborts the operation; nothing is
    /// retried and no partial-state cleanup is promised beyond removing the
    /// downloaded archive itself.
    fn download_and_extract(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Fetches packages over HTTP/HTTPS with a blocking client.
pub struct HttpPackageFetcher {
    client: Client,
    show_progress: bool,
}

impl HttpPackageFetcher {
    /// Create a fetcher with the default 30-second connect timeout.
    pub fn new() -> Self {
        Self::with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom connect timeout.
    ///
    /// Only connecting is time-boxed; the packages run to hundreds of
    /// megabytes, so the transfer itself is left unbounded.
    pub fn with_connect_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("qtprep")
                .connect_timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            show_progress: true,
        }
    }

    /// Disable the download progress bar.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn save_body(&self, response: &mut reqwest::blocking::Response, path: &Path) -> Result<()> {
        let total = response.content_length().unwrap_or(0);
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create download file {}", path.display()))?;

        if self.show_progress {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .expect("valid progress template")
                    .progress_chars("█▓░"),
            );
            io::copy(&mut pb.wrap_read(response.by_ref()), &mut file)
                .context("Error reading download stream")?;
            pb.finish_and_clear();
        } else {
            io::copy(response, &mut file).context("Error reading download stream")?;
        }

        Ok(())
    }
}

impl Default for HttpPackageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFetcher for HttpPackageFetcher {
    fn download_and_extract(&self, url: &str, dest: &Path) -> Result<()> {
        let file_name = archive_file_name(url);
        let Some(kind) = ArchiveKind::from_name(&file_name) else {
            bail!("Unsupported archive format: {file_name}");
        };

        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let archive_path = dest.join(&file_name);

        tracing::debug!("Fetching {} to {}", url, archive_path.display());
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to start download of {url}"))?;

        if !response.status().is_success() {
            bail!("HTTP {} downloading {}", response.status(), url);
        }

        self.save_body(&mut response, &archive_path)?;
        extract_archive(&archive_path, kind, dest)?;
        let _ = fs::remove_file(&archive_path);

        Ok(())
    }
}

/// Archive container format, derived from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    TarGz,
    TarXz,
}

impl ArchiveKind {
    fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(ArchiveKind::TarXz)
        } else {
            None
        }
    }
}

/// Last path segment of the URL, without query or fragment.
fn archive_file_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .unwrap_or(url)
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .to_string()
}

fn extract_archive(archive_path: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
    tracing::info!("Extracting {} to {}", archive_path.display(), dest.display());
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open {}", archive_path.display()))?;

    match kind {
        ArchiveKind::TarGz => Archive::new(GzDecoder::new(file)).unpack(dest),
        ArchiveKind::TarXz => Archive::new(XzDecoder::new(file)).unpack(dest),
    }
    .with_context(|| format!("Failed to extract {}", archive_path.display()))?;

    Ok(())
}
