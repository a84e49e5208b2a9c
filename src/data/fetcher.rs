// ============================================================
// Layer 4: Data Fetcher
// ============================================================
// Downloads the dataset files from figshare into the local
// data directory with a blocking `ureq` GET.
//
//   attack_annotated_comments.tsv  ← files/7554634
//   attack_annotations.tsv         ← files/7554637
//
// Existing files are overwritten only once the body has been
// fully received into a `.part` file. There is no retry and no
// checksum: a network error, a non-2xx status or a failed write
// aborts the run.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

/// figshare download for the annotated comments table
pub const COMMENTS_URL: &str = "https://ndownloader.figshare.com/files/7554634";

/// figshare download for the per-annotator judgments table
pub const ANNOTATIONS_URL: &str = "https://ndownloader.figshare.com/files/7554637";

/// Local filename for the comments table
pub const COMMENTS_FILE: &str = "attack_annotated_comments.tsv";

/// Local filename for the annotations table
pub const ANNOTATIONS_FILE: &str = "attack_annotations.tsv";

/// One remote file and where it should land on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub url:         String,
    pub destination: PathBuf,
}

impl RemoteFile {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url:         url.into(),
            destination: destination.into(),
        }
    }
}

/// Retrieves remote files into local storage.
pub struct DataFetcher {
    agent: ureq::Agent,
}

impl DataFetcher {
    pub fn new() -> Self {
        Self { agent: ureq::AgentBuilder::new().build() }
    }

    /// Download every file in order, stopping at the first failure.
    pub fn fetch_all(&self, files: &[RemoteFile]) -> Result<()> {
        for file in files {
            self.fetch(&file.url, &file.destination)?;
        }
        Ok(())
    }

    /// Download `url` into `destination`, overwriting it.
    /// Returns the number of bytes written.
    pub fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        tracing::info!("Downloading '{}' → '{}'", url, destination.display());

        // ureq reports 4xx / 5xx responses as errors
        let response = self
            .agent
            .get(url)
            .call()
            .with_context(|| format!("Download of '{url}' failed"))?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
            }
        }

        let bytes = write_replacing(response.into_reader(), destination)?;

        tracing::info!("Downloaded {} bytes to '{}'", bytes, destination.display());
        Ok(bytes)
    }
}

/// Stream `reader` into `{destination}.part`, then rename it over
/// `destination`. On failure the partial file is removed and any
/// previous copy of `destination` is left as it was.
fn write_replacing(mut reader: impl Read, destination: &Path) -> Result<u64> {
    let partial = partial_path(destination);

    let written = File::create(&partial)
        .with_context(|| format!("Cannot create '{}'", partial.display()))
        .and_then(|mut file| {
            io::copy(&mut reader, &mut file)
                .with_context(|| format!("Cannot write '{}'", partial.display()))
        });

    let bytes = match written {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
    };

    fs::rename(&partial, destination).with_context(|| {
        format!("Cannot move '{}' to '{}'", partial.display(), destination.display())
    })?;
    Ok(bytes)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

impl Default for DataFetcher {
    fn default() -> Self {
        Self::new()
    }
}
