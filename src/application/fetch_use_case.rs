// ============================================================
// Layer 2: FetchUseCase
// ============================================================
// Downloads both dataset files into the data directory,
// overwriting whatever is there.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::fetcher::{
    DataFetcher, RemoteFile, ANNOTATIONS_FILE, ANNOTATIONS_URL, COMMENTS_FILE, COMMENTS_URL,
};

// ─── Source Configuration ────────────────────────────────────────────────────
/// Where the dataset comes from and where it is stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub data_dir:        PathBuf,
    pub comments_url:    String,
    pub annotations_url: String,
}

impl SourceConfig {
    pub fn comments_path(&self) -> PathBuf {
        self.data_dir.join(COMMENTS_FILE)
    }

    pub fn annotations_path(&self) -> PathBuf {
        self.data_dir.join(ANNOTATIONS_FILE)
    }

    /// The two downloads, comments first
    pub fn remote_files(&self) -> Vec<RemoteFile> {
        vec![
            RemoteFile::new(&self.comments_url, self.comments_path()),
            RemoteFile::new(&self.annotations_url, self.annotations_path()),
        ]
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir:        PathBuf::from("data"),
            comments_url:    COMMENTS_URL.to_string(),
            annotations_url: ANNOTATIONS_URL.to_string(),
        }
    }
}

// ─── FetchUseCase ─────────────────────────────────────────────────────────────
pub struct FetchUseCase {
    source:  SourceConfig,
    fetcher: DataFetcher,
}

impl FetchUseCase {
    pub fn new(source: SourceConfig) -> Self {
        Self { source, fetcher: DataFetcher::new() }
    }

    /// Download both files; the first failure aborts.
    pub fn execute(&self) -> Result<()> {
        tracing::info!("Fetching dataset into '{}'", self.source.data_dir.display());
        self.fetcher.fetch_all(&self.source.remote_files())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let src = SourceConfig::default();
        assert_eq!(src.comments_path(), PathBuf::from("data/attack_annotated_comments.tsv"));
        assert_eq!(src.annotations_path(), PathBuf::from("data/attack_annotations.tsv"));

        let files = src.remote_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].url, COMMENTS_URL);
        assert_eq!(files[1].url, ANNOTATIONS_URL);
    }

    #[test]
    fn test_bad_url_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let src = SourceConfig {
            data_dir:        dir.path().to_path_buf(),
            comments_url:    "not a url".to_string(),
            annotations_url: "not a url either".to_string(),
        };
        assert!(FetchUseCase::new(src).execute().is_err());
    }
}
