// ============================================================
// Layer 4: TSV Loader
// ============================================================
// Parses the two tab-separated dataset files with the `csv`
// crate and serde.
//
// attack_annotated_comments.tsv (one row per comment):
//   rev_id  comment  year  logged_in  ns  sample  split
//
// attack_annotations.tsv (one row per annotator judgment):
//   rev_id  worker_id  quoting_attack  recipient_attack
//   third_party_attack  other_attack  attack
//
// Only rev_id / comment / split and rev_id / attack are
// required; every other column is ignored. Columns are matched
// by header name, so their order does not matter.
//
// Number formats seen in the wild:
//   - rev_id may be written as "37675" or "37675.0"
//   - attack is written as "0.0" / "1.0"
//
// A missing column or an unparsable value is a fatal error
// naming the file and the record.

use anyhow::{bail, Context, Result};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::{fs::File, io::Read, path::PathBuf};

use crate::domain::annotation::Annotation;
use crate::domain::comment::Comment;
use crate::domain::traits::{AnnotationSource, CommentSource};

// ─── Raw rows ─────────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct CommentRow {
    #[serde(deserialize_with = "de_rev_id")]
    rev_id: u64,
    comment: String,
    split: String,
}

#[derive(Debug, Deserialize)]
struct AnnotationRow {
    #[serde(deserialize_with = "de_rev_id")]
    rev_id: u64,
    #[serde(default, deserialize_with = "de_opt_rev_id")]
    worker_id: Option<u64>,
    #[serde(deserialize_with = "de_judgment")]
    attack: bool,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment::new(row.rev_id, row.comment, row.split.as_str())
    }
}

impl From<AnnotationRow> for Annotation {
    fn from(row: AnnotationRow) -> Self {
        let annotation = Annotation::new(row.rev_id, row.attack);
        match row.worker_id {
            Some(worker_id) => annotation.with_worker(worker_id),
            None            => annotation,
        }
    }
}

// ─── TsvLoader ────────────────────────────────────────────────────────────────
/// Loads comments and annotations from the two dataset files.
/// Implements both source traits from Layer 3.
pub struct TsvLoader {
    comments_path:    PathBuf,
    annotations_path: PathBuf,
}

impl TsvLoader {
    pub fn new(comments_path: impl Into<PathBuf>, annotations_path: impl Into<PathBuf>) -> Self {
        Self {
            comments_path:    comments_path.into(),
            annotations_path: annotations_path.into(),
        }
    }
}

impl CommentSource for TsvLoader {
    fn load_comments(&self) -> Result<Vec<Comment>> {
        let file = File::open(&self.comments_path)
            .with_context(|| format!("Cannot open '{}'", self.comments_path.display()))?;

        let rows: Vec<CommentRow> =
            read_tsv(file, &self.comments_path.display().to_string())?;

        tracing::info!(
            "Loaded {} comments from '{}'",
            rows.len(),
            self.comments_path.display()
        );
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

impl AnnotationSource for TsvLoader {
    fn load_annotations(&self) -> Result<Vec<Annotation>> {
        let file = File::open(&self.annotations_path)
            .with_context(|| format!("Cannot open '{}'", self.annotations_path.display()))?;

        let rows: Vec<AnnotationRow> =
            read_tsv(file, &self.annotations_path.display().to_string())?;

        tracing::info!(
            "Loaded {} annotations from '{}'",
            rows.len(),
            self.annotations_path.display()
        );
        Ok(rows.into_iter().map(Annotation::from).collect())
    }
}

/// Deserialize every record of a headed, tab-separated stream.
/// `source` only labels error messages.
pub fn read_tsv<T: DeserializeOwned, R: Read>(reader: R, source: &str) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, record) in rdr.deserialize::<T>().enumerate() {
        // +2: one for the header row, one for 1-based line numbers
        let record = record
            .with_context(|| format!("Malformed record {} in '{}'", i + 2, source))?;
        out.push(record);
    }
    Ok(out)
}

// ─── Field parsers ────────────────────────────────────────────────────────────

/// Parse an id written either as an integer or as an integral float.
fn parse_id(raw: &str) -> Result<u64> {
    let s = raw.trim();
    if let Ok(id) = s.parse::<u64>() {
        return Ok(id);
    }
    let f: f64 = s.parse().with_context(|| format!("'{raw}' is not a number"))?;
    if !f.is_finite() || f < 0.0 || f.fract() != 0.0 || f > u64::MAX as f64 {
        bail!("'{raw}' is not a non-negative integer id");
    }
    Ok(f as u64)
}

/// Parse a binary judgment written as 0/1 or 0.0/1.0.
fn parse_judgment(raw: &str) -> Result<bool> {
    let f: f64 = raw.trim().parse().with_context(|| format!("'{raw}' is not a number"))?;
    if f == 0.0 {
        Ok(false)
    } else if f == 1.0 {
        Ok(true)
    } else {
        bail!("'{raw}' is not a binary judgment (expected 0 or 1)")
    }
}

fn de_rev_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let raw = String::deserialize(d)?;
    parse_id(&raw).map_err(de::Error::custom)
}

fn de_opt_rev_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    let raw = String::deserialize(d)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_id(&raw).map(Some).map_err(de::Error::custom)
}

fn de_judgment<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    parse_judgment(&raw).map_err(de::Error::custom)
}
