// ============================================================
// Layer 3: Comment Domain Types
// ============================================================
// A Comment is one row of attack_annotated_comments.tsv.
// The dataset authors pre-assigned every comment to one of
// three partitions (train / dev / test); the `split` column
// carries that assignment and we keep it as-is.
//
// A LabelledComment is a Comment after two derivations:
//   - `attack` comes from the majority vote of its annotations
//   - `text` has had the placeholder tokens normalised away

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Split ────────────────────────────────────────────────────────────────────
/// The pre-assigned partition of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    Train,
    Test,
    Dev,
    /// Any value the dataset may carry that we do not recognise
    Other(String),
}

impl From<&str> for Split {
    fn from(value: &str) -> Self {
        match value.trim() {
            "train" => Split::Train,
            "test"  => Split::Test,
            "dev"   => Split::Dev,
            other   => Split::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train    => write!(f, "train"),
            Split::Test     => write!(f, "test"),
            Split::Dev      => write!(f, "dev"),
            Split::Other(s) => write!(f, "{s}"),
        }
    }
}

// ─── Comment ──────────────────────────────────────────────────────────────────
/// A raw comment as loaded from disk, before labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Wikipedia revision id, unique per comment
    pub rev_id: u64,

    /// Raw comment text, still containing NEWLINE_TOKEN / TAB_TOKEN
    pub text: String,

    /// Which partition the dataset authors assigned this comment to
    pub split: Split,
}

impl Comment {
    /// Create a new Comment.
    /// Accepts anything convertible into a Split so tests can pass "train".
    pub fn new(rev_id: u64, text: impl Into<String>, split: impl Into<Split>) -> Self {
        Self {
            rev_id,
            text:  text.into(),
            split: split.into(),
        }
    }
}

// ─── LabelledComment ──────────────────────────────────────────────────────────
/// A comment joined with its majority-vote label and normalised text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledComment {
    pub rev_id: u64,

    /// Normalised text, ready for vectorisation
    pub text: String,

    pub split: Split,

    /// true if a strict majority of annotators judged this an attack
    pub attack: bool,
}

impl LabelledComment {
    pub fn new(rev_id: u64, text: impl Into<String>, split: impl Into<Split>, attack: bool) -> Self {
        Self {
            rev_id,
            text: text.into(),
            split: split.into(),
            attack,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parsing() {
        assert_eq!(Split::from("train"), Split::Train);
        assert_eq!(Split::from("test"),  Split::Test);
        assert_eq!(Split::from("dev"),   Split::Dev);
        assert_eq!(Split::from("holdout"), Split::Other("holdout".to_string()));
    }

    #[test]
    fn test_split_display_round_trips_known_values() {
        for name in ["train", "test", "dev"] {
            assert_eq!(Split::from(name).to_string(), name);
        }
    }

    #[test]
    fn test_split_parsing_is_case_sensitive() {
        // The dataset only ever writes lowercase values
        assert_eq!(Split::from("Train"), Split::Other("Train".to_string()));
    }
}
