// ============================================================
// Layer 4: Labelled Dataset
// ============================================================
// Joins the loaded comments with their majority-vote labels and
// normalises each comment's text on the way through.
//
// Join semantics are an INNER join on rev_id:
//   - a comment with no label is dropped
//   - a label with no comment is dropped
// Neither case is an error; both are counted and logged.
// Comment file order is preserved.

use std::collections::{BTreeMap, HashSet};

use crate::data::preprocessor::Preprocessor;
use crate::domain::comment::{Comment, LabelledComment};

/// The result of joining comments with labels.
#[derive(Debug, Clone, Default)]
pub struct LabelledDataset {
    /// Comments that had a label, in file order
    pub comments: Vec<LabelledComment>,

    /// Comments dropped because no annotation mentioned them
    pub unlabelled: usize,

    /// Label ids dropped because no comment carried them
    pub orphan_labels: usize,
}

impl LabelledDataset {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Number of comments labelled as attacks
    pub fn attack_count(&self) -> usize {
        self.comments.iter().filter(|c| c.attack).count()
    }
}

/// Inner-join `comments` with `labels`, normalising text with `preprocessor`.
pub fn join_labels(
    comments:     Vec<Comment>,
    labels:       &BTreeMap<u64, bool>,
    preprocessor: &Preprocessor,
) -> LabelledDataset {
    let mut joined     = Vec::with_capacity(comments.len());
    let mut matched    = HashSet::new();
    let mut unlabelled = 0usize;

    for comment in comments {
        match labels.get(&comment.rev_id) {
            Some(&attack) => {
                matched.insert(comment.rev_id);
                let text = preprocessor.clean(&comment.text);
                joined.push(LabelledComment::new(comment.rev_id, text, comment.split, attack));
            }
            None => unlabelled += 1,
        }
    }

    let orphan_labels = labels.len() - matched.len();

    if unlabelled > 0 || orphan_labels > 0 {
        tracing::warn!(
            "Dropped {} comments without annotations and {} labels without comments",
            unlabelled,
            orphan_labels,
        );
    }
    tracing::info!("Joined {} labelled comments", joined.len());

    LabelledDataset { comments: joined, unlabelled, orphan_labels }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_join_drops_both_sides() {
        let comments = vec![
            Comment::new(1, "hello", "train"),
            Comment::new(2, "no votes here", "train"),
            Comment::new(3, "youNEWLINE_TOKENidiot", "test"),
        ];
        let labels: BTreeMap<u64, bool> = [(1, false), (3, true), (99, true)].into_iter().collect();

        let ds = join_labels(comments, &labels, &Preprocessor::new());

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.unlabelled, 1);
        assert_eq!(ds.orphan_labels, 1);
        assert_eq!(ds.attack_count(), 1);
    }

    #[test]
    fn test_text_is_normalised_and_order_kept() {
        let comments = vec![
            Comment::new(5, "bTAB_TOKENb", "test"),
            Comment::new(4, "aNEWLINE_TOKENa", "train"),
        ];
        let labels: BTreeMap<u64, bool> = [(4, true), (5, false)].into_iter().collect();

        let ds = join_labels(comments, &labels, &Preprocessor::new());

        assert_eq!(ds.comments[0].rev_id, 5);
        assert_eq!(ds.comments[0].text, "b b");
        assert_eq!(ds.comments[1].text, "a a");
        assert!(ds.comments[1].attack);
    }

    #[test]
    fn test_empty_inputs() {
        let ds = join_labels(Vec::new(), &BTreeMap::new(), &Preprocessor::new());
        assert!(ds.is_empty());
        assert_eq!(ds.unlabelled, 0);
        assert_eq!(ds.orphan_labels, 0);
    }
}
