// ============================================================
// Layer 4: Train/Test Splitter
// ============================================================
// The dataset ships with a pre-assigned `split` column, so no
// shuffling is involved. We simply route each comment:
//
//   split == train  → training subset
//   split == test   → held-out subset
//   anything else   → neither (dev, unknown)
//
// The two subsets are disjoint and keep file order.

use crate::domain::comment::{LabelledComment, Split};

/// Train and test subsets of a labelled dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetSplit {
    pub train: Vec<LabelledComment>,
    pub test:  Vec<LabelledComment>,

    /// Comments routed to neither subset
    pub excluded: usize,
}

impl DatasetSplit {
    /// Texts of the training subset, in order
    pub fn train_texts(&self) -> Vec<String> {
        self.train.iter().map(|c| c.text.clone()).collect()
    }

    /// Labels of the training subset, in order
    pub fn train_labels(&self) -> Vec<bool> {
        self.train.iter().map(|c| c.attack).collect()
    }

    /// Texts of the test subset, in order
    pub fn test_texts(&self) -> Vec<String> {
        self.test.iter().map(|c| c.text.clone()).collect()
    }

    /// Labels of the test subset, in order
    pub fn test_labels(&self) -> Vec<bool> {
        self.test.iter().map(|c| c.attack).collect()
    }
}

/// Partition `comments` into (train, test) by their split field.
pub fn split_train_test(comments: Vec<LabelledComment>) -> DatasetSplit {
    let total = comments.len();
    let mut out = DatasetSplit::default();

    for c in comments {
        match c.split {
            Split::Train => out.train.push(c),
            Split::Test  => out.test.push(c),
            other        => {
                tracing::trace!("Excluding comment {} (split '{}')", c.rev_id, other);
                out.excluded += 1;
            }
        }
    }

    tracing::debug!(
        "Dataset split: {} training, {} test, {} excluded ({}% / {}%)",
        out.train.len(),
        out.test.len(),
        out.excluded,
        (out.train.len() * 100) / total.max(1),
        (out.test.len()  * 100) / total.max(1),
    );

    out
}
