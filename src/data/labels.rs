// ============================================================
// Layer 4: Label Aggregator
// ============================================================
// Each comment was judged by several crowd workers. We reduce
// those judgments to a single boolean with a majority vote:
//
//   attack = mean(judgments) > 0.5
//
// The inequality is strict, so an exact tie (e.g. 2 of 4)
// is NOT an attack. The mean is compared in integer form
// (2 * positives > total) so no rounding can flip a tie.
//
// Only ids that have at least one annotation appear in the
// output; there is no default label.

use std::collections::BTreeMap;

use crate::domain::annotation::Annotation;

/// Running vote tally for one comment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VoteCount {
    pub positive: usize,
    pub total:    usize,
}

impl VoteCount {
    /// Strict majority vote
    pub fn is_attack(&self) -> bool {
        2 * self.positive > self.total
    }
}

/// Count the votes for every rev_id present in `annotations`.
pub fn count_votes(annotations: &[Annotation]) -> BTreeMap<u64, VoteCount> {
    let mut votes: BTreeMap<u64, VoteCount> = BTreeMap::new();

    for a in annotations {
        let entry = votes.entry(a.rev_id).or_default();
        entry.total += 1;
        if a.attack {
            entry.positive += 1;
        }
    }

    votes
}

/// Reduce annotations to one majority-vote label per rev_id.
///
/// The map iterates in ascending rev_id order.
pub fn aggregate_labels(annotations: &[Annotation]) -> BTreeMap<u64, bool> {
    let labels: BTreeMap<u64, bool> = count_votes(annotations)
        .into_iter()
        .map(|(rev_id, votes)| (rev_id, votes.is_attack()))
        .collect();

    let attacks = labels.values().filter(|&&a| a).count();
    tracing::debug!(
        "Aggregated {} annotations into {} labels ({} attacks)",
        annotations.len(),
        labels.len(),
        attacks,
    );

    labels
}
